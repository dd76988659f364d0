//! Configuración del estimador
//!
//! Todos los parámetros que en el firmware eran constantes de compilación
//! se agrupan aquí con los mismos valores por defecto.

use crate::angles::PitchFormula;
use crate::axis::AxisMap;
use crate::types::defaults;
use crate::TiltError;

/// Modelos de acelerómetro analógico soportados
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SensorModel {
    /// ADXL335, 300 mV/g a 3 V
    Adxl335,
    /// ADXL337, 330 mV/g a 3.3 V
    Adxl337,
    /// Sensibilidad (V/g) y tensión a 0 g personalizadas
    Custom { sensitivity: f32, zero_g_voltage: f32 },
}

impl Default for SensorModel {
    fn default() -> Self {
        SensorModel::Adxl337
    }
}

impl SensorModel {
    /// Parámetros eléctricos del modelo
    pub fn sensor_config(self) -> SensorConfig {
        match self {
            SensorModel::Adxl335 => SensorConfig {
                sensitivity: 0.30,
                zero_g_voltage: 1.5,
            },
            SensorModel::Adxl337 => SensorConfig {
                sensitivity: defaults::SENSITIVITY,
                zero_g_voltage: defaults::ZERO_G_VOLTAGE,
            },
            SensorModel::Custom {
                sensitivity,
                zero_g_voltage,
            } => SensorConfig {
                sensitivity,
                zero_g_voltage,
            },
        }
    }
}

/// Resolución del ADC
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdcResolution {
    /// 10 bits (Teensy/Arduino por defecto)
    Bits10,
    /// 12 bits
    Bits12,
    /// 16 bits
    Bits16,
}

impl Default for AdcResolution {
    fn default() -> Self {
        AdcResolution::Bits10
    }
}

impl AdcResolution {
    /// Cuenta máxima del ADC
    pub fn full_scale(self) -> f32 {
        match self {
            AdcResolution::Bits10 => 1023.0,
            AdcResolution::Bits12 => 4095.0,
            AdcResolution::Bits16 => 65535.0,
        }
    }
}

/// Parámetros del ADC
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdcConfig {
    /// Tensión de referencia (V)
    pub supply_voltage: f32,
    /// Cuenta máxima del ADC
    pub full_scale: f32,
}

impl AdcConfig {
    pub fn new(supply_voltage: f32, resolution: AdcResolution) -> Self {
        Self {
            supply_voltage,
            full_scale: resolution.full_scale(),
        }
    }
}

impl Default for AdcConfig {
    fn default() -> Self {
        Self {
            supply_voltage: defaults::SUPPLY_VOLTAGE,
            full_scale: defaults::ADC_FULL_SCALE,
        }
    }
}

/// Parámetros eléctricos del sensor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorConfig {
    /// Sensibilidad (V/g)
    pub sensitivity: f32,
    /// Tensión nominal a 0 g (V)
    pub zero_g_voltage: f32,
}

impl Default for SensorConfig {
    fn default() -> Self {
        SensorModel::default().sensor_config()
    }
}

/// Parámetros de la cadena de filtrado
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterConfig {
    /// Alpha base del EMA del vector de aceleración
    pub alpha_accel: f32,
    /// Multiplicador de alpha mientras hay movimiento
    pub motion_alpha_gain: f32,
    /// Alpha del EMA de los ángulos
    pub alpha_angles: f32,
    /// Zona muerta (g), sólo en reposo
    pub dead_zone: f32,
    /// Umbral de movimiento: suma de |Δ| entre lecturas consecutivas (g)
    pub movement_threshold: f32,
    /// Banda [min, max] de magnitud en la que se normaliza (g)
    pub normalize_band: (f32, f32),
    /// Épsilon de la singularidad del roll
    pub roll_epsilon: f32,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            alpha_accel: defaults::ALPHA_ACCEL,
            motion_alpha_gain: defaults::MOTION_ALPHA_GAIN,
            alpha_angles: defaults::ALPHA_ANGLES,
            dead_zone: defaults::ACCEL_DEADZONE,
            movement_threshold: defaults::MOVEMENT_THRESHOLD,
            normalize_band: (defaults::NORMALIZE_MIN_G, defaults::NORMALIZE_MAX_G),
            roll_epsilon: defaults::ROLL_EPSILON,
        }
    }
}

/// Parámetros de la calibración
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationConfig {
    /// Muestras promediadas
    pub samples: usize,
    /// Espera antes de muestrear en la calibración bloqueante (ms)
    pub settle_ms: u32,
    /// Pausa entre muestras en la calibración bloqueante (ms)
    pub sample_delay_ms: u32,
    /// Muestras descartadas al principio de la calibración incremental
    pub settle_samples: usize,
    /// Vector lógico esperado en la postura de calibración (g)
    pub target: [f32; 3],
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            samples: defaults::CALIBRATION_SAMPLES,
            settle_ms: defaults::CALIBRATION_SETTLE_MS,
            sample_delay_ms: defaults::CALIBRATION_SAMPLE_DELAY_MS,
            settle_samples: 0,
            target: [1.0, 0.0, 0.0],
        }
    }
}

/// Configuración completa del estimador
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EstimatorConfig {
    pub adc: AdcConfig,
    pub sensor: SensorConfig,
    pub filter: FilterConfig,
    pub calibration: CalibrationConfig,
    pub axis_map: AxisMap,
    pub pitch_formula: PitchFormula,
    /// Envía eventos de diagnóstico al observador
    pub diagnostics: bool,
}

impl EstimatorConfig {
    /// Configuración por defecto para un modelo de sensor
    pub fn for_model(model: SensorModel) -> Self {
        Self {
            sensor: model.sensor_config(),
            ..Self::default()
        }
    }

    pub fn with_axis_map(mut self, axis_map: AxisMap) -> Self {
        self.axis_map = axis_map;
        self
    }

    pub fn with_pitch_formula(mut self, formula: PitchFormula) -> Self {
        self.pitch_formula = formula;
        self
    }

    pub fn with_diagnostics(mut self, enabled: bool) -> Self {
        self.diagnostics = enabled;
        self
    }

    /// Comprueba los invariantes de configuración
    pub fn validate(&self) -> Result<(), TiltError> {
        // NaN no pasa ninguna de estas comprobaciones
        let alpha_ok = |a: f32| a > 0.0 && a <= 1.0;
        let positive = |v: f32| v.is_finite() && v > 0.0;
        let non_negative = |v: f32| v.is_finite() && v >= 0.0;

        if !positive(self.sensor.sensitivity) || !self.sensor.zero_g_voltage.is_finite() {
            return Err(TiltError::InvalidParameter);
        }
        if !positive(self.adc.full_scale) || !positive(self.adc.supply_voltage) {
            return Err(TiltError::InvalidParameter);
        }
        if !alpha_ok(self.filter.alpha_angles) {
            return Err(TiltError::InvalidParameter);
        }
        // El alpha efectivo en movimiento tampoco puede pasar de 1
        if !alpha_ok(self.filter.alpha_accel)
            || !alpha_ok(self.filter.alpha_accel * self.filter.motion_alpha_gain)
        {
            return Err(TiltError::InvalidParameter);
        }
        let (min, max) = self.filter.normalize_band;
        if !non_negative(min) || !non_negative(max) || min > max {
            return Err(TiltError::InvalidParameter);
        }
        if !non_negative(self.filter.dead_zone)
            || !non_negative(self.filter.movement_threshold)
            || !non_negative(self.filter.roll_epsilon)
        {
            return Err(TiltError::InvalidParameter);
        }
        if self.calibration.samples == 0 {
            return Err(TiltError::InvalidParameter);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(EstimatorConfig::default().validate().is_ok());
        assert!(EstimatorConfig::for_model(SensorModel::Adxl335)
            .validate()
            .is_ok());
    }

    #[test]
    fn test_rejects_zero_sensitivity() {
        let config = EstimatorConfig::for_model(SensorModel::Custom {
            sensitivity: 0.0,
            zero_g_voltage: 1.65,
        });
        assert_eq!(config.validate(), Err(TiltError::InvalidParameter));
    }

    #[test]
    fn test_rejects_motion_alpha_above_one() {
        let mut config = EstimatorConfig::default();
        config.filter.alpha_accel = 0.6;
        assert_eq!(config.validate(), Err(TiltError::InvalidParameter));
    }

    #[test]
    fn test_rejects_nan_thresholds() {
        let mut config = EstimatorConfig::default();
        config.filter.movement_threshold = f32::NAN;
        assert_eq!(config.validate(), Err(TiltError::InvalidParameter));

        let mut config = EstimatorConfig::default();
        config.filter.normalize_band = (f32::NAN, f32::NAN);
        assert_eq!(config.validate(), Err(TiltError::InvalidParameter));

        let mut config = EstimatorConfig::default();
        config.filter.normalize_band = (0.5, f32::INFINITY);
        assert_eq!(config.validate(), Err(TiltError::InvalidParameter));

        let mut config = EstimatorConfig::default();
        config.filter.dead_zone = f32::NAN;
        assert_eq!(config.validate(), Err(TiltError::InvalidParameter));

        let mut config = EstimatorConfig::default();
        config.filter.alpha_angles = f32::NAN;
        assert_eq!(config.validate(), Err(TiltError::InvalidParameter));

        let config = EstimatorConfig::for_model(SensorModel::Custom {
            sensitivity: f32::NAN,
            zero_g_voltage: 1.65,
        });
        assert_eq!(config.validate(), Err(TiltError::InvalidParameter));
    }

    #[test]
    fn test_rejects_zero_samples() {
        let mut config = EstimatorConfig::default();
        config.calibration.samples = 0;
        assert_eq!(config.validate(), Err(TiltError::InvalidParameter));
    }

    #[test]
    fn test_adc_resolution() {
        assert_eq!(AdcResolution::Bits12.full_scale(), 4095.0);
        assert_eq!(AdcConfig::new(3.3, AdcResolution::Bits10), AdcConfig::default());
    }
}
