//! Calibración de offsets del acelerómetro analógico
//!
//! La calibración se hace con el dispositivo en una postura conocida: por
//! defecto con el X lógico alineado con la gravedad (+1 g) y los ejes Y/Z
//! lógicos a 0 g. Los offsets resultantes compensan a la vez el sesgo del
//! sensor y la postura física real en la que se sujeta, de modo que releer
//! las tensiones de referencia reproduce el vector lógico objetivo.
//!
//! Hay dos formas de llevarla a cabo:
//! - [`Calibrator`]: incremental, el llamante empuja muestras y decide cuándo
//!   leer; nunca bloquea y se puede cancelar.
//! - [`calibrate_blocking`]: espera de asentamiento y pausa entre muestras
//!   con un servicio `DelayMs`, como en el firmware.

use crate::axis::AxisMap;
use crate::config::{AdcConfig, EstimatorConfig, SensorConfig};
use crate::conversion::{sample_to_voltage, voltages_to_g};
use crate::interface::AnalogSource;
use crate::types::{RawSample, Vector3};
use crate::TiltError;
use embedded_hal::blocking::delay::DelayMs;

/// Error máximo (g) entre el vector lógico nominal y el objetivo antes de
/// avisar de que la postura de calibración parece incorrecta
pub const POSTURE_TOLERANCE_G: f32 = 0.3;

/// Offsets de calibración por eje físico (V)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationOffsets {
    pub volts: Vector3,
}

impl CalibrationOffsets {
    /// Offsets nominales: la tensión a 0 g en los tres ejes
    pub fn nominal(sensor: &SensorConfig) -> Self {
        Self {
            volts: [sensor.zero_g_voltage; 3],
        }
    }
}

/// Resultado completo de una calibración
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationReport {
    /// Muestras promediadas
    pub samples: usize,
    /// Muestra media (cuentas del ADC)
    pub mean_raw: RawSample,
    /// Tensiones de referencia por eje físico (V)
    pub reference_voltages: Vector3,
    /// Aceleración física con offsets nominales (g)
    pub nominal_physical: Vector3,
    /// Aceleración lógica con offsets nominales (g)
    pub nominal_logical: Vector3,
    /// Vector lógico objetivo (g)
    pub target_logical: Vector3,
    /// Aceleración física necesaria para obtener el objetivo (g)
    pub target_physical: Vector3,
    /// Offsets finales
    pub offsets: CalibrationOffsets,
    /// Vector lógico obtenido al releer la referencia con los offsets finales
    pub verified_logical: Vector3,
}

impl CalibrationReport {
    /// Mayor diferencia entre el vector lógico nominal y el objetivo (g)
    pub fn alignment_error(&self) -> f32 {
        self.nominal_logical
            .iter()
            .zip(self.target_logical.iter())
            .map(|(n, t)| (n - t).abs())
            .fold(0.0, f32::max)
    }

    /// Indica si la postura parecía la esperada
    pub fn is_posture_aligned(&self) -> bool {
        self.alignment_error() <= POSTURE_TOLERANCE_G
    }
}

/// Media entera de las cuentas acumuladas, como hace el firmware
pub fn mean_sample(sum: [u64; 3], count: usize) -> RawSample {
    let count = count.max(1) as u64;
    [
        (sum[0] / count) as u16,
        (sum[1] / count) as u16,
        (sum[2] / count) as u16,
    ]
}

/// Calcula los offsets a partir de las tensiones de referencia
///
/// 1. aceleración física con la tensión nominal a 0 g
/// 2. su equivalente lógico a través del mapa de ejes
/// 3. aceleración física que produciría `target` (mapa inverso)
/// 4. `offset = tensión_referencia - g_deseada * sensibilidad`
/// 5. verificación: releer la referencia con los offsets nuevos
pub fn compute_offsets(
    reference_voltages: Vector3,
    axis_map: &AxisMap,
    sensor: &SensorConfig,
    target: Vector3,
) -> CalibrationReport {
    let nominal = CalibrationOffsets::nominal(sensor);
    let nominal_physical = voltages_to_g(reference_voltages, nominal.volts, sensor.sensitivity);
    let nominal_logical = axis_map.remap(nominal_physical);

    let target_physical = axis_map.inverse_remap(target);

    let mut volts = [0.0; 3];
    for (i, offset) in volts.iter_mut().enumerate() {
        *offset = reference_voltages[i] - target_physical[i] * sensor.sensitivity;
    }
    let offsets = CalibrationOffsets { volts };

    let verified_physical = voltages_to_g(reference_voltages, offsets.volts, sensor.sensitivity);
    let verified_logical = axis_map.remap(verified_physical);

    CalibrationReport {
        samples: 0,
        mean_raw: [0; 3],
        reference_voltages,
        nominal_physical,
        nominal_logical,
        target_logical: target,
        target_physical,
        offsets,
        verified_logical,
    }
}

/// Estado devuelto tras cada muestra de la calibración incremental
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CalibrationStep {
    /// Descartando muestras de asentamiento
    Settling { remaining: usize },
    /// Acumulando muestras
    Collecting { collected: usize, required: usize },
    /// Calibración terminada
    Complete(CalibrationReport),
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum CalibratorState {
    Running,
    Cancelled,
    Done(CalibrationReport),
}

/// Calibración incremental guiada por muestras
///
/// La condición de fin es haber acumulado `samples` muestras válidas. No
/// espera ni duerme; el ritmo lo marca quien empuja las muestras.
#[derive(Debug, Clone)]
pub struct Calibrator {
    adc: AdcConfig,
    sensor: SensorConfig,
    axis_map: AxisMap,
    target: Vector3,
    required: usize,
    settle_remaining: usize,
    collected: usize,
    sum: [u64; 3],
    state: CalibratorState,
}

impl Calibrator {
    pub fn new(config: &EstimatorConfig) -> Self {
        Self {
            adc: config.adc,
            sensor: config.sensor,
            axis_map: config.axis_map,
            target: config.calibration.target,
            required: config.calibration.samples.max(1),
            settle_remaining: config.calibration.settle_samples,
            collected: 0,
            sum: [0; 3],
            state: CalibratorState::Running,
        }
    }

    /// Sin descarte de muestras iniciales (la espera la hace otro)
    pub fn without_settle(mut self) -> Self {
        self.settle_remaining = 0;
        self
    }

    /// Añade una muestra cruda
    pub fn push(&mut self, raw: RawSample) -> Result<CalibrationStep, TiltError> {
        match self.state {
            CalibratorState::Cancelled => return Err(TiltError::CalibrationCancelled),
            CalibratorState::Done(report) => return Ok(CalibrationStep::Complete(report)),
            CalibratorState::Running => {}
        }

        if self.settle_remaining > 0 {
            self.settle_remaining -= 1;
            return Ok(CalibrationStep::Settling {
                remaining: self.settle_remaining,
            });
        }

        for (acc, value) in self.sum.iter_mut().zip(raw.iter()) {
            *acc += *value as u64;
        }
        self.collected += 1;

        if self.collected < self.required {
            return Ok(CalibrationStep::Collecting {
                collected: self.collected,
                required: self.required,
            });
        }

        let report = self.finish();
        self.state = CalibratorState::Done(report);
        Ok(CalibrationStep::Complete(report))
    }

    fn finish(&self) -> CalibrationReport {
        let mean_raw = mean_sample(self.sum, self.collected);
        let reference = sample_to_voltage(mean_raw, self.adc.supply_voltage, self.adc.full_scale);

        let mut report = compute_offsets(reference, &self.axis_map, &self.sensor, self.target);
        report.samples = self.collected;
        report.mean_raw = mean_raw;
        report
    }

    /// Aborta la calibración; las muestras siguientes se rechazan
    pub fn cancel(&mut self) {
        if self.state == CalibratorState::Running {
            self.state = CalibratorState::Cancelled;
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.state == CalibratorState::Cancelled
    }

    pub fn is_complete(&self) -> bool {
        matches!(self.state, CalibratorState::Done(_))
    }

    /// Informe final, si ya terminó
    pub fn report(&self) -> Option<CalibrationReport> {
        match self.state {
            CalibratorState::Done(report) => Some(report),
            _ => None,
        }
    }

    /// (muestras acumuladas, muestras necesarias)
    pub fn progress(&self) -> (usize, usize) {
        (self.collected, self.required)
    }
}

/// Calibración bloqueante
///
/// Espera `settle_ms` para que el usuario coloque el dispositivo y después
/// lee `samples` muestras con una pausa de `sample_delay_ms` tras cada una.
/// Sólo falla si la fuente analógica falla.
pub fn calibrate_blocking<S, D>(
    source: &mut S,
    delay: &mut D,
    config: &EstimatorConfig,
) -> Result<CalibrationReport, TiltError>
where
    S: AnalogSource,
    TiltError: From<S::Error>,
    D: DelayMs<u32>,
{
    let mut calibrator = Calibrator::new(config).without_settle();

    // Dar tiempo a posicionarlo
    delay.delay_ms(config.calibration.settle_ms);

    loop {
        let raw = source.read_axes()?;
        let step = calibrator.push(raw)?;
        delay.delay_ms(config.calibration.sample_delay_ms);

        if let CalibrationStep::Complete(report) = step {
            if !report.is_posture_aligned() {
                log::warn!(
                    "Calibration posture differs from target by {:.3}g; offsets applied anyway",
                    report.alignment_error()
                );
            }
            return Ok(report);
        }
    }
}
