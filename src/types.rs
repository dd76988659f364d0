//! Definiciones de tipos y constantes comunes del estimador de inclinación

use core::fmt;

/// Eje físico del acelerómetro (orden de los canales analógicos)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Axis {
    X = 0,
    Y = 1,
    Z = 2,
}

impl Axis {
    /// Los tres ejes en orden de canal
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Índice del eje dentro de un vector `[x, y, z]`
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

// Conversión desde el número de canal; fuera de rango es un error
impl TryFrom<u8> for Axis {
    type Error = crate::TiltError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Axis::X),
            1 => Ok(Axis::Y),
            2 => Ok(Axis::Z),
            _ => Err(crate::TiltError::InvalidAxisMap),
        }
    }
}

impl TryFrom<char> for Axis {
    type Error = crate::TiltError;

    fn try_from(value: char) -> Result<Self, Self::Error> {
        match value.to_ascii_uppercase() {
            'X' => Ok(Axis::X),
            'Y' => Ok(Axis::Y),
            'Z' => Ok(Axis::Z),
            _ => Err(crate::TiltError::InvalidParameter),
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Axis::X => "X",
            Axis::Y => "Y",
            Axis::Z => "Z",
        };
        f.write_str(name)
    }
}

/// Signo aplicado a un eje al pasar de físico a lógico
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AxisSign {
    #[default]
    Positive,
    Negative,
}

impl AxisSign {
    /// Factor multiplicativo (+1 / -1)
    #[inline]
    pub fn factor(self) -> f32 {
        match self {
            AxisSign::Positive => 1.0,
            AxisSign::Negative => -1.0,
        }
    }
}

impl From<i8> for AxisSign {
    fn from(value: i8) -> Self {
        if value < 0 {
            AxisSign::Negative
        } else {
            AxisSign::Positive
        }
    }
}

/// Ángulos de orientación en grados
///
/// Un único acelerómetro no puede observar el rumbo, por lo que `yaw`
/// es siempre `NaN` en esta vía de medida.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EulerAngles {
    /// Ángulo de pitch (grados)
    pub pitch: f32,
    /// Ángulo de roll (grados)
    pub roll: f32,
    /// Ángulo de yaw (grados), `NaN` si no está disponible
    pub yaw: f32,
}

impl EulerAngles {
    /// Crea ángulos sin yaw
    pub fn tilt(pitch: f32, roll: f32) -> Self {
        Self {
            pitch,
            roll,
            yaw: f32::NAN,
        }
    }

    /// Indica si el yaw está disponible
    pub fn has_yaw(&self) -> bool {
        !self.yaw.is_nan()
    }
}

impl Default for EulerAngles {
    fn default() -> Self {
        Self::tilt(0.0, 0.0)
    }
}

/// Lectura cruda del ADC, un valor por eje físico [x, y, z]
pub type RawSample = [u16; 3];

/// Vector de tres componentes (voltios o g según el contexto)
pub type Vector3 = [f32; 3];

/// Valores por defecto tomados del firmware del ADXL337
pub mod defaults {
    /// Tensión de alimentación (V)
    pub const SUPPLY_VOLTAGE: f32 = 3.3;
    /// Fondo de escala del ADC de 10 bits
    pub const ADC_FULL_SCALE: f32 = 1023.0;
    /// Sensibilidad nominal del ADXL337 (V/g)
    pub const SENSITIVITY: f32 = 0.33;
    /// Tensión a 0 g (mitad de la alimentación)
    pub const ZERO_G_VOLTAGE: f32 = 1.65;

    /// Alpha del EMA sobre el vector de aceleración
    pub const ALPHA_ACCEL: f32 = 0.2;
    /// Alpha del EMA sobre los ángulos
    pub const ALPHA_ANGLES: f32 = 0.25;
    /// Zona muerta (g)
    pub const ACCEL_DEADZONE: f32 = 0.02;
    /// Umbral de movimiento (suma de |Δ| en g)
    pub const MOVEMENT_THRESHOLD: f32 = 0.1;
    /// Multiplicador de alpha mientras hay movimiento
    pub const MOTION_ALPHA_GAIN: f32 = 2.0;
    /// Banda de magnitud en la que se normaliza el vector de gravedad (g)
    pub const NORMALIZE_MIN_G: f32 = 0.5;
    pub const NORMALIZE_MAX_G: f32 = 1.5;
    /// Épsilon de la singularidad del roll
    pub const ROLL_EPSILON: f32 = 0.01;
    /// Denominador mínimo de la fórmula de pitch de tres ejes
    pub const PITCH_EPSILON: f32 = 0.01;

    /// Muestras promediadas durante la calibración
    pub const CALIBRATION_SAMPLES: usize = 100;
    /// Espera antes de muestrear (ms)
    pub const CALIBRATION_SETTLE_MS: u32 = 3000;
    /// Pausa entre muestras (ms)
    pub const CALIBRATION_SAMPLE_DELAY_MS: u32 = 5;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_from_char() {
        assert_eq!(Axis::try_from('z').unwrap(), Axis::Z);
        assert_eq!(Axis::try_from('Y').unwrap(), Axis::Y);
        assert!(Axis::try_from('w').is_err());
    }

    #[test]
    fn test_axis_from_channel_index() {
        for axis in Axis::ALL {
            assert_eq!(Axis::try_from(axis.index() as u8), Ok(axis));
        }
        assert_eq!(Axis::try_from(3u8), Err(crate::TiltError::InvalidAxisMap));
        assert_eq!(Axis::try_from(7u8), Err(crate::TiltError::InvalidAxisMap));
    }

    #[test]
    fn test_sign_factor() {
        assert_eq!(AxisSign::from(-1).factor(), -1.0);
        assert_eq!(AxisSign::from(1).factor(), 1.0);
    }

    #[test]
    fn test_tilt_has_no_yaw() {
        let angles = EulerAngles::tilt(10.0, -5.0);
        assert!(!angles.has_yaw());
        assert_eq!(angles.pitch, 10.0);
    }
}
