//! Cálculo de pitch y roll a partir del vector de gravedad

use crate::conversion::RAD_TO_DEG;
use crate::types::{defaults, Vector3};

/// Fórmula usada para el pitch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PitchFormula {
    /// `atan2(z, x)`: sólo dos ejes, ignora Y
    #[default]
    TwoAxis,
    /// `atan2(-x, sqrt(y² + z²))` limitado a ±90°
    ThreeAxis,
}

/// Calculadora de ángulos con protección de singularidades
#[derive(Debug, Clone, Copy)]
pub struct AngleCalculator {
    formula: PitchFormula,
    roll_epsilon: f32,
}

impl AngleCalculator {
    pub fn new(formula: PitchFormula, roll_epsilon: f32) -> Self {
        Self {
            formula,
            roll_epsilon,
        }
    }

    /// Pitch en grados según la fórmula configurada
    pub fn pitch(&self, v: Vector3) -> f32 {
        match self.formula {
            PitchFormula::TwoAxis => pitch_two_axis(v),
            PitchFormula::ThreeAxis => pitch_three_axis(v),
        }
    }

    /// Roll en grados, 0 exacto cerca del polo
    pub fn roll(&self, v: Vector3) -> f32 {
        let (y, z) = (v[1], v[2]);
        if z.abs() < self.roll_epsilon && y.abs() < self.roll_epsilon {
            return 0.0;
        }
        y.atan2(z) * RAD_TO_DEG
    }

    /// (pitch, roll) en grados
    pub fn angles(&self, v: Vector3) -> (f32, f32) {
        (self.pitch(v), self.roll(v))
    }
}

impl Default for AngleCalculator {
    fn default() -> Self {
        Self::new(PitchFormula::default(), defaults::ROLL_EPSILON)
    }
}

/// Pitch simplificado de dos ejes. No se limita el rango (±180°).
pub fn pitch_two_axis(v: Vector3) -> f32 {
    v[2].atan2(v[0]) * RAD_TO_DEG
}

/// Pitch completo de tres ejes
pub fn pitch_three_axis(v: Vector3) -> f32 {
    let (x, y, z) = (v[0], v[1], v[2]);
    let denominator = (y * y + z * z).sqrt();
    // Casi vertical
    if denominator < defaults::PITCH_EPSILON {
        return 0.0;
    }
    ((-x).atan2(denominator) * RAD_TO_DEG).clamp(-90.0, 90.0)
}
