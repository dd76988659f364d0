//! Detección de movimiento por diferencia entre lecturas consecutivas

use crate::types::Vector3;

/// Clasificador de movimiento con memoria de un solo paso
///
/// Suma |Δx| + |Δy| + |Δz| respecto a la muestra anterior. La muestra
/// almacenada se sobrescribe siempre, haya movimiento o no.
#[derive(Debug, Clone, Copy)]
pub struct MotionDetector {
    threshold: f32,
    previous: Vector3,
    moving: bool,
}

impl MotionDetector {
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold,
            previous: [0.0; 3],
            moving: false,
        }
    }

    /// Procesa una muestra lógica y devuelve si hay movimiento
    pub fn update(&mut self, sample: Vector3) -> bool {
        let total_delta: f32 = sample
            .iter()
            .zip(self.previous.iter())
            .map(|(now, before)| (now - before).abs())
            .sum();

        self.previous = sample;
        self.moving = total_delta > self.threshold;
        self.moving
    }

    /// Resultado de la última actualización
    pub fn is_moving(&self) -> bool {
        self.moving
    }

    pub fn previous(&self) -> Vector3 {
        self.previous
    }

    pub fn reset(&mut self) {
        self.previous = [0.0; 3];
        self.moving = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_samples_are_still() {
        let mut detector = MotionDetector::new(0.1);
        detector.update([1.0, 0.0, 0.0]);
        assert!(!detector.update([1.0, 0.0, 0.0]));
    }

    #[test]
    fn test_large_delta_is_moving() {
        let mut detector = MotionDetector::new(0.1);
        detector.update([1.0, 0.0, 0.0]);
        assert!(detector.update([1.0, 0.06, 0.06]));
        assert!(detector.is_moving());
    }

    #[test]
    fn test_threshold_is_strict() {
        let mut detector = MotionDetector::new(0.5);
        detector.update([0.0, 0.0, 0.0]);
        assert!(!detector.update([0.25, 0.25, 0.0]));
    }

    #[test]
    fn test_only_one_step_memory() {
        let mut detector = MotionDetector::new(0.1);
        detector.update([0.0, 0.0, 1.0]);
        assert!(detector.update([1.0, 0.0, 0.0]));
        // Comparado con [1, 0, 0], no con el [0, 0, 1] inicial
        assert!(!detector.update([1.0, 0.0, 0.05]));
        assert_eq!(detector.previous(), [1.0, 0.0, 0.05]);
    }

    #[test]
    fn test_first_sample_compares_against_zero() {
        let mut detector = MotionDetector::new(0.1);
        assert!(detector.update([1.0, 0.0, 0.0]));
        detector.reset();
        assert!(!detector.update([0.01, 0.01, 0.01]));
    }
}
