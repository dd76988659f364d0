//! Filtros de la cadena de procesamiento
//!
//! Contiene el filtro adaptativo del vector de aceleración (zona muerta +
//! EMA con alpha dependiente del movimiento), la normalización del vector de
//! gravedad y el suavizado de segunda etapa sobre los ángulos.

use crate::config::FilterConfig;
use crate::conversion::{dead_zone, exponential_filter, magnitude};
use crate::types::Vector3;

/// Filtro adaptativo del vector de aceleración lógico
///
/// Dos regímenes:
/// - en reposo: zona muerta por componente y alpha base (suavizado fuerte)
/// - en movimiento: sin zona muerta y alpha multiplicado (seguimiento rápido)
///
/// La primera llamada tras crear o reiniciar el filtro copia la muestra tal
/// cual, sin mezclar.
#[derive(Debug, Clone, Copy)]
pub struct AdaptiveFilter {
    alpha: f32,
    motion_gain: f32,
    dead_zone: f32,
    filtered: Vector3,
    initialized: bool,
}

impl AdaptiveFilter {
    pub fn new(alpha: f32, motion_gain: f32, dead_zone: f32) -> Self {
        Self {
            alpha,
            motion_gain,
            dead_zone,
            filtered: [0.0; 3],
            initialized: false,
        }
    }

    pub fn from_config(config: &FilterConfig) -> Self {
        Self::new(config.alpha_accel, config.motion_alpha_gain, config.dead_zone)
    }

    /// Alpha efectivo para el estado de movimiento dado
    pub fn alpha_for(&self, moving: bool) -> f32 {
        if moving {
            self.alpha * self.motion_gain
        } else {
            self.alpha
        }
    }

    /// Filtra una muestra y devuelve el estado filtrado
    pub fn filter(&mut self, sample: Vector3, moving: bool) -> Vector3 {
        let mut input = sample;
        if !moving {
            for v in input.iter_mut() {
                *v = dead_zone(*v, self.dead_zone);
            }
        }

        if !self.initialized {
            self.filtered = input;
            self.initialized = true;
        } else {
            let alpha = self.alpha_for(moving);
            for (f, v) in self.filtered.iter_mut().zip(input.iter()) {
                *f = exponential_filter(*f, *v, alpha);
            }
        }

        self.filtered
    }

    /// Sustituye el estado filtrado (p. ej. por el vector normalizado)
    pub fn set_filtered(&mut self, value: Vector3) {
        self.filtered = value;
    }

    pub fn filtered(&self) -> Vector3 {
        self.filtered
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn reset(&mut self) {
        self.filtered = [0.0; 3];
        self.initialized = false;
    }
}

/// Normaliza el vector a longitud unidad si su magnitud está en `[min, max]`
///
/// Fuera de la banda se asume aceleración no gravitatoria y el vector se
/// devuelve sin tocar.
pub fn normalize(v: Vector3, band: (f32, f32)) -> Vector3 {
    let mag = magnitude(v);
    if mag >= band.0 && mag <= band.1 && mag > 0.0 {
        [v[0] / mag, v[1] / mag, v[2] / mag]
    } else {
        v
    }
}

/// EMA de segunda etapa sobre pitch y roll
///
/// Arranca en 0° y mezcla desde la primera lectura.
#[derive(Debug, Clone, Copy)]
pub struct AngleSmoother {
    alpha: f32,
    pitch: f32,
    roll: f32,
}

impl AngleSmoother {
    pub fn new(alpha: f32) -> Self {
        Self {
            alpha,
            pitch: 0.0,
            roll: 0.0,
        }
    }

    /// Suaviza un par (pitch, roll) en grados
    pub fn smooth(&mut self, pitch: f32, roll: f32) -> (f32, f32) {
        self.pitch = exponential_filter(self.pitch, pitch, self.alpha);
        self.roll = exponential_filter(self.roll, roll, self.alpha);
        (self.pitch, self.roll)
    }

    pub fn reset(&mut self) {
        self.pitch = 0.0;
        self.roll = 0.0;
    }
}
