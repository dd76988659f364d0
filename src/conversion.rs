//! Funciones de conversión para las lecturas analógicas del acelerómetro
//!
//! Este módulo proporciona las funciones para convertir cuentas del ADC a
//! voltios, voltios a aceleración en g, y los filtros escalares (EMA y zona
//! muerta) que usa la cadena de procesamiento.

use crate::types::{RawSample, Vector3};
use core::f32::consts::PI;

/// Factor para convertir radianes a grados
pub const RAD_TO_DEG: f32 = 180.0 / PI;

/// Convierte una cuenta del ADC a voltios
///
/// # Arguments
/// * `raw` - Valor leído del ADC
/// * `supply_voltage` - Tensión de referencia del ADC (V)
/// * `full_scale` - Cuenta máxima del ADC (1023 para 10 bits)
#[inline]
pub fn raw_to_voltage(raw: u16, supply_voltage: f32, full_scale: f32) -> f32 {
    (raw as f32 * supply_voltage) / full_scale
}

/// Convierte una muestra de tres ejes a voltios
pub fn sample_to_voltage(raw: RawSample, supply_voltage: f32, full_scale: f32) -> Vector3 {
    [
        raw_to_voltage(raw[0], supply_voltage, full_scale),
        raw_to_voltage(raw[1], supply_voltage, full_scale),
        raw_to_voltage(raw[2], supply_voltage, full_scale),
    ]
}

/// Convierte una tensión a aceleración (g) dado el offset del eje
///
/// Una sensibilidad nula produce valores no acotados; la configuración la
/// rechaza antes de llegar aquí.
#[inline]
pub fn voltage_to_g(voltage: f32, offset: f32, sensitivity: f32) -> f32 {
    (voltage - offset) / sensitivity
}

/// Convierte las tensiones de los tres ejes a g con sus offsets
pub fn voltages_to_g(voltage: Vector3, offsets: Vector3, sensitivity: f32) -> Vector3 {
    [
        voltage_to_g(voltage[0], offsets[0], sensitivity),
        voltage_to_g(voltage[1], offsets[1], sensitivity),
        voltage_to_g(voltage[2], offsets[2], sensitivity),
    ]
}

/// Filtro paso bajo exponencial (EMA)
///
/// `previous * (1 - alpha) + current * alpha`
#[inline]
pub fn exponential_filter(previous: f32, current: f32, alpha: f32) -> f32 {
    previous * (1.0 - alpha) + current * alpha
}

/// Filtro de zona muerta: anula valores estrictamente por debajo del umbral
#[inline]
pub fn dead_zone(value: f32, threshold: f32) -> f32 {
    if value.abs() < threshold {
        0.0
    } else {
        value
    }
}

/// Magnitud euclídea de un vector
#[inline]
pub fn magnitude(v: Vector3) -> f32 {
    (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt()
}
