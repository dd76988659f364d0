//! Biblioteca Rust para estimar la inclinación con acelerómetros analógicos
//!
//! Esta biblioteca convierte las tres tensiones de un acelerómetro analógico
//! de tres ejes (ADXL335/ADXL337) en ángulos de pitch y roll estables:
//! calibración en una postura de referencia, remapeo de ejes, filtrado
//! adaptativo al movimiento y suavizado de ángulos.

use embedded_hal::adc::{Channel, OneShot};
use embedded_hal::blocking::delay::DelayMs;

// Importaciones internas
pub mod angles;
pub mod axis;
pub mod calibration;
pub mod config;
pub mod conversion;
pub mod estimator;
pub mod filter;
pub mod interface;
pub mod motion;
pub mod observer;
pub mod output;
pub mod types;

#[cfg(feature = "linux")]
pub mod linux;

// Re-exports públicos
pub use angles::PitchFormula;
pub use axis::{AxisMap, AxisMapping};
pub use calibration::{CalibrationOffsets, CalibrationReport, CalibrationStep, Calibrator};
pub use config::{EstimatorConfig, SensorModel};
pub use estimator::{DiagnosticSnapshot, OrientationEstimator, OrientationSource, TiltError};
pub use observer::{LogObserver, NullObserver, Observer, PipelineEvent};
pub use types::{Axis, AxisSign, EulerAngles, RawSample};

use crate::interface::AdcInterface;

/// Crea un estimador sobre un ADC one-shot con un canal por eje
pub fn new_adc_estimator<A, ADC, PX, PY, PZ, D, E>(
    adc: ADC,
    pins: (PX, PY, PZ),
    delay: D,
    config: EstimatorConfig,
) -> Result<OrientationEstimator<AdcInterface<A, ADC, PX, PY, PZ>, D>, TiltError>
where
    ADC: OneShot<A, u16, PX, Error = E>
        + OneShot<A, u16, PY, Error = E>
        + OneShot<A, u16, PZ, Error = E>,
    PX: Channel<A>,
    PY: Channel<A>,
    PZ: Channel<A>,
    D: DelayMs<u32>,
{
    let (x, y, z) = pins;
    let max_count = config.adc.full_scale as u16;
    let interface = AdcInterface::new(adc, x, y, z).with_max_count(max_count);
    OrientationEstimator::new(interface, delay, config)
}
