//! Observadores de diagnóstico
//!
//! El estimador publica eventos de su ciclo de vida a un `Observer` sólo si
//! `EstimatorConfig::diagnostics` está activo. Los valores calculados no
//! dependen nunca del observador.

use crate::calibration::CalibrationReport;
use crate::estimator::DiagnosticSnapshot;

/// Eventos publicados por el estimador
#[derive(Debug, Clone, Copy)]
pub enum PipelineEvent<'a> {
    /// Empieza una calibración de `samples` muestras
    CalibrationStarted { samples: usize },
    /// Calibración terminada y offsets instalados
    CalibrationComplete(&'a CalibrationReport),
    /// Calibración cancelada, se conservan los offsets anteriores
    CalibrationCancelled,
    /// Un ciclo de lectura completo
    Cycle(&'a DiagnosticSnapshot),
    /// Filtros reiniciados
    FiltersReset,
}

/// Receptor de eventos de diagnóstico
pub trait Observer {
    fn on_event(&mut self, event: &PipelineEvent<'_>);
}

impl<F> Observer for F
where
    F: FnMut(&PipelineEvent<'_>),
{
    fn on_event(&mut self, event: &PipelineEvent<'_>) {
        self(event)
    }
}

/// Descarta todos los eventos
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl Observer for NullObserver {
    fn on_event(&mut self, _event: &PipelineEvent<'_>) {}
}

/// Reenvía los eventos a la fachada `log`
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl Observer for LogObserver {
    fn on_event(&mut self, event: &PipelineEvent<'_>) {
        match event {
            PipelineEvent::CalibrationStarted { samples } => {
                log::info!("=== Calibración ADXL ({} muestras) ===", samples);
                log::info!("Mantén la posición inicial");
            }
            PipelineEvent::CalibrationComplete(report) => {
                let v = report.reference_voltages;
                log::info!(
                    "Tensiones de calibración - X: {:.3}V, Y: {:.3}V, Z: {:.3}V",
                    v[0], v[1], v[2]
                );
                let p = report.nominal_physical;
                log::debug!(
                    "Aceleraciones físicas nominales - X: {:.3}g, Y: {:.3}g, Z: {:.3}g",
                    p[0], p[1], p[2]
                );
                let l = report.nominal_logical;
                log::debug!(
                    "Aceleraciones lógicas nominales - X: {:.3}g, Y: {:.3}g, Z: {:.3}g",
                    l[0], l[1], l[2]
                );
                let t = report.target_physical;
                log::debug!(
                    "Valores físicos objetivo - X: {:.3}g, Y: {:.3}g, Z: {:.3}g",
                    t[0], t[1], t[2]
                );
                let o = report.offsets.volts;
                log::info!(
                    "Offsets finales - X: {:.3}V, Y: {:.3}V, Z: {:.3}V",
                    o[0], o[1], o[2]
                );
                let f = report.verified_logical;
                log::info!(
                    "Verificación lógica - X: {:.3}g, Y: {:.3}g, Z: {:.3}g",
                    f[0], f[1], f[2]
                );
                log::info!("Calibración completada");
            }
            PipelineEvent::CalibrationCancelled => {
                log::warn!("Calibration cancelled, previous offsets kept");
            }
            PipelineEvent::Cycle(snapshot) => {
                let r = snapshot.raw;
                let a = snapshot.acceleration;
                let f = snapshot.filtered;
                log::debug!(
                    "Raw ADC: X={} Y={} Z={} | Accel(g): X={:.3} Y={:.3} Z={:.3} | Filtered: X={:.3} Y={:.3} Z={:.3} | Moving: {} | Pitch: {:.2} Roll: {:.2}",
                    r[0], r[1], r[2],
                    a[0], a[1], a[2],
                    f[0], f[1], f[2],
                    if snapshot.moving { "YES" } else { "NO" },
                    snapshot.angles.pitch,
                    snapshot.angles.roll,
                );
            }
            PipelineEvent::FiltersReset => {
                log::debug!("Filtros reiniciados");
            }
        }
    }
}
