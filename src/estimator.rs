use core::fmt;

use crate::angles::AngleCalculator;
use crate::calibration::{self, CalibrationOffsets, CalibrationReport, CalibrationStep, Calibrator};
use crate::config::EstimatorConfig;
use crate::conversion::{sample_to_voltage, voltages_to_g};
use crate::filter::{normalize, AdaptiveFilter, AngleSmoother};
use crate::interface::AnalogSource;
use crate::motion::MotionDetector;
use crate::observer::{NullObserver, Observer, PipelineEvent};
use crate::types::{EulerAngles, RawSample, Vector3};
use embedded_hal::blocking::delay::DelayMs;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TiltError {
    /// La fuente analógica falló
    Interface,
    /// Mapa de ejes no biyectivo
    InvalidAxisMap,
    InvalidParameter,
    CalibrationCancelled,
    /// Registro de salida mal formado
    Parse,
}

impl fmt::Display for TiltError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            TiltError::Interface => "analog source error",
            TiltError::InvalidAxisMap => "axis map is not a bijection",
            TiltError::InvalidParameter => "invalid parameter",
            TiltError::CalibrationCancelled => "calibration cancelled",
            TiltError::Parse => "malformed record",
        };
        f.write_str(msg)
    }
}

impl std::error::Error for TiltError {}

/// Fuente de ángulos de Euler
///
/// La implementa el estimador del acelerómetro; un IMU absoluto puede
/// implementarla fuera de este crate y seleccionarse en su lugar.
pub trait OrientationSource {
    fn read_euler(&mut self) -> Result<EulerAngles, TiltError>;
}

/// Estado intermedio de un ciclo de lectura
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiagnosticSnapshot {
    /// Cuentas del ADC por eje físico
    pub raw: RawSample,
    /// Tensiones por eje físico (V)
    pub voltage: Vector3,
    /// Aceleración por eje físico (g)
    pub physical: Vector3,
    /// Aceleración lógica (g)
    pub acceleration: Vector3,
    /// Vector filtrado y normalizado (g)
    pub filtered: Vector3,
    pub moving: bool,
    /// Ángulos suavizados
    pub angles: EulerAngles,
}

/// Estimador de inclinación para un acelerómetro analógico de tres ejes
///
/// Es el único dueño del estado: offsets de calibración, detector de
/// movimiento y filtros. No hay estado global.
pub struct OrientationEstimator<S, D, O = NullObserver> {
    source: S,
    delay: D,
    observer: O,
    config: EstimatorConfig,
    offsets: CalibrationOffsets,
    calibrated: bool,
    motion: MotionDetector,
    filter: AdaptiveFilter,
    calculator: AngleCalculator,
    smoother: AngleSmoother,
}

impl<S, D> OrientationEstimator<S, D, NullObserver> {
    /// Crea un estimador sin observador de diagnóstico
    pub fn new(source: S, delay: D, config: EstimatorConfig) -> Result<Self, TiltError> {
        Self::with_observer(source, delay, config, NullObserver)
    }
}

impl<S, D, O> OrientationEstimator<S, D, O> {
    /// Crea un estimador validando la configuración
    pub fn with_observer(
        source: S,
        delay: D,
        config: EstimatorConfig,
        observer: O,
    ) -> Result<Self, TiltError> {
        config.validate()?;

        Ok(Self {
            source,
            delay,
            observer,
            offsets: CalibrationOffsets::nominal(&config.sensor),
            calibrated: false,
            motion: MotionDetector::new(config.filter.movement_threshold),
            filter: AdaptiveFilter::from_config(&config.filter),
            calculator: AngleCalculator::new(config.pitch_formula, config.filter.roll_epsilon),
            smoother: AngleSmoother::new(config.filter.alpha_angles),
            config,
        })
    }

    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    /// Offsets en uso (nominales si nunca se ha calibrado)
    pub fn offsets(&self) -> CalibrationOffsets {
        self.offsets
    }

    pub fn is_calibrated(&self) -> bool {
        self.calibrated
    }

    /// Instala offsets guardados de una calibración anterior
    pub fn restore_offsets(&mut self, offsets: CalibrationOffsets) {
        self.offsets = offsets;
        self.calibrated = true;
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    /// Consume el estimador y devuelve sus colaboradores
    pub fn release(self) -> (S, D, O) {
        (self.source, self.delay, self.observer)
    }
}

impl<S, D, O> OrientationEstimator<S, D, O>
where
    O: Observer,
{
    fn emit(&mut self, event: PipelineEvent<'_>) {
        if self.config.diagnostics {
            self.observer.on_event(&event);
        }
    }

    /// Ejecuta un ciclo completo sobre una muestra ya adquirida
    pub fn process_sample(&mut self, raw: RawSample) -> DiagnosticSnapshot {
        let adc = self.config.adc;
        let voltage = sample_to_voltage(raw, adc.supply_voltage, adc.full_scale);
        let physical = voltages_to_g(voltage, self.offsets.volts, self.config.sensor.sensitivity);
        let acceleration = self.config.axis_map.remap(physical);

        // 1. Movimiento para el filtrado adaptativo
        let moving = self.motion.update(acceleration);
        // 2 y 3. Zona muerta + EMA
        let filtered = self.filter.filter(acceleration, moving);
        // 4. Normalización del vector de gravedad, queda como estado del filtro
        let filtered = normalize(filtered, self.config.filter.normalize_band);
        self.filter.set_filtered(filtered);

        let (pitch, roll) = self.calculator.angles(filtered);
        // 5. Suavizado de los ángulos
        let (pitch, roll) = self.smoother.smooth(pitch, roll);

        let snapshot = DiagnosticSnapshot {
            raw,
            voltage,
            physical,
            acceleration,
            filtered,
            moving,
            angles: EulerAngles::tilt(pitch, roll),
        };
        self.emit(PipelineEvent::Cycle(&snapshot));
        snapshot
    }

    /// Reinicia filtros y detector de movimiento; conserva la calibración
    pub fn reset_filters(&mut self) {
        self.filter.reset();
        self.smoother.reset();
        self.motion.reset();
        self.emit(PipelineEvent::FiltersReset);
    }

    /// Prepara una calibración incremental
    pub fn begin_calibration(&mut self) -> Calibrator {
        self.emit(PipelineEvent::CalibrationStarted {
            samples: self.config.calibration.samples,
        });
        Calibrator::new(&self.config)
    }

    /// Empuja una muestra a la calibración; instala los offsets al terminar
    pub fn push_calibration_sample(
        &mut self,
        calibrator: &mut Calibrator,
        raw: RawSample,
    ) -> Result<CalibrationStep, TiltError> {
        let already_done = calibrator.is_complete();
        let step = calibrator.push(raw)?;
        if let CalibrationStep::Complete(report) = step {
            if !already_done {
                self.install(&report);
            }
        }
        Ok(step)
    }

    /// Cancela una calibración en curso sin tocar los offsets
    pub fn cancel_calibration(&mut self, calibrator: &mut Calibrator) {
        if !calibrator.is_complete() && !calibrator.is_cancelled() {
            calibrator.cancel();
            self.emit(PipelineEvent::CalibrationCancelled);
        }
    }

    fn install(&mut self, report: &CalibrationReport) {
        self.offsets = report.offsets;
        self.calibrated = true;
        self.emit(PipelineEvent::CalibrationComplete(report));
    }
}

impl<S, D, O> OrientationEstimator<S, D, O>
where
    S: AnalogSource,
    TiltError: From<S::Error>,
    O: Observer,
{
    /// Lee una muestra y la pasa a la calibración incremental
    pub fn feed_calibration(
        &mut self,
        calibrator: &mut Calibrator,
    ) -> Result<CalibrationStep, TiltError> {
        if calibrator.is_cancelled() {
            return Err(TiltError::CalibrationCancelled);
        }
        if let Some(report) = calibrator.report() {
            return Ok(CalibrationStep::Complete(report));
        }
        let raw = self.source.read_axes()?;
        self.push_calibration_sample(calibrator, raw)
    }

    /// Un ciclo de lectura filtrado
    pub fn read_orientation(&mut self) -> Result<EulerAngles, TiltError> {
        Ok(self.diagnostic_snapshot()?.angles)
    }

    /// Un ciclo de lectura devolviendo también el estado intermedio
    pub fn diagnostic_snapshot(&mut self) -> Result<DiagnosticSnapshot, TiltError> {
        let raw = self.source.read_axes()?;
        Ok(self.process_sample(raw))
    }
}

impl<S, D, O> OrientationEstimator<S, D, O>
where
    S: AnalogSource,
    TiltError: From<S::Error>,
    D: DelayMs<u32>,
    O: Observer,
{
    /// Calibración bloqueante con los tiempos de la configuración
    pub fn calibrate(&mut self) -> Result<CalibrationReport, TiltError> {
        self.emit(PipelineEvent::CalibrationStarted {
            samples: self.config.calibration.samples,
        });
        match calibration::calibrate_blocking(&mut self.source, &mut self.delay, &self.config) {
            Ok(report) => {
                self.install(&report);
                Ok(report)
            }
            Err(e) => {
                // Calibración abortada, siguen los offsets anteriores
                self.emit(PipelineEvent::CalibrationCancelled);
                Err(e)
            }
        }
    }
}

impl<S, D, O> OrientationSource for OrientationEstimator<S, D, O>
where
    S: AnalogSource,
    TiltError: From<S::Error>,
    O: Observer,
{
    fn read_euler(&mut self) -> Result<EulerAngles, TiltError> {
        self.read_orientation()
    }
}
