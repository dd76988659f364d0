//! Ejemplo de calibración incremental cancelable
//!
//! La calibración avanza una muestra por iteración del bucle principal, así
//! que Ctrl+C la cancela sin esperar. Si se cancela se conservan los offsets
//! nominales. Tras calibrar imprime los ángulos y las variables intermedias.
//!
//! Para ejecutar: cargo run --example linux_calibration_loop --features linux

mod common;

use adxl_tilt_rs::linux::Delay;
use adxl_tilt_rs::{CalibrationStep, EstimatorConfig, OrientationEstimator, PitchFormula};
use std::sync::{Arc, atomic::{AtomicBool, Ordering}};

fn main() {
    println!("ADXL - Calibración incremental");

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();

    ctrlc::set_handler(move || {
        println!("\nDeteniendo el programa...");
        r.store(false, Ordering::SeqCst);
    }).expect("Error al configurar el manejador de Ctrl+C");

    let adc = common::iio_from_args();
    let mut config = EstimatorConfig::default().with_pitch_formula(PitchFormula::ThreeAxis);
    // 3 s de asentamiento a 5 ms por muestra
    config.calibration.settle_samples = 600;
    let sample_delay = config.calibration.sample_delay_ms as u64;

    let mut estimator = common::handle_error(OrientationEstimator::new(adc, Delay {}, config));

    let mut calibrator = estimator.begin_calibration();
    loop {
        if !running.load(Ordering::SeqCst) {
            estimator.cancel_calibration(&mut calibrator);
            println!("Calibración cancelada, se usan los offsets nominales");
            return;
        }

        match common::handle_error(estimator.feed_calibration(&mut calibrator)) {
            CalibrationStep::Settling { remaining } if remaining % 200 == 0 => {
                println!("Asentando... {} muestras", remaining);
            }
            CalibrationStep::Settling { .. } => {}
            CalibrationStep::Collecting { collected, required } => {
                if collected % 25 == 0 {
                    println!("Calibrando {}/{}", collected, required);
                }
            }
            CalibrationStep::Complete(report) => {
                let o = report.offsets.volts;
                println!("Calibración completada: X={:.3}V Y={:.3}V Z={:.3}V", o[0], o[1], o[2]);
                break;
            }
        }
        common::delay_ms(sample_delay);
    }

    while running.load(Ordering::SeqCst) {
        let snapshot = common::handle_error(estimator.diagnostic_snapshot());
        let a = snapshot.acceleration;
        let f = snapshot.filtered;
        println!(
            "Raw: {:?} | Accel(g): {:.3} {:.3} {:.3} | Filtrado: {:.3} {:.3} {:.3} | Mov: {} | Pitch: {:.2} Roll: {:.2}",
            snapshot.raw,
            a[0], a[1], a[2],
            f[0], f[1], f[2],
            if snapshot.moving { "SI" } else { "NO" },
            snapshot.angles.pitch,
            snapshot.angles.roll,
        );
        common::delay_ms(50);
    }

    estimator.reset_filters();
    println!("Ejemplo finalizado");
}
