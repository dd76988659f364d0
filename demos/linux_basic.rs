//! Ejemplo básico: calibración y lectura de pitch/roll en Linux
//!
//! Para ejecutar: cargo run --example linux_basic --features linux -- 0 0 1 2

mod common;

use adxl_tilt_rs::linux::Delay;
use adxl_tilt_rs::output::{self, OrientationRecord, CSV_HEADER, INIT_COMPLETE, INIT_START};
use adxl_tilt_rs::{EstimatorConfig, LogObserver, OrientationEstimator, SensorModel};
use std::sync::{Arc, atomic::{AtomicBool, Ordering}};
use std::time::Instant;

fn main() {
    println!("ADXL - Ejemplo básico");

    // Flag para controlar la ejecución del programa
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();

    // Configurar el manejador para Ctrl+C
    ctrlc::set_handler(move || {
        println!("\nDeteniendo el programa...");
        r.store(false, Ordering::SeqCst);
    }).expect("Error al configurar el manejador de Ctrl+C");

    let adc = common::iio_from_args();
    let config = EstimatorConfig::for_model(SensorModel::Adxl337).with_diagnostics(true);

    let mut estimator = common::handle_error(OrientationEstimator::with_observer(
        adc,
        Delay {},
        config,
        LogObserver,
    ));

    println!("{}", INIT_START);
    println!("Coloca el sensor en la posición inicial (3 s)...");
    let report = common::handle_error(estimator.calibrate());
    println!("{}", INIT_COMPLETE);

    let o = report.offsets.volts;
    println!("Offsets: X={:.3}V Y={:.3}V Z={:.3}V", o[0], o[1], o[2]);
    if !report.is_posture_aligned() {
        println!("Aviso: la postura difiere {:.3}g del objetivo", report.alignment_error());
    }

    println!("{}", CSV_HEADER);
    let start = Instant::now();

    while running.load(Ordering::SeqCst) {
        match estimator.read_orientation() {
            Ok(angles) => {
                let elapsed = start.elapsed().as_millis() as u32;
                let record = OrientationRecord::from_angles(angles, false, elapsed, 0);
                println!("{}", output::format_csv_row(&record));
            }
            Err(e) => eprintln!("Error de lectura: {}", e),
        }
        common::delay_ms(20);
    }

    println!("Ejemplo finalizado");
}
