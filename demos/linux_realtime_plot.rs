//! Ejemplo de visualización en tiempo real de pitch y roll en Linux
//!
//! Guarda el gráfico en `tilt_plot.png` y muestra los últimos ángulos en
//! una línea de estado de la terminal.
//!
//! Para ejecutar: cargo run --example linux_realtime_plot --features plotting
//!
//! Dependencias necesarias:
//! - plotters = "0.3"
//! - crossterm = "0.25"

mod common;

use adxl_tilt_rs::linux::Delay;
use adxl_tilt_rs::{EstimatorConfig, OrientationEstimator};
use crossterm::{cursor, terminal, QueueableCommand};
use plotters::prelude::*;
use std::error::Error;
use std::io::{stdout, Write};
use std::sync::{Arc, atomic::{AtomicBool, Ordering}};
use std::time::{Duration, Instant};

const PLOT_WIDTH: u32 = 800;
const PLOT_HEIGHT: u32 = 600;
const PLOT_POINTS: usize = 100;

fn main() -> Result<(), Box<dyn Error>> {
    println!("ADXL - Gráfico de inclinación en tiempo real");

    // Flag para controlar la ejecución del programa
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();

    // Configurar el manejador para Ctrl+C
    ctrlc::set_handler(move || {
        println!("\nDeteniendo el programa...");
        r.store(false, Ordering::SeqCst);
    }).expect("Error al configurar el manejador de Ctrl+C");

    let adc = common::iio_from_args();
    let mut estimator = OrientationEstimator::new(adc, Delay {}, EstimatorConfig::default())?;

    println!("Calibrando, mantén la posición inicial...");
    estimator.calibrate()?;
    println!("Calibración completada");

    // Historial de ángulos
    let mut pitch = vec![0.0; PLOT_POINTS];
    let mut roll = vec![0.0; PLOT_POINTS];

    let root = BitMapBackend::new("tilt_plot.png", (PLOT_WIDTH, PLOT_HEIGHT))
        .into_drawing_area();
    let mut out = stdout();

    println!("Graficando pitch/roll. Presiona Ctrl+C para detener...");

    let mut last_update = Instant::now();

    while running.load(Ordering::SeqCst) {
        // El filtro corre a ~50 Hz, el gráfico se refresca a 10 Hz
        let angles = estimator.read_orientation()?;
        pitch.remove(0);
        roll.remove(0);
        pitch.push(angles.pitch as f64);
        roll.push(angles.roll as f64);
        std::thread::sleep(Duration::from_millis(20));

        if last_update.elapsed() < Duration::from_millis(100) {
            continue;
        }
        last_update = Instant::now();

        out.queue(cursor::MoveToColumn(0))?
            .queue(terminal::Clear(terminal::ClearType::CurrentLine))?;
        write!(out, "Pitch: {:7.2}°  Roll: {:7.2}°", angles.pitch, angles.roll)?;
        out.flush()?;

        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .caption("Inclinación", ("sans-serif", 30))
            .margin(10)
            .x_label_area_size(30)
            .y_label_area_size(40)
            .build_cartesian_2d(0..PLOT_POINTS, -180.0..180.0)?;

        chart.configure_mesh()
            .x_labels(5)
            .y_labels(9)
            .x_desc("Muestras")
            .y_desc("Ángulo (°)")
            .draw()?;

        chart.draw_series(LineSeries::new(
            (0..PLOT_POINTS).map(|i| (i, pitch[i])),
            &RED,
        ))?
        .label("Pitch")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &RED));

        chart.draw_series(LineSeries::new(
            (0..PLOT_POINTS).map(|i| (i, roll[i])),
            &BLUE,
        ))?
        .label("Roll")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &BLUE));

        chart.configure_series_labels()
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()?;

        root.present()?;
    }

    println!();
    println!("Gráfico guardado como 'tilt_plot.png'");
    println!("Ejemplo finalizado");

    Ok(())
}
