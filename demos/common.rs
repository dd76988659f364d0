//! Utilidades comunes para los ejemplos

#![allow(dead_code)]

use std::env;
use std::time::Duration;

use adxl_tilt_rs::linux::IioAdc;
use adxl_tilt_rs::TiltError;

/// Dispositivo IIO y canales de X, Y, Z desde los argumentos
///
/// Uso: `<ejemplo> [dispositivo] [canal_x canal_y canal_z]`
pub fn iio_from_args() -> IioAdc {
    let args: Vec<u32> = env::args().skip(1).filter_map(|a| a.parse().ok()).collect();
    let device = args.first().copied().unwrap_or(0);
    let channels = match args.get(1..4) {
        Some(&[x, y, z]) => [x, y, z],
        _ => [0, 1, 2],
    };

    match IioAdc::new(device, channels) {
        Ok(adc) => adc.with_max_count(1023),
        Err(e) => {
            eprintln!("Error al abrir iio:device{}: {:?}", device, e);
            std::process::exit(1);
        }
    }
}

/// Helper para manejar errores en los ejemplos
pub fn handle_error<T>(result: Result<T, TiltError>) -> T {
    match result {
        Ok(val) => val,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Función para pausar la ejecución por un tiempo determinado
pub fn delay_ms(ms: u64) {
    std::thread::sleep(Duration::from_millis(ms));
}
