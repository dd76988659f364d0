//! Fuente analógica para Linux sobre el subsistema IIO
//!
//! Lee `in_voltage<N>_raw` de `/sys/bus/iio/devices/iio:device<M>/`. El
//! retardo se toma de `linux_embedded_hal::Delay`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::interface::{AnalogSource, InterfaceError};
use crate::types::RawSample;

const IIO_ROOT: &str = "/sys/bus/iio/devices";

pub use linux_embedded_hal::Delay;

/// ADC expuesto por IIO con un canal por eje físico
#[derive(Debug, Clone)]
pub struct IioAdc {
    channels: [PathBuf; 3],
    max_count: u16,
}

impl IioAdc {
    /// Abre `iio:device<device>` con los canales de X, Y y Z
    pub fn new(device: u32, channels: [u32; 3]) -> Result<Self, InterfaceError<io::Error>> {
        let base = Path::new(IIO_ROOT).join(format!("iio:device{}", device));
        Self::from_dir(base, channels)
    }

    /// Igual que `new` pero con un directorio arbitrario
    pub fn from_dir<P: AsRef<Path>>(
        dir: P,
        channels: [u32; 3],
    ) -> Result<Self, InterfaceError<io::Error>> {
        let dir = dir.as_ref();
        if channels[0] == channels[1] || channels[0] == channels[2] || channels[1] == channels[2] {
            return Err(InterfaceError::InvalidParameter);
        }

        let channels = channels.map(|c| dir.join(format!("in_voltage{}_raw", c)));
        for path in &channels {
            if !path.exists() {
                return Err(InterfaceError::AdcError(io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("{} not found", path.display()),
                )));
            }
        }

        Ok(Self {
            channels,
            max_count: u16::MAX,
        })
    }

    /// Limita la cuenta válida (p. ej. 4095 para 12 bits)
    pub fn with_max_count(mut self, max_count: u16) -> Self {
        self.max_count = max_count;
        self
    }

    fn read_channel(path: &Path) -> Result<u16, InterfaceError<io::Error>> {
        let text = fs::read_to_string(path).map_err(InterfaceError::AdcError)?;
        text.trim().parse().map_err(|_| InterfaceError::OutOfRange)
    }
}

impl AnalogSource for IioAdc {
    type Error = InterfaceError<io::Error>;

    fn read_axes(&mut self) -> Result<RawSample, Self::Error> {
        let mut sample = [0u16; 3];
        for (value, path) in sample.iter_mut().zip(self.channels.iter()) {
            *value = Self::read_channel(path)?;
        }
        if sample.iter().any(|&v| v > self.max_count) {
            return Err(InterfaceError::OutOfRange);
        }
        Ok(sample)
    }
}
