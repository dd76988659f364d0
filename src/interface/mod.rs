//! Módulo de abstracción para la fuente de muestras analógicas
//!
//! El estimador sólo necesita tres cuentas de ADC por lectura. El trait
//! `AnalogSource` abstrae de dónde salen: un ADC de `embedded-hal` con tres
//! canales, el IIO de Linux o una fuente simulada.

use core::marker::PhantomData;

use crate::types::RawSample;
use crate::TiltError;
use embedded_hal::adc::{Channel, OneShot};

/// Error genérico para las fuentes analógicas
#[derive(Debug, Clone, PartialEq)]
pub enum InterfaceError<E> {
    /// Error del conversor
    AdcError(E),
    /// Lectura fuera de rango
    OutOfRange,
    /// Parámetro inválido
    InvalidParameter,
}

/// Trait para abstraer la adquisición de una muestra de tres ejes
pub trait AnalogSource {
    /// Tipo de error que puede producir la fuente
    type Error;

    /// Lee una cuenta de ADC por eje físico [x, y, z]
    fn read_axes(&mut self) -> Result<RawSample, Self::Error>;
}

impl<S: AnalogSource + ?Sized> AnalogSource for &mut S {
    type Error = S::Error;

    fn read_axes(&mut self) -> Result<RawSample, Self::Error> {
        (**self).read_axes()
    }
}

/// Implementación de AnalogSource para un ADC one-shot de `embedded-hal`
///
/// `A` es el tipo marcador del ADC al que pertenecen los canales.
pub struct AdcInterface<A, ADC, PX, PY, PZ> {
    adc: ADC,
    x: PX,
    y: PY,
    z: PZ,
    max_count: u16,
    _adc: PhantomData<A>,
}

impl<A, ADC, PX, PY, PZ> AdcInterface<A, ADC, PX, PY, PZ>
where
    PX: Channel<A>,
    PY: Channel<A>,
    PZ: Channel<A>,
{
    /// Crea una nueva interfaz con los tres canales del acelerómetro
    pub fn new(adc: ADC, x: PX, y: PY, z: PZ) -> Self {
        Self {
            adc,
            x,
            y,
            z,
            max_count: u16::MAX,
            _adc: PhantomData,
        }
    }

    /// Limita la cuenta válida (p. ej. 1023 para un ADC de 10 bits)
    pub fn with_max_count(mut self, max_count: u16) -> Self {
        self.max_count = max_count;
        self
    }

    /// Consume la interfaz y devuelve el ADC y los canales
    pub fn release(self) -> (ADC, PX, PY, PZ) {
        (self.adc, self.x, self.y, self.z)
    }
}

impl<A, ADC, PX, PY, PZ, E> AnalogSource for AdcInterface<A, ADC, PX, PY, PZ>
where
    ADC: OneShot<A, u16, PX, Error = E>
        + OneShot<A, u16, PY, Error = E>
        + OneShot<A, u16, PZ, Error = E>,
    PX: Channel<A>,
    PY: Channel<A>,
    PZ: Channel<A>,
{
    type Error = InterfaceError<E>;

    fn read_axes(&mut self) -> Result<RawSample, Self::Error> {
        let x = nb::block!(OneShot::<A, u16, PX>::read(&mut self.adc, &mut self.x))
            .map_err(InterfaceError::AdcError)?;
        let y = nb::block!(OneShot::<A, u16, PY>::read(&mut self.adc, &mut self.y))
            .map_err(InterfaceError::AdcError)?;
        let z = nb::block!(OneShot::<A, u16, PZ>::read(&mut self.adc, &mut self.z))
            .map_err(InterfaceError::AdcError)?;

        let sample = [x, y, z];
        if sample.iter().any(|&v| v > self.max_count) {
            return Err(InterfaceError::OutOfRange);
        }
        Ok(sample)
    }
}

// Implementación que permite convertir errores de la interfaz a TiltError
impl<E> From<InterfaceError<E>> for TiltError {
    fn from(error: InterfaceError<E>) -> Self {
        match error {
            InterfaceError::AdcError(_) => TiltError::Interface,
            InterfaceError::OutOfRange => TiltError::Interface,
            InterfaceError::InvalidParameter => TiltError::InvalidParameter,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockAdc {
        values: [u16; 3],
        pending: u8,
        fail: bool,
    }

    struct Adc0;
    struct PinX;
    struct PinY;
    struct PinZ;

    macro_rules! channel {
        ($pin:ty, $id:expr) => {
            impl Channel<Adc0> for $pin {
                type ID = u8;

                fn channel() -> u8 {
                    $id
                }
            }

            impl OneShot<Adc0, u16, $pin> for MockAdc {
                type Error = ();

                fn read(&mut self, _pin: &mut $pin) -> nb::Result<u16, ()> {
                    if self.fail {
                        return Err(nb::Error::Other(()));
                    }
                    // Simula una conversión que necesita un sondeo extra
                    if self.pending > 0 {
                        self.pending -= 1;
                        return Err(nb::Error::WouldBlock);
                    }
                    self.pending = 1;
                    Ok(self.values[$id])
                }
            }
        };
    }

    channel!(PinX, 0);
    channel!(PinY, 1);
    channel!(PinZ, 2);

    fn interface(values: [u16; 3], fail: bool) -> AdcInterface<Adc0, MockAdc, PinX, PinY, PinZ> {
        let adc = MockAdc {
            values,
            pending: 1,
            fail,
        };
        AdcInterface::new(adc, PinX, PinY, PinZ)
    }

    #[test]
    fn test_reads_three_channels_in_order() {
        let mut source = interface([510, 512, 640], false);
        assert_eq!(source.read_axes(), Ok([510, 512, 640]));
    }

    #[test]
    fn test_adc_error_maps_to_tilt_error() {
        let mut source = interface([0, 0, 0], true);
        let err = source.read_axes().unwrap_err();
        assert_eq!(err, InterfaceError::AdcError(()));
        assert_eq!(TiltError::from(err), TiltError::Interface);
    }

    #[test]
    fn test_out_of_range_count() {
        let mut source = interface([1024, 0, 0], false).with_max_count(1023);
        assert_eq!(source.read_axes(), Err(InterfaceError::OutOfRange));
    }

    #[test]
    fn test_mut_ref_is_a_source() {
        fn read_twice<S: AnalogSource>(mut source: S) -> Result<RawSample, S::Error> {
            source.read_axes()?;
            source.read_axes()
        }

        let mut source = interface([1, 2, 3], false);
        assert_eq!(read_twice(&mut source), Ok([1, 2, 3]));
    }
}
