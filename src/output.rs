//! Registros de salida hacia el host
//!
//! Dos formatos: la línea de texto `DATA,...` que lee el servidor por el
//! puerto serie y un paquete binario de tamaño fijo para enlaces rápidos.

use core::mem;

use crate::types::EulerAngles;
use crate::TiltError;
use bytemuck::{Pod, Zeroable};

/// Cabecera CSV del flujo de texto
pub const CSV_HEADER: &str = "vert,lat,tors,inTarget,tempoPos,rep";
/// Marcador emitido antes de calibrar
pub const INIT_START: &str = "INIT_START";
/// Marcador emitido tras calibrar
pub const INIT_COMPLETE: &str = "INIT_COMPLETE";

const DATA_PREFIX: &str = "DATA";
const DATA_FIELDS: usize = 6;

/// Una muestra de orientación tal como la consume el host
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrientationRecord {
    /// Pitch (°)
    pub vert: f32,
    /// Roll (°)
    pub lat: f32,
    /// Yaw (°), NaN sin IMU absoluto
    pub tors: f32,
    pub in_target: bool,
    pub time_in_position_ms: u32,
    pub repetitions: u32,
}

impl OrientationRecord {
    pub fn from_angles(
        angles: EulerAngles,
        in_target: bool,
        time_in_position_ms: u32,
        repetitions: u32,
    ) -> Self {
        Self {
            vert: angles.pitch,
            lat: angles.roll,
            tors: angles.yaw,
            in_target,
            time_in_position_ms,
            repetitions,
        }
    }

    pub fn angles(&self) -> EulerAngles {
        EulerAngles {
            pitch: self.vert,
            roll: self.lat,
            yaw: self.tors,
        }
    }
}

/// `DATA,<vert>,<lat>,<tors>,<0|1>,<ms>,<rep>` con dos decimales
pub fn format_csv_row(record: &OrientationRecord) -> String {
    format!(
        "{},{:.2},{:.2},{},{},{},{}",
        DATA_PREFIX,
        record.vert,
        record.lat,
        format_angle(record.tors),
        record.in_target as u8,
        record.time_in_position_ms,
        record.repetitions
    )
}

fn format_angle(value: f32) -> String {
    if value.is_finite() {
        format!("{:.2}", value)
    } else {
        "NaN".to_string()
    }
}

/// Interpreta una línea `DATA,...`
pub fn parse_data_line(line: &str) -> Result<OrientationRecord, TiltError> {
    let mut parts = line.trim().split(',');
    if parts.next() != Some(DATA_PREFIX) {
        return Err(TiltError::Parse);
    }
    let fields: Vec<&str> = parts.map(str::trim).collect();
    if fields.len() != DATA_FIELDS {
        return Err(TiltError::Parse);
    }

    let in_target = match fields[3] {
        "0" => false,
        "1" => true,
        _ => return Err(TiltError::Parse),
    };

    Ok(OrientationRecord {
        vert: parse_angle(fields[0])?,
        lat: parse_angle(fields[1])?,
        tors: parse_angle(fields[2])?,
        in_target,
        time_in_position_ms: fields[4].parse().map_err(|_| TiltError::Parse)?,
        repetitions: fields[5].parse().map_err(|_| TiltError::Parse)?,
    })
}

fn parse_angle(field: &str) -> Result<f32, TiltError> {
    let value: f32 = field.parse().map_err(|_| TiltError::Parse)?;
    Ok(if value.is_finite() { value } else { f32::NAN })
}

/// Versión actual del paquete binario
pub const PACKET_VERSION: u8 = 2;
/// Cabecera mágica
pub const PACKET_MAGIC: u16 = 0xAD33;

/// Paquete binario de orientación (32 bytes, orden de bytes nativo)
///
/// Versión de protocolo 2: repeticiones de 32 bits
///
/// Layout:
/// - Cabecera (8 bytes): magic, versión, in_target, timestamp
/// - Ángulos (12 bytes): pitch, roll, yaw
/// - Estado (8 bytes): tiempo en posición, repeticiones
/// - Reservado (2 bytes)
/// - Checksum (2 bytes)
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct OrientationPacket {
    pub magic: u16,
    pub version: u8,
    pub in_target: u8,
    pub timestamp_ms: u32,

    pub pitch: f32,
    pub roll: f32,
    pub yaw: f32,

    pub time_in_position_ms: u32,
    pub repetitions: u32,

    pub reserved: u16,
    pub checksum: u16,
}

impl OrientationPacket {
    pub const SIZE: usize = mem::size_of::<Self>();

    pub fn new(record: &OrientationRecord, timestamp_ms: u32) -> Self {
        let mut packet = Self {
            magic: PACKET_MAGIC,
            version: PACKET_VERSION,
            in_target: record.in_target as u8,
            timestamp_ms,
            pitch: record.vert,
            roll: record.lat,
            yaw: record.tors,
            time_in_position_ms: record.time_in_position_ms,
            repetitions: record.repetitions,
            reserved: 0,
            checksum: 0,
        };
        packet.checksum = packet.compute_checksum();
        packet
    }

    /// Suma simple de todos los bytes salvo el checksum
    fn compute_checksum(&self) -> u16 {
        bytemuck::bytes_of(self)[..Self::SIZE - 2]
            .iter()
            .fold(0u16, |acc, &b| acc.wrapping_add(b as u16))
    }

    pub fn to_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }

    /// Decodifica y verifica magic, versión y checksum
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TiltError> {
        let packet: Self =
            bytemuck::try_pod_read_unaligned(bytes).map_err(|_| TiltError::Parse)?;

        if packet.magic != PACKET_MAGIC || packet.version != PACKET_VERSION {
            return Err(TiltError::Parse);
        }
        if packet.checksum != packet.compute_checksum() {
            return Err(TiltError::Parse);
        }
        Ok(packet)
    }

    pub fn record(&self) -> OrientationRecord {
        OrientationRecord {
            vert: self.pitch,
            lat: self.roll,
            tors: self.yaw,
            in_target: self.in_target != 0,
            time_in_position_ms: self.time_in_position_ms,
            repetitions: self.repetitions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> OrientationRecord {
        OrientationRecord::from_angles(EulerAngles::tilt(12.345, -3.5), true, 1500, 7)
    }

    #[test]
    fn test_csv_row_prints_nan_yaw() {
        assert_eq!(format_csv_row(&record()), "DATA,12.35,-3.50,NaN,1,1500,7");
    }

    #[test]
    fn test_csv_row_with_yaw() {
        let mut r = record();
        r.tors = 45.0;
        r.in_target = false;
        assert_eq!(format_csv_row(&r), "DATA,12.35,-3.50,45.00,0,1500,7");
    }

    #[test]
    fn test_parse_formatted_line() {
        let parsed = parse_data_line(&format_csv_row(&record())).unwrap();
        assert!((parsed.vert - 12.35).abs() < 1e-4);
        assert_eq!(parsed.lat, -3.5);
        assert!(parsed.tors.is_nan());
        assert!(parsed.in_target);
        assert_eq!(parsed.angles().roll, -3.5);
        assert!(!parsed.angles().has_yaw());
        assert_eq!(parsed.time_in_position_ms, 1500);
        assert_eq!(parsed.repetitions, 7);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert_eq!(parse_data_line(CSV_HEADER), Err(TiltError::Parse));
        assert_eq!(parse_data_line(INIT_COMPLETE), Err(TiltError::Parse));
        assert_eq!(parse_data_line("DATA,1.0,2.0,NaN,1,100"), Err(TiltError::Parse));
        assert_eq!(parse_data_line("DATA,1.0,2.0,NaN,2,100,1"), Err(TiltError::Parse));
        assert_eq!(parse_data_line("DATA,x,2.0,NaN,1,100,1"), Err(TiltError::Parse));
        assert_eq!(parse_data_line("DATA,1.0,2.0,NaN,1,-5,1"), Err(TiltError::Parse));
    }

    #[test]
    fn test_repetitions_above_u16() {
        let parsed = parse_data_line("DATA,1.00,2.00,NaN,1,100,70000").unwrap();
        assert_eq!(parsed.repetitions, 70_000);

        let packet = OrientationPacket::new(&parsed, 0);
        let decoded = OrientationPacket::from_bytes(packet.to_bytes()).unwrap();
        assert_eq!(decoded.record().repetitions, 70_000);
    }

    #[test]
    fn test_parse_tolerates_line_ending() {
        let parsed = parse_data_line("DATA,0.00,0.00,inf,0,0,0\r\n").unwrap();
        assert!(parsed.tors.is_nan());
        assert!(!parsed.in_target);
    }

    #[test]
    fn test_packet_layout() {
        assert_eq!(OrientationPacket::SIZE, 32);
        let packet = OrientationPacket::new(&record(), 42);
        assert_eq!(packet.to_bytes().len(), 32);
    }

    #[test]
    fn test_packet_decode_and_checksum() {
        let packet = OrientationPacket::new(&record(), 42);
        let mut bytes = packet.to_bytes().to_vec();

        let decoded = OrientationPacket::from_bytes(&bytes).unwrap();
        assert_eq!(decoded.timestamp_ms, 42);
        assert_eq!(decoded.record().repetitions, 7);
        assert!(decoded.record().tors.is_nan());

        // Un byte alterado en el payload invalida el paquete
        bytes[10] ^= 0x01;
        assert_eq!(OrientationPacket::from_bytes(&bytes), Err(TiltError::Parse));
        assert_eq!(OrientationPacket::from_bytes(&bytes[..20]), Err(TiltError::Parse));
    }

    #[test]
    fn test_packet_rejects_bad_magic() {
        let mut packet = OrientationPacket::new(&record(), 0);
        packet.magic = 0x1234;
        packet.checksum = packet.compute_checksum();
        assert_eq!(
            OrientationPacket::from_bytes(packet.to_bytes()),
            Err(TiltError::Parse)
        );
    }
}
