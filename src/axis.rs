//! Mapeo de ejes físicos a ejes lógicos
//!
//! Cada eje lógico lee exactamente un eje físico con un signo. El mapa se
//! valida al construirse: una asignación que no sea biyectiva perdería o
//! duplicaría datos físicos, así que se rechaza.

use crate::types::{Axis, AxisSign, Vector3};
use crate::TiltError;

/// Origen de un eje lógico
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisMapping {
    /// Eje físico del que se lee
    pub source: Axis,
    /// Signo aplicado
    pub sign: AxisSign,
}

impl AxisMapping {
    pub const fn new(source: Axis, sign: AxisSign) -> Self {
        Self { source, sign }
    }
}

/// Mapa lógico → físico para los ejes [X, Y, Z]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisMap {
    mappings: [AxisMapping; 3],
}

impl AxisMap {
    /// Crea un mapa validando que cada eje físico se use una sola vez
    pub fn new(x: AxisMapping, y: AxisMapping, z: AxisMapping) -> Result<Self, TiltError> {
        let mut used = [false; 3];
        for mapping in [x, y, z] {
            let idx = mapping.source.index();
            if used[idx] {
                return Err(TiltError::InvalidAxisMap);
            }
            used[idx] = true;
        }

        Ok(Self {
            mappings: [x, y, z],
        })
    }

    /// Mapa identidad (lógico == físico)
    pub const fn identity() -> Self {
        Self {
            mappings: [
                AxisMapping::new(Axis::X, AxisSign::Positive),
                AxisMapping::new(Axis::Y, AxisSign::Positive),
                AxisMapping::new(Axis::Z, AxisSign::Positive),
            ],
        }
    }

    /// Parsea una descripción compacta como `"-Z,+Y,-X"` (X, Y, Z lógicos)
    pub fn parse(text: &str) -> Result<Self, TiltError> {
        let mut parts = text.split(',').map(str::trim);
        let mut next = || -> Result<AxisMapping, TiltError> {
            let part = parts.next().ok_or(TiltError::InvalidAxisMap)?;
            let (sign, axis) = match part.as_bytes().first() {
                Some(b'-') => (AxisSign::Negative, &part[1..]),
                Some(b'+') => (AxisSign::Positive, &part[1..]),
                _ => (AxisSign::Positive, part),
            };
            let mut chars = axis.chars();
            let source = match (chars.next(), chars.next()) {
                (Some(c), None) => Axis::try_from(c).map_err(|_| TiltError::InvalidAxisMap)?,
                _ => return Err(TiltError::InvalidAxisMap),
            };
            Ok(AxisMapping::new(source, sign))
        };

        let x = next()?;
        let y = next()?;
        let z = next()?;
        if parts.next().is_some() {
            return Err(TiltError::InvalidAxisMap);
        }
        Self::new(x, y, z)
    }

    /// Origen del eje lógico indicado
    pub fn mapping(&self, logical: Axis) -> AxisMapping {
        self.mappings[logical.index()]
    }

    /// Físico → lógico: `logical[i] = sign_i * physical[source_i]`
    pub fn remap(&self, physical: Vector3) -> Vector3 {
        let mut logical = [0.0; 3];
        for (out, m) in logical.iter_mut().zip(self.mappings.iter()) {
            *out = physical[m.source.index()] * m.sign.factor();
        }
        logical
    }

    /// Lógico → físico (inversa de `remap`)
    ///
    /// Como el signo es ±1, su inverso es él mismo.
    pub fn inverse_remap(&self, logical: Vector3) -> Vector3 {
        let mut physical = [0.0; 3];
        for (value, m) in logical.iter().zip(self.mappings.iter()) {
            physical[m.source.index()] += value * m.sign.factor();
        }
        physical
    }
}

impl Default for AxisMap {
    /// Montaje del prototipo: X lógico ← -Z, Y lógico ← +Y, Z lógico ← -X
    fn default() -> Self {
        Self {
            mappings: [
                AxisMapping::new(Axis::Z, AxisSign::Negative),
                AxisMapping::new(Axis::Y, AxisSign::Positive),
                AxisMapping::new(Axis::X, AxisSign::Negative),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(source: Axis, sign: AxisSign) -> AxisMapping {
        AxisMapping::new(source, sign)
    }

    #[test]
    fn test_identity_is_noop() {
        let map = AxisMap::identity();
        assert_eq!(map.remap([0.1, -0.2, 0.9]), [0.1, -0.2, 0.9]);
    }

    #[test]
    fn test_negative_sign_negates_each_slot() {
        let map = AxisMap::new(
            m(Axis::X, AxisSign::Negative),
            m(Axis::Y, AxisSign::Negative),
            m(Axis::Z, AxisSign::Negative),
        )
        .unwrap();
        assert_eq!(map.remap([0.1, -0.2, 0.9]), [-0.1, 0.2, -0.9]);

        let only_y = AxisMap::new(
            m(Axis::X, AxisSign::Positive),
            m(Axis::Y, AxisSign::Negative),
            m(Axis::Z, AxisSign::Positive),
        )
        .unwrap();
        assert_eq!(only_y.remap([1.0, 2.0, 3.0]), [1.0, -2.0, 3.0]);
    }

    #[test]
    fn test_permutation_reorders() {
        let map = AxisMap::new(
            m(Axis::Z, AxisSign::Positive),
            m(Axis::X, AxisSign::Positive),
            m(Axis::Y, AxisSign::Positive),
        )
        .unwrap();
        assert_eq!(map.remap([1.0, 2.0, 3.0]), [3.0, 1.0, 2.0]);
    }

    #[test]
    fn test_default_mapping() {
        let map = AxisMap::default();
        assert_eq!(map.remap([1.0, 2.0, 3.0]), [-3.0, 2.0, -1.0]);
        assert_eq!(map.mapping(Axis::X), m(Axis::Z, AxisSign::Negative));
        assert_eq!(map.mapping(Axis::Y), m(Axis::Y, AxisSign::Positive));
        assert_eq!(map.mapping(Axis::Z), m(Axis::X, AxisSign::Negative));
    }

    #[test]
    fn test_inverse_undoes_remap() {
        let map = AxisMap::default();
        let physical = [0.3, -0.4, 0.8];
        assert_eq!(map.inverse_remap(map.remap(physical)), physical);
        assert_eq!(map.inverse_remap([1.0, 0.0, 0.0]), [0.0, 0.0, -1.0]);
    }

    #[test]
    fn test_rejects_duplicate_source() {
        let result = AxisMap::new(
            m(Axis::X, AxisSign::Positive),
            m(Axis::X, AxisSign::Negative),
            m(Axis::Z, AxisSign::Positive),
        );
        assert_eq!(result, Err(TiltError::InvalidAxisMap));
    }

    #[test]
    fn test_parse() {
        assert_eq!(AxisMap::parse("-Z, +Y, -X").unwrap(), AxisMap::default());
        assert_eq!(AxisMap::parse("x,y,z").unwrap(), AxisMap::identity());
        assert!(AxisMap::parse("X,Y").is_err());
        assert!(AxisMap::parse("X,Y,Z,X").is_err());
        assert!(AxisMap::parse("X,Y,Y").is_err());
        assert!(AxisMap::parse("X,Q,Z").is_err());
    }
}
