//! Station identity types.

use std::fmt;

/// Error returned when parsing an invalid station id.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid station id: {reason}")]
pub struct InvalidStationId {
    reason: &'static str,
}

/// An opaque station identifier as assigned by the map server.
///
/// Station ids are free-form non-empty strings. This type guarantees
/// non-emptiness and the absence of surrounding whitespace by construction.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StationId(String);

impl StationId {
    /// Parse a station id from a string.
    ///
    /// The input must be non-empty and must not start or end with whitespace.
    pub fn parse(s: &str) -> Result<Self, InvalidStationId> {
        if s.is_empty() {
            return Err(InvalidStationId {
                reason: "must not be empty",
            });
        }
        if s.trim() != s {
            return Err(InvalidStationId {
                reason: "must not have surrounding whitespace",
            });
        }
        Ok(StationId(s.to_string()))
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StationId({})", self.0)
    }
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A dense station index in `[0, station_count)`.
///
/// Codes are assigned when a snapshot is indexed into a [`super::Network`]
/// and serve as the vertex indices of the connection scan. They are only
/// meaningful relative to the network that assigned them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StationCode(pub u32);

impl StationCode {
    /// Returns the code as a usize suitable for array indexing.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for StationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A station from the map snapshot.
#[derive(Debug, Clone)]
pub struct Station {
    /// Opaque identity from the map server.
    pub id: StationId,
    /// Dense code assigned by the owning network.
    pub code: StationCode,
    /// World X coordinate (blocks).
    pub x: i64,
    /// World Z coordinate (blocks).
    pub z: i64,
}

impl Station {
    /// Euclidean block distance to another station.
    pub fn distance_to(&self, other: &Station) -> f64 {
        let dx = (self.x - other.x) as f64;
        let dz = (self.z - other.z) as f64;
        (dx * dx + dz * dz).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_ids() {
        assert!(StationId::parse("hana-koshi-central").is_ok());
        assert!(StationId::parse("1").is_ok());
        assert!(StationId::parse("花越中央").is_ok());
    }

    #[test]
    fn reject_empty() {
        assert!(StationId::parse("").is_err());
    }

    #[test]
    fn reject_surrounding_whitespace() {
        assert!(StationId::parse(" abc").is_err());
        assert!(StationId::parse("abc ").is_err());
        assert!(StationId::parse("\tabc").is_err());
    }

    #[test]
    fn as_str_roundtrip() {
        let id = StationId::parse("central").unwrap();
        assert_eq!(id.as_str(), "central");
    }

    #[test]
    fn code_indexing() {
        let code = StationCode(7);
        assert_eq!(code.index(), 7);
        assert_eq!(format!("{}", code), "#7");
    }

    #[test]
    fn distance_is_euclidean() {
        let a = Station {
            id: StationId::parse("a").unwrap(),
            code: StationCode(0),
            x: 0,
            z: 0,
        };
        let b = Station {
            id: StationId::parse("b").unwrap(),
            code: StationCode(1),
            x: 3,
            z: 4,
        };
        assert!((a.distance_to(&b) - 5.0).abs() < f64::EPSILON);
    }
}
