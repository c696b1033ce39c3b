//! Geohash field generator.

use crate::geo::{geohash_int, DEFAULT_GEOHASH_BITS};
use crate::record::{Record, RecordError, RecordResult};

use super::Generator;

/// Name of the field produced by [`Geohasher`].
pub const GEOHASH_FIELD: &str = "Geohash";

/// Generates the integer geohash of a record's position as `0x` hex.
///
/// Expects exactly two indices: latitude then longitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geohasher {
    bits: u32,
}

impl Geohasher {
    pub fn new() -> Self {
        Self {
            bits: DEFAULT_GEOHASH_BITS,
        }
    }

    /// Geohasher keeping `bits` bits of precision (1..=64).
    pub fn with_bits(bits: u32) -> Self {
        Self {
            bits: bits.clamp(1, 64),
        }
    }

    pub fn bits(&self) -> u32 {
        self.bits
    }
}

impl Default for Geohasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Generator for Geohasher {
    fn generate(&self, rec: &Record, indices: &[usize]) -> RecordResult<String> {
        let (lat_index, lon_index) = match indices {
            [lat, lon] => (*lat, *lon),
            _ => {
                return Err(RecordError::generate_failed(format!(
                    "expected 2 indices (lat, lon), got {}",
                    indices.len()
                ))
                .context("geohash"));
            }
        };
        let lat = rec.parse_float(lat_index)?;
        let lon = rec.parse_float(lon_index)?;
        Ok(format!("{:#x}", geohash_int(lat, lon, self.bits)))
    }
}
