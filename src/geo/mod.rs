//! Geographic helpers used by records and generators: haversine distance
//! and integer geohashes.

mod geohash;
mod haversine;

pub use geohash::{geohash_int, geohash_int64, DEFAULT_GEOHASH_BITS};
pub use haversine::{haversine_nm, Coord, EARTH_RADIUS_NM};
