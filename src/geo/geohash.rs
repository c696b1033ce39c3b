//! Integer geohash encoding.
//!
//! Latitude and longitude are each quantized to 32 bits and interleaved,
//! longitude taking the most significant bit, so that the top `bits` bits
//! of the result are the geohash at that precision.

const EXP_2_32: f64 = 4_294_967_296.0;

/// Geohash precision used for the generated `Geohash` field. 22 bits is
/// roughly 0.1 degree in latitude and longitude.
pub const DEFAULT_GEOHASH_BITS: u32 = 22;

/// Full 64-bit integer geohash of `(lat, lon)`.
pub fn geohash_int64(lat: f64, lon: f64) -> u64 {
    let lat_bits = encode_range(lat, 90.0);
    let lon_bits = encode_range(lon, 180.0);
    spread(lat_bits) | (spread(lon_bits) << 1)
}

/// Integer geohash of `(lat, lon)` keeping the top `bits` bits (1..=64).
pub fn geohash_int(lat: f64, lon: f64, bits: u32) -> u64 {
    let bits = bits.clamp(1, 64);
    geohash_int64(lat, lon) >> (64 - bits)
}

fn encode_range(x: f64, r: f64) -> u32 {
    let p = (x + r) / (2.0 * r);
    let scaled = p * EXP_2_32;
    if scaled <= 0.0 {
        0
    } else if scaled >= u32::MAX as f64 {
        u32::MAX
    } else {
        scaled as u32
    }
}

/// Moves the bits of `x` to the even bit positions of a u64.
fn spread(x: u32) -> u64 {
    let mut out = 0u64;
    for i in 0..32 {
        out |= (((x >> i) & 1) as u64) << (2 * i);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spread() {
        assert_eq!(spread(0b1), 0b1);
        assert_eq!(spread(0b11), 0b101);
        assert_eq!(spread(u32::MAX), 0x5555_5555_5555_5555);
    }

    #[test]
    fn test_origin_splits_quadrants() {
        // (0, 0) sits at the midpoint of both ranges: top lon and lat bits set.
        assert_eq!(geohash_int(0.0, 0.0, 2), 0b11);
        // South-west corner.
        assert_eq!(geohash_int(-90.0, -180.0, 22), 0);
    }

    #[test]
    fn test_longitude_is_most_significant() {
        // Eastern hemisphere, southern latitude.
        assert_eq!(geohash_int(-45.0, 90.0, 2), 0b10);
        // Western hemisphere, northern latitude.
        assert_eq!(geohash_int(45.0, -90.0, 2), 0b01);
    }

    #[test]
    fn test_precision_is_prefix() {
        let full = geohash_int(36.85, -76.29, 22);
        let coarse = geohash_int(36.85, -76.29, 10);
        assert_eq!(full >> 12, coarse);
    }

    #[test]
    fn test_nearby_points_share_cell() {
        assert_eq!(
            geohash_int(36.850, -76.300, DEFAULT_GEOHASH_BITS),
            geohash_int(36.851, -76.301, DEFAULT_GEOHASH_BITS)
        );
    }
}
