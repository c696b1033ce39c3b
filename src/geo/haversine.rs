//! Great-circle distance on a spherical Earth.

/// Mean Earth radius in nautical miles.
pub const EARTH_RADIUS_NM: f64 = 3440.065;

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coord {
    pub lat: f64,
    pub lon: f64,
}

impl Coord {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Haversine distance between `p` and `q` in nautical miles.
pub fn haversine_nm(p: Coord, q: Coord) -> f64 {
    let lat1 = p.lat.to_radians();
    let lat2 = q.lat.to_radians();
    let dlat = (q.lat - p.lat).to_radians();
    let dlon = (q.lon - p.lon).to_radians();

    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_NM * c
}
