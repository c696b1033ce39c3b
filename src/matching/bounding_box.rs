//! Rectangular latitude/longitude filter.

use crate::record::{Record, RecordResult};
use crate::schema::{Headers, SchemaResult, LAT, LON};

use super::Matching;

/// Inclusive latitude/longitude rectangle.
///
/// A record on an edge or a vertex is inside.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
    pub lat_index: usize,
    pub lon_index: usize,
}

impl BoundingBox {
    pub fn new(
        min_lat: f64,
        max_lat: f64,
        min_lon: f64,
        max_lon: f64,
        lat_index: usize,
        lon_index: usize,
    ) -> Self {
        Self {
            min_lat,
            max_lat,
            min_lon,
            max_lon,
            lat_index,
            lon_index,
        }
    }

    /// Builds a box reading coordinates from the `LAT` and `LON` columns of
    /// `headers`.
    pub fn for_headers(
        headers: &Headers,
        min_lat: f64,
        max_lat: f64,
        min_lon: f64,
        max_lon: f64,
    ) -> SchemaResult<Self> {
        let lat_index = headers.require("bounding box", LAT)?;
        let lon_index = headers.require("bounding box", LON)?;
        Ok(Self::new(min_lat, max_lat, min_lon, max_lon, lat_index, lon_index))
    }

    /// True when `(lat, lon)` lies inside the box.
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        lat >= self.min_lat && lat <= self.max_lat && lon >= self.min_lon && lon <= self.max_lon
    }
}

impl Matching for BoundingBox {
    fn matches(&self, rec: &Record) -> RecordResult<bool> {
        let lat = rec.parse_float(self.lat_index)?;
        let lon = rec.parse_float(self.lon_index)?;
        Ok(self.contains(lat, lon))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SchemaErrorCode;

    fn unit_box() -> BoundingBox {
        BoundingBox::new(10.0, 20.0, -80.0, -70.0, 0, 1)
    }

    fn at(lat: &str, lon: &str) -> Record {
        Record::from_fields([lat, lon])
    }

    #[test]
    fn test_interior_point_matches() {
        assert!(unit_box().matches(&at("15.0", "-75.0")).unwrap());
    }

    #[test]
    fn test_edges_and_vertices_are_inside() {
        let b = unit_box();
        assert!(b.matches(&at("10.0", "-75.0")).unwrap());
        assert!(b.matches(&at("20.0", "-75.0")).unwrap());
        assert!(b.matches(&at("15.0", "-80.0")).unwrap());
        assert!(b.matches(&at("15.0", "-70.0")).unwrap());
        assert!(b.matches(&at("10.0", "-80.0")).unwrap());
        assert!(b.matches(&at("20.0", "-70.0")).unwrap());
    }

    #[test]
    fn test_outside_points_rejected() {
        let b = unit_box();
        assert!(!b.matches(&at("9.999", "-75.0")).unwrap());
        assert!(!b.matches(&at("15.0", "-69.9")).unwrap());
    }

    #[test]
    fn test_unparseable_coordinate_is_error() {
        assert!(unit_box().matches(&at("north", "-75.0")).is_err());
        assert!(unit_box().matches(&at("15.0", "")).is_err());
    }

    #[test]
    fn test_for_headers_resolves_indices() {
        let h = Headers::from_fields(["MMSI", "LAT", "LON"]);
        let b = BoundingBox::for_headers(&h, 0.0, 1.0, 0.0, 1.0).unwrap();
        assert_eq!((b.lat_index, b.lon_index), (1, 2));

        let h = Headers::from_fields(["MMSI", "LAT"]);
        let err = BoundingBox::for_headers(&h, 0.0, 1.0, 0.0, 1.0).unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::AisSchemaMissingField);
    }
}
