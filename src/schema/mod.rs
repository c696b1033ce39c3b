//! Schema subsystem
//!
//! The schema of a record set is its headers row: an ordered list of field
//! names that fixes the column index of every record, plus an optional
//! dictionary describing the fields.
//!
//! Records carry no reference to their headers. Callers resolve a field
//! name to an index once, through [`Headers::contains`] or
//! [`Headers::require`], and reuse the index for every record.

mod errors;
mod headers;

pub use errors::{SchemaError, SchemaErrorCode, SchemaResult, Severity};
pub use headers::{Definition, Headers};

/// Maritime Mobile Service Identity column.
pub const MMSI: &str = "MMSI";
/// Report timestamp column.
pub const BASE_DATE_TIME: &str = "BaseDateTime";
/// Vessel name column.
pub const VESSEL_NAME: &str = "VesselName";
/// Latitude column, decimal degrees.
pub const LAT: &str = "LAT";
/// Longitude column, decimal degrees.
pub const LON: &str = "LON";
