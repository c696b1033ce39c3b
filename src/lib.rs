//! ais-store - a streaming record store for AIS vessel position files
//!
//! Records are read once, front to back, from a delimited text resource.
//! Selections replay what they consumed, so a store can be filtered several
//! times and still read as if it had not been touched.

pub mod cli;
pub mod generator;
pub mod geo;
pub mod matching;
pub mod observability;
pub mod record;
pub mod schema;
pub mod store;

pub use generator::{Generator, Geohasher};
pub use matching::{BoundingBox, Matching, TrackSelector};
pub use record::{Record, RecordError, RecordResult};
pub use schema::{Definition, Headers, SchemaError};
pub use store::{RecordSet, Resource, Selection, StoreConfig, StoreError, StoreResult, Vessel, VesselSet};
