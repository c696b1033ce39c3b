//! Record store
//!
//! A [`RecordSet`] is a schema plus a forward-only stream of records over a
//! [`Resource`]. On top of plain reads and writes it offers:
//! - non-destructive selections (`subset`, `subset_limit`, `track`)
//! - derived fields (`append_field`)
//! - distinct vessels (`unique_vessels`)
//! - time ordering (`sort_by_time`)
//! - persistence (`write_to`, `save`)

mod config;
mod cursor;
mod echo;
mod errors;
mod record_set;
mod resource;
mod sorter;
mod transforms;
mod vessel;

pub use config::{StoreConfig, DEFAULT_FLUSH_THRESHOLD};
pub use cursor::CursorState;
pub use errors::{StoreError, StoreResult};
pub use record_set::{RecordSet, Records};
pub use resource::{Closer, MemoryBuffer, Resource};
pub use sorter::TimeSorter;
pub use transforms::Selection;
pub use vessel::{Vessel, VesselSet, NO_VESSEL_NAME};
