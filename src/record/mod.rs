//! Records and their on-disk row encoding.
//!
//! A [`Record`] is one row of field values. [`RowReader`] and [`RowWriter`]
//! move records to and from delimited text.

mod codec;
mod errors;
#[allow(clippy::module_inception)]
mod record;

pub use codec::{CodecError, Dialect, RowReader, RowWriter};
pub use errors::{RecordError, RecordErrorCode, RecordResult};
pub use record::{format_timestamp, parse_timestamp, Record, TIME_LAYOUT};
