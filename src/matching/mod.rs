//! Record predicates.
//!
//! A [`Matching`] decides whether a record belongs in a selection. Any
//! `Fn(&Record) -> RecordResult<bool>` is a matcher, so ad hoc predicates
//! need no wrapper type.

mod bounding_box;
mod track;

pub use bounding_box::BoundingBox;
pub use track::{all, beginning, TrackSelector};

use crate::record::{Record, RecordResult};

/// Boolean predicate over a record.
///
/// An error aborts the scan that called it.
pub trait Matching {
    fn matches(&self, rec: &Record) -> RecordResult<bool>;
}

impl<F> Matching for F
where
    F: Fn(&Record) -> RecordResult<bool>,
{
    fn matches(&self, rec: &Record) -> RecordResult<bool> {
        self(rec)
    }
}
