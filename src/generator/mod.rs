//! Derived field generation.

mod geohasher;

pub use geohasher::{Geohasher, GEOHASH_FIELD};

use crate::record::{Record, RecordResult};

/// Produces the value of a new field from existing fields of a record.
///
/// `indices` are the positions of the fields the generator asked for, in the
/// order they were requested.
pub trait Generator {
    fn generate(&self, rec: &Record, indices: &[usize]) -> RecordResult<String>;
}

impl<F> Generator for F
where
    F: Fn(&Record, &[usize]) -> RecordResult<String>,
{
    fn generate(&self, rec: &Record, indices: &[usize]) -> RecordResult<String> {
        self(rec, indices)
    }
}
