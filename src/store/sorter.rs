//! Time ordering of a whole store.
//!
//! Sorting needs every record in memory at once; stores of around a million
//! records are the intended ceiling.

use chrono::NaiveDateTime;

use super::errors::StoreResult;
use super::record_set::RecordSet;
use crate::observability::{log_event_with_fields, Event, ObservationScope};
use crate::record::{Record, RecordResult};
use crate::schema::BASE_DATE_TIME;

/// Sorts records by the timestamp at one index
pub struct TimeSorter;

impl TimeSorter {
    /// Sorts `records` ascending by the timestamp at `time_index`.
    ///
    /// Every timestamp is parsed before any comparison, so one bad value
    /// fails the whole sort. Sort is stable: records with equal timestamps
    /// keep their input order.
    pub fn sort(records: Vec<Record>, time_index: usize) -> RecordResult<Vec<Record>> {
        let mut keyed: Vec<(NaiveDateTime, Record)> = records
            .into_iter()
            .map(|rec| -> RecordResult<(NaiveDateTime, Record)> {
                Ok((rec.parse_time(time_index)?, rec))
            })
            .collect::<RecordResult<_>>()?;

        keyed.sort_by(|a, b| a.0.cmp(&b.0));

        Ok(keyed.into_iter().map(|(_, rec)| rec).collect())
    }
}

impl RecordSet {
    /// Drains this store into a new one ordered by `BaseDateTime`.
    pub fn sort_by_time(&mut self) -> StoreResult<RecordSet> {
        let time_index = self.headers().require("sort by time", BASE_DATE_TIME)?;
        let scope = ObservationScope::new("SORT_BY_TIME");

        match self.sort_into(time_index) {
            Ok((out, n)) => {
                scope.complete_with_fields(&[("records", &n.to_string())]);
                Ok(out)
            }
            Err(e) => {
                scope.fail(&e.to_string());
                Err(e)
            }
        }
    }

    fn sort_into(&mut self, time_index: usize) -> StoreResult<(RecordSet, usize)> {
        let mut records = Vec::new();
        while let Some(rec) = self.read()? {
            records.push(rec);
        }
        let sorted = TimeSorter::sort(records, time_index)?;

        let threshold = self.config().flush_threshold;
        let mut out = self.derived(self.headers().clone());
        for (i, rec) in sorted.iter().enumerate() {
            out.write(rec)?;
            if (i + 1) % threshold == 0 {
                out.flush()?;
                log_event_with_fields(Event::WriteFlushed, &[("records", &(i + 1).to_string())]);
            }
        }
        out.flush()?;
        Ok((out, sorted.len()))
    }
}
