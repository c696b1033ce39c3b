//! Selections and derived stores.
//!
//! `subset` and `track` leave the source store readable from where it was;
//! `append_field` drains it.

use chrono::{Duration, NaiveDateTime};

use super::errors::{StoreError, StoreResult};
use super::record_set::RecordSet;
use crate::generator::Generator;
use crate::matching::{Matching, TrackSelector};
use crate::observability::{log_event_with_fields, Event, ObservationScope};

/// Outcome of a selection.
///
/// `Empty` is not an error: it still carries the (empty) output store.
#[derive(Debug)]
pub enum Selection {
    Matched(RecordSet),
    Empty(RecordSet),
}

impl Selection {
    pub fn is_empty(&self) -> bool {
        matches!(self, Selection::Empty(_))
    }

    /// The output store, empty or not.
    pub fn into_inner(self) -> RecordSet {
        match self {
            Selection::Matched(set) | Selection::Empty(set) => set,
        }
    }

    /// The output store, or [`StoreError::EmptySet`] when nothing matched.
    pub fn into_result(self) -> StoreResult<RecordSet> {
        match self {
            Selection::Matched(set) => Ok(set),
            Selection::Empty(_) => Err(StoreError::EmptySet),
        }
    }
}

impl RecordSet {
    /// Every remaining record matching `m`, in a new in-memory store.
    pub fn subset<M: Matching + ?Sized>(&mut self, m: &M) -> StoreResult<Selection> {
        self.subset_limit(m, None)
    }

    /// Up to `limit` remaining records matching `m` (`None` for no limit),
    /// in a new in-memory store with the same headers.
    ///
    /// The whole remaining stream is scanned even after the limit is hit.
    /// Afterwards this store reads back exactly the records it had before
    /// the call, including when the call fails.
    pub fn subset_limit<M: Matching + ?Sized>(
        &mut self,
        m: &M,
        limit: Option<usize>,
    ) -> StoreResult<Selection> {
        let scope = ObservationScope::new("SUBSET");
        let mut out = self.derived(self.headers().clone());
        let mut matched = 0usize;

        let scanned = self.scan_echoed(|rec| {
            if matches!(limit, Some(l) if matched >= l) {
                return Ok(());
            }
            if m.matches(rec)? {
                out.write(rec)?;
                matched += 1;
            }
            Ok(())
        });

        let scanned = match scanned.and_then(|n| out.flush().map(|_| n)) {
            Ok(n) => n,
            Err(e) => {
                scope.fail(&e.to_string());
                return Err(e);
            }
        };

        scope.complete_with_fields(&[
            ("matched", &matched.to_string()),
            ("scanned", &scanned.to_string()),
        ]);

        if matched == 0 {
            log_event_with_fields(Event::EmptySet, &[("scanned", &scanned.to_string())]);
            return Ok(Selection::Empty(out));
        }
        Ok(Selection::Matched(out))
    }

    /// Reports of vessel `mmsi` strictly between `start` and `start + dur`.
    ///
    /// Fails before reading anything when the headers lack `MMSI` or
    /// `BaseDateTime`.
    pub fn track(
        &mut self,
        mmsi: i64,
        start: NaiveDateTime,
        dur: Duration,
    ) -> StoreResult<Selection> {
        let selector = TrackSelector::new(self.headers(), mmsi, start, dur)?;
        self.subset(&selector)
    }

    /// Drains this store into a new one with an extra field `name` computed
    /// by `gen` from the fields named in `required`.
    ///
    /// Fails before reading anything when a required field is missing. A
    /// generator failure aborts the whole operation.
    pub fn append_field<G: Generator + ?Sized>(
        &mut self,
        name: &str,
        required: &[&str],
        gen: &G,
    ) -> StoreResult<RecordSet> {
        let indices = required
            .iter()
            .map(|field| self.headers().require("append field", field))
            .collect::<Result<Vec<_>, _>>()?;

        let scope = ObservationScope::with_fields("APPEND_FIELD", &[("field", name)]);
        let mut out = self.derived(self.headers().with_field(name));

        match self.append_into(&mut out, &indices, gen) {
            Ok(n) => {
                scope.complete_with_fields(&[("records", &n.to_string())]);
                Ok(out)
            }
            Err(e) => {
                scope.fail(&e.to_string());
                Err(e)
            }
        }
    }

    fn append_into<G: Generator + ?Sized>(
        &mut self,
        out: &mut RecordSet,
        indices: &[usize],
        gen: &G,
    ) -> StoreResult<usize> {
        let threshold = self.config().flush_threshold;
        let mut n = 0usize;

        while let Some(mut rec) = self.read()? {
            let value = gen.generate(&rec, indices)?;
            rec.push(value);
            out.write(&rec)?;
            n += 1;
            if n % threshold == 0 {
                out.flush()?;
                log_event_with_fields(Event::WriteFlushed, &[("records", &n.to_string())]);
            }
        }
        out.flush()?;
        Ok(n)
    }
}
