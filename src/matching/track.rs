//! Per-vessel time window filter.

use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::record::{Record, RecordResult};
use crate::schema::{Headers, SchemaResult, BASE_DATE_TIME, MMSI};

use super::Matching;

/// Start of time for track windows: 1940-01-01T01:00:00.
pub fn beginning() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(1940, 1, 1)
        .and_then(|d| d.and_hms_opt(1, 0, 0))
        .unwrap_or(NaiveDateTime::MIN)
}

/// A window long enough to cover every record: 200 years of 365 days.
pub fn all() -> Duration {
    Duration::days(365 * 200)
}

/// Selects the reports of one vessel strictly inside `(start, start + dur)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackSelector {
    mmsi: i64,
    start: NaiveDateTime,
    end: NaiveDateTime,
    mmsi_index: usize,
    time_index: usize,
}

impl TrackSelector {
    /// Resolves the `MMSI` and `BaseDateTime` columns of `headers`. The end
    /// of the window saturates at the latest representable timestamp.
    pub fn new(
        headers: &Headers,
        mmsi: i64,
        start: NaiveDateTime,
        dur: Duration,
    ) -> SchemaResult<Self> {
        let mmsi_index = headers.require("track", MMSI)?;
        let time_index = headers.require("track", BASE_DATE_TIME)?;
        let end = start
            .checked_add_signed(dur)
            .unwrap_or(NaiveDateTime::MAX);
        Ok(Self {
            mmsi,
            start,
            end,
            mmsi_index,
            time_index,
        })
    }

    pub fn mmsi(&self) -> i64 {
        self.mmsi
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn end(&self) -> NaiveDateTime {
        self.end
    }
}

impl Matching for TrackSelector {
    fn matches(&self, rec: &Record) -> RecordResult<bool> {
        // Both columns must parse on every row, whichever vessel it is.
        let mmsi = rec.parse_int(self.mmsi_index)?;
        let t = rec.parse_time(self.time_index)?;
        Ok(mmsi == self.mmsi && self.start < t && t < self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{parse_timestamp, RecordErrorCode};
    use crate::schema::SchemaErrorCode;

    fn headers() -> Headers {
        Headers::from_fields(["MMSI", "BaseDateTime", "LAT", "LON"])
    }

    fn ts(s: &str) -> NaiveDateTime {
        parse_timestamp(s).unwrap()
    }

    fn report(mmsi: &str, t: &str) -> Record {
        Record::from_fields([mmsi, t, "36.0", "-76.0"])
    }

    #[test]
    fn test_window_is_open_at_both_ends() {
        let sel = TrackSelector::new(&headers(), 123456789, ts("2017-01-01T00:00:00"), Duration::hours(2))
            .unwrap();
        assert!(!sel.matches(&report("123456789", "2017-01-01T00:00:00")).unwrap());
        assert!(sel.matches(&report("123456789", "2017-01-01T00:00:01")).unwrap());
        assert!(sel.matches(&report("123456789", "2017-01-01T01:59:59")).unwrap());
        assert!(!sel.matches(&report("123456789", "2017-01-01T02:00:00")).unwrap());
    }

    #[test]
    fn test_other_vessel_rejected() {
        let sel = TrackSelector::new(&headers(), 1, beginning(), all()).unwrap();
        assert!(!sel.matches(&report("2", "2017-01-01T00:00:00")).unwrap());
    }

    #[test]
    fn test_bad_time_on_other_vessel_is_error() {
        let sel = TrackSelector::new(&headers(), 1, beginning(), all()).unwrap();
        let err = sel.matches(&report("2", "not a time")).unwrap_err();
        assert_eq!(err.code(), RecordErrorCode::AisRecordParseFailed);
    }

    #[test]
    fn test_bad_mmsi_is_error() {
        let sel = TrackSelector::new(&headers(), 1, beginning(), all()).unwrap();
        assert!(sel.matches(&report("abc", "2017-01-01T00:00:00")).is_err());
    }

    #[test]
    fn test_sentinels() {
        assert_eq!(beginning(), ts("1940-01-01T01:00:00"));
        assert_eq!(all(), Duration::days(73_000));
        let sel = TrackSelector::new(&headers(), 7, beginning(), all()).unwrap();
        assert!(sel.matches(&report("7", "2017-12-05T00:01:14")).unwrap());
    }

    #[test]
    fn test_end_saturates() {
        let sel = TrackSelector::new(&headers(), 7, ts("2017-01-01T00:00:00"), Duration::days(365 * 1_000_000))
            .unwrap();
        assert_eq!(sel.end(), NaiveDateTime::MAX);
    }

    #[test]
    fn test_missing_columns_fail_fast() {
        let h = Headers::from_fields(["MMSI", "LAT", "LON"]);
        let err = TrackSelector::new(&h, 7, beginning(), all()).unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::AisSchemaMissingField);
        assert_eq!(err.field(), Some(BASE_DATE_TIME));
    }
}
