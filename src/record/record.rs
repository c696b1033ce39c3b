//! A single AIS record: one row of textual field values.

use std::ops::Index;

use chrono::{NaiveDateTime, Timelike};

use super::errors::{RecordError, RecordResult};
use crate::geo::{haversine_nm, Coord};

/// Timestamp layout of the MarineCadastre AIS data, e.g. `2017-12-05T00:01:14`.
pub const TIME_LAYOUT: &str = "%Y-%m-%dT%H:%M:%S";

/// Length of a timestamp in [`TIME_LAYOUT`].
const TIME_LAYOUT_LEN: usize = 19;

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Parses a timestamp in [`TIME_LAYOUT`]. No timezone, no alternate layouts.
pub fn parse_timestamp(s: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    // chrono accepts unpadded numeric fields; the layout does not.
    if s.len() < TIME_LAYOUT_LEN {
        return NaiveDateTime::parse_from_str("", TIME_LAYOUT);
    }
    match NaiveDateTime::parse_from_str(s, TIME_LAYOUT) {
        // Seconds run 00..=59; chrono reads 60 as a leap second.
        Ok(t) if t.nanosecond() >= 1_000_000_000 => {
            NaiveDateTime::parse_from_str("", TIME_LAYOUT)
        }
        parsed => parsed,
    }
}

/// Formats a timestamp in [`TIME_LAYOUT`].
pub fn format_timestamp(t: &NaiveDateTime) -> String {
    t.format(TIME_LAYOUT).to_string()
}

/// An ordered sequence of field values.
///
/// Values are interpreted positionally through the headers of the store the
/// record came from. Typed accessors report out-of-range indices and
/// unparseable values as [`RecordError`]s.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Record(Vec<String>);

impl Record {
    pub fn new(values: Vec<String>) -> Self {
        Self(values)
    }

    /// Builds a record from anything yielding string-like values.
    pub fn from_fields<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(values.into_iter().map(Into::into).collect())
    }

    pub fn values(&self) -> &[String] {
        &self.0
    }

    pub fn into_values(self) -> Vec<String> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Value at `index`, if present.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    /// Appends a field value.
    pub fn push(&mut self, value: impl Into<String>) {
        self.0.push(value.into());
    }

    fn field(&self, index: usize) -> RecordResult<&str> {
        self.get(index)
            .ok_or_else(|| RecordError::index_out_of_range(index, self.len()))
    }

    /// Parses the field at `index` as a 64-bit float (LAT, LON, SOG, ...).
    pub fn parse_float(&self, index: usize) -> RecordResult<f64> {
        let raw = self.field(index)?;
        raw.parse::<f64>()
            .map_err(|e| RecordError::parse_failed(index, raw, "float", e))
    }

    /// Parses the field at `index` as a base-10 64-bit integer (MMSI, IMO, ...).
    pub fn parse_int(&self, index: usize) -> RecordResult<i64> {
        let raw = self.field(index)?;
        raw.parse::<i64>()
            .map_err(|e| RecordError::parse_failed(index, raw, "integer", e))
    }

    /// Parses the field at `index` as a timestamp in [`TIME_LAYOUT`].
    pub fn parse_time(&self, index: usize) -> RecordResult<NaiveDateTime> {
        let raw = self.field(index)?;
        parse_timestamp(raw).map_err(|e| RecordError::parse_failed(index, raw, "timestamp", e))
    }

    /// The values joined by commas and terminated by a newline.
    pub fn data(&self) -> Vec<u8> {
        let mut b = self.0.join(",").into_bytes();
        b.push(b'\n');
        b
    }

    /// 64-bit FNV-1a hash of [`Record::data`].
    pub fn hash(&self) -> u64 {
        self.data().iter().fold(FNV_OFFSET_BASIS, |h, &b| {
            (h ^ b as u64).wrapping_mul(FNV_PRIME)
        })
    }

    /// Haversine distance in nautical miles between this record and `other`,
    /// reading latitude and longitude from the same indices in both.
    pub fn distance(&self, other: &Record, lat_index: usize, lon_index: usize) -> RecordResult<f64> {
        let p = Coord::new(self.parse_float(lat_index)?, self.parse_float(lon_index)?);
        let q = Coord::new(other.parse_float(lat_index)?, other.parse_float(lon_index)?);
        Ok(haversine_nm(p, q))
    }
}

impl From<Vec<String>> for Record {
    fn from(values: Vec<String>) -> Self {
        Self(values)
    }
}

impl Index<usize> for Record {
    type Output = str;

    fn index(&self, index: usize) -> &str {
        &self.0[index]
    }
}
