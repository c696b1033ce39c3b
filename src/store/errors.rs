//! # Store Errors
//!
//! Error type for record store operations. Wraps the schema and record
//! errors of the layers below and adds I/O failures tagged with the
//! operation that hit them.

use std::io;

use thiserror::Error;

use crate::record::{CodecError, RecordError};
use crate::schema::SchemaError;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Record store errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// Schema violation: missing field, bad dictionary, field count
    #[error("{0}")]
    Schema(#[from] SchemaError),

    /// Parse failure, malformed row or generator failure
    #[error("{0}")]
    Record(#[from] RecordError),

    /// Underlying resource failed
    #[error("I/O error during {op}: {source}")]
    Io {
        op: &'static str,
        #[source]
        source: io::Error,
    },

    /// A selection matched nothing
    #[error("empty set")]
    EmptySet,

    /// Configuration file could not be used
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl StoreError {
    /// Wraps an I/O error with the operation that failed.
    pub fn io(op: &'static str, source: io::Error) -> Self {
        StoreError::Io { op, source }
    }

    /// Converts a row decoding failure, tagging I/O faults with `op`.
    pub fn codec(op: &'static str, err: CodecError) -> Self {
        match err {
            CodecError::Io(source) => StoreError::Io { op, source },
            CodecError::Row(e) => StoreError::Record(e),
        }
    }

    /// Stable code for the error, for logs and exit messages
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::Schema(e) => e.code().code(),
            StoreError::Record(e) => e.code().code(),
            StoreError::Io { .. } => "AIS_STORE_IO",
            StoreError::EmptySet => "AIS_STORE_EMPTY_SET",
            StoreError::Config(_) => "AIS_STORE_CONFIG",
        }
    }

    /// True for the empty-result signal
    pub fn is_empty_set(&self) -> bool {
        matches!(self, StoreError::EmptySet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codec_error_split() {
        let io_err = CodecError::Io(io::Error::new(io::ErrorKind::UnexpectedEof, "truncated"));
        let err = StoreError::codec("read", io_err);
        assert_eq!(err.code(), "AIS_STORE_IO");
        assert!(err.to_string().contains("during read"));

        let row_err = CodecError::Row(RecordError::malformed_row(3, "wrong number of fields"));
        let err = StoreError::codec("read", row_err);
        assert_eq!(err.code(), "AIS_RECORD_MALFORMED_ROW");
    }

    #[test]
    fn test_from_schema_error() {
        let err: StoreError = SchemaError::missing_field("track", "MMSI").into();
        assert_eq!(err.code(), "AIS_SCHEMA_MISSING_FIELD");
        assert!(!err.is_empty_set());
    }

    #[test]
    fn test_empty_set() {
        assert!(StoreError::EmptySet.is_empty_set());
        assert_eq!(StoreError::EmptySet.to_string(), "empty set");
    }
}
