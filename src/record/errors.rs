//! Record error types
//!
//! Error codes:
//! - AIS_RECORD_PARSE_FAILED (ERROR)
//! - AIS_RECORD_MALFORMED_ROW (ERROR)
//! - AIS_RECORD_GENERATE_FAILED (ERROR)

use std::fmt;

/// Record-level error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordErrorCode {
    /// A field value does not convert to the requested type
    AisRecordParseFailed,
    /// A row of delimited text could not be decoded
    AisRecordMalformedRow,
    /// A generator could not produce a derived field
    AisRecordGenerateFailed,
}

impl RecordErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            RecordErrorCode::AisRecordParseFailed => "AIS_RECORD_PARSE_FAILED",
            RecordErrorCode::AisRecordMalformedRow => "AIS_RECORD_MALFORMED_ROW",
            RecordErrorCode::AisRecordGenerateFailed => "AIS_RECORD_GENERATE_FAILED",
        }
    }
}

impl fmt::Display for RecordErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Record error with enough context to find the offending value
#[derive(Debug, Clone)]
pub struct RecordError {
    code: RecordErrorCode,
    message: String,
    /// Field index, for parse failures
    index: Option<usize>,
    /// Raw field value, for parse failures
    value: Option<String>,
    /// 1-based input line, for malformed rows
    line: Option<u64>,
}

impl RecordError {
    /// `value` at `index` is not a valid `target`.
    pub fn parse_failed(
        index: usize,
        value: impl Into<String>,
        target: &str,
        reason: impl fmt::Display,
    ) -> Self {
        let value = value.into();
        Self {
            code: RecordErrorCode::AisRecordParseFailed,
            message: format!(
                "unable to parse {:?} at index {} as {}: {}",
                value, index, target, reason
            ),
            index: Some(index),
            value: Some(value),
            line: None,
        }
    }

    /// `index` is past the end of a record of `len` fields.
    pub fn index_out_of_range(index: usize, len: usize) -> Self {
        Self {
            code: RecordErrorCode::AisRecordParseFailed,
            message: format!("index {} out of range for record of {} fields", index, len),
            index: Some(index),
            value: None,
            line: None,
        }
    }

    /// Row at `line` could not be decoded.
    pub fn malformed_row(line: u64, reason: impl Into<String>) -> Self {
        Self {
            code: RecordErrorCode::AisRecordMalformedRow,
            message: format!("line {}: {}", line, reason.into()),
            index: None,
            value: None,
            line: Some(line),
        }
    }

    /// A generator failed.
    pub fn generate_failed(reason: impl Into<String>) -> Self {
        Self {
            code: RecordErrorCode::AisRecordGenerateFailed,
            message: reason.into(),
            index: None,
            value: None,
            line: None,
        }
    }

    /// Prefixes the message with `context`, keeping code and details.
    pub fn context(mut self, context: &str) -> Self {
        self.message = format!("{}: {}", context, self.message);
        self
    }

    /// Returns the error code
    pub fn code(&self) -> RecordErrorCode {
        self.code
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the field index, if known
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    /// Returns the offending raw value, if known
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Returns the input line, if known
    pub fn line(&self) -> Option<u64> {
        self.line
    }
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[ERROR] {}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for RecordError {}

/// Result type for record operations
pub type RecordResult<T> = Result<T, RecordError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(RecordErrorCode::AisRecordParseFailed.code(), "AIS_RECORD_PARSE_FAILED");
        assert_eq!(RecordErrorCode::AisRecordMalformedRow.code(), "AIS_RECORD_MALFORMED_ROW");
        assert_eq!(
            RecordErrorCode::AisRecordGenerateFailed.code(),
            "AIS_RECORD_GENERATE_FAILED"
        );
    }

    #[test]
    fn test_parse_failed_carries_value_and_index() {
        let err = RecordError::parse_failed(2, "north", "float", "invalid float literal");
        assert_eq!(err.index(), Some(2));
        assert_eq!(err.value(), Some("north"));
        let display = err.to_string();
        assert!(display.contains("AIS_RECORD_PARSE_FAILED"));
        assert!(display.contains("\"north\""));
    }

    #[test]
    fn test_context_prefixes_message() {
        let err = RecordError::generate_failed("bad index").context("geohash");
        assert_eq!(err.message(), "geohash: bad index");
        assert_eq!(err.code(), RecordErrorCode::AisRecordGenerateFailed);
    }
}
