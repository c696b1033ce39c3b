//! Schema error types
//!
//! Error codes:
//! - AIS_SCHEMA_MISSING_FIELD (REJECT)
//! - AIS_SCHEMA_FIELD_COUNT (REJECT)
//! - AIS_SCHEMA_INVALID_DICTIONARY (REJECT)
//! - AIS_SCHEMA_UNREADABLE (FATAL)

use std::fmt;

/// Severity levels for schema errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The requested operation is refused before any record is read
    Reject,
    /// The store cannot be opened at all
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Reject => write!(f, "REJECT"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Schema-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaErrorCode {
    /// A field required by a predicate, generator or transform is absent
    AisSchemaMissingField,
    /// A record's field count disagrees with the headers
    AisSchemaFieldCount,
    /// Dictionary JSON could not be decoded or had empty entries
    AisSchemaInvalidDictionary,
    /// The headers line could not be read when opening a store
    AisSchemaUnreadable,
}

impl SchemaErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            SchemaErrorCode::AisSchemaMissingField => "AIS_SCHEMA_MISSING_FIELD",
            SchemaErrorCode::AisSchemaFieldCount => "AIS_SCHEMA_FIELD_COUNT",
            SchemaErrorCode::AisSchemaInvalidDictionary => "AIS_SCHEMA_INVALID_DICTIONARY",
            SchemaErrorCode::AisSchemaUnreadable => "AIS_SCHEMA_UNREADABLE",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        match self {
            SchemaErrorCode::AisSchemaUnreadable => Severity::Fatal,
            _ => Severity::Reject,
        }
    }
}

impl fmt::Display for SchemaErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Schema error type with context
#[derive(Debug)]
pub struct SchemaError {
    code: SchemaErrorCode,
    message: String,
    /// Field name when the error concerns one field
    field: Option<String>,
}

impl SchemaError {
    /// A required field is not present in the headers.
    ///
    /// `context` names the operation that needed the field.
    pub fn missing_field(context: &str, field: impl Into<String>) -> Self {
        let field = field.into();
        Self {
            code: SchemaErrorCode::AisSchemaMissingField,
            message: format!("{}: headers do not contain {}", context, field),
            field: Some(field),
        }
    }

    /// A record carries a different number of fields than the headers.
    pub fn field_count(expected: usize, actual: usize) -> Self {
        Self {
            code: SchemaErrorCode::AisSchemaFieldCount,
            message: format!(
                "record has {} fields, headers declare {}",
                actual, expected
            ),
            field: None,
        }
    }

    /// Dictionary import rejected.
    pub fn invalid_dictionary(reason: impl Into<String>) -> Self {
        Self {
            code: SchemaErrorCode::AisSchemaInvalidDictionary,
            message: format!("set dictionary: {}", reason.into()),
            field: None,
        }
    }

    /// Headers line missing or unreadable.
    pub fn unreadable(reason: impl Into<String>) -> Self {
        Self {
            code: SchemaErrorCode::AisSchemaUnreadable,
            message: reason.into(),
            field: None,
        }
    }

    /// Returns the error code
    pub fn code(&self) -> SchemaErrorCode {
        self.code
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the offending field name, if any
    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.code.severity(), self.code.code(), self.message)
    }
}

impl std::error::Error for SchemaError {}

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;
