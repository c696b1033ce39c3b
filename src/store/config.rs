//! Store configuration
//!
//! Loaded from JSON; every field is optional:
//!
//! ```json
//! { "delimiter": ",", "comment": "#", "lazy_quotes": true, "flush_threshold": 250000 }
//! ```
//!
//! `"comment": null` turns comment skipping off.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::errors::{StoreError, StoreResult};
use crate::observability::{log_event_with_fields, Event};
use crate::record::Dialect;

/// Records written by bulk transforms between flushes
pub const DEFAULT_FLUSH_THRESHOLD: usize = 250_000;

/// Input/output conventions of a record store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Field separator (ASCII)
    #[serde(default = "default_delimiter")]
    pub delimiter: char,

    /// Lines starting with this character are skipped on read
    #[serde(default = "default_comment")]
    pub comment: Option<char>,

    /// Keep stray quotes instead of rejecting the row
    #[serde(default = "default_lazy_quotes")]
    pub lazy_quotes: bool,

    /// Bulk transforms flush after this many records
    #[serde(default = "default_flush_threshold")]
    pub flush_threshold: usize,
}

fn default_delimiter() -> char {
    ','
}
fn default_comment() -> Option<char> {
    Some('#')
}
fn default_lazy_quotes() -> bool {
    true
}
fn default_flush_threshold() -> usize {
    DEFAULT_FLUSH_THRESHOLD
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            delimiter: default_delimiter(),
            comment: default_comment(),
            lazy_quotes: default_lazy_quotes(),
            flush_threshold: default_flush_threshold(),
        }
    }
}

impl StoreConfig {
    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> StoreResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| StoreError::io("load config", e))?;

        let config: StoreConfig = serde_json::from_str(&content)
            .map_err(|e| StoreError::Config(format!("invalid config JSON: {}", e)))?;

        config.validate()?;

        log_event_with_fields(
            Event::ConfigLoaded,
            &[("path", &path.display().to_string())],
        );

        Ok(config)
    }

    /// Checks the field values are usable together
    pub fn validate(&self) -> StoreResult<()> {
        if !self.delimiter.is_ascii() || matches!(self.delimiter, '"' | '\r' | '\n') {
            return Err(StoreError::Config(format!(
                "invalid delimiter {:?}: must be ASCII and not a quote or line break",
                self.delimiter
            )));
        }

        if let Some(c) = self.comment {
            if !c.is_ascii() || matches!(c, '"' | '\r' | '\n') {
                return Err(StoreError::Config(format!("invalid comment marker {:?}", c)));
            }
            if c == self.delimiter {
                return Err(StoreError::Config(
                    "comment marker must differ from the delimiter".to_string(),
                ));
            }
        }

        if self.flush_threshold == 0 {
            return Err(StoreError::Config("flush_threshold must be > 0".to_string()));
        }

        Ok(())
    }

    /// Row codec settings. Only meaningful for a validated config.
    pub fn dialect(&self) -> Dialect {
        Dialect {
            delimiter: self.delimiter as u8,
            comment: self.comment.map(|c| c as u8),
            lazy_quotes: self.lazy_quotes,
        }
    }
}
