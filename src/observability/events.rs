//! Observable store events
//!
//! Events are explicit and typed. Each carries its own default severity.

use std::fmt;

use super::logger::Severity;

/// Observable events in the record store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Store configuration loaded from a file
    ConfigLoaded,
    /// Store opened against a resource and its schema line validated
    StoreOpened,
    /// Store resource released
    StoreClosed,
    /// Field dictionary attached to a schema
    DictionaryAttached,
    /// Field dictionary import rejected
    DictionaryRejected,
    /// A selection matched no records
    EmptySet,
    /// Buffered rows pushed to the resource
    WriteFlushed,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::StoreOpened => "STORE_OPENED",
            Event::StoreClosed => "STORE_CLOSED",
            Event::DictionaryAttached => "DICTIONARY_ATTACHED",
            Event::DictionaryRejected => "DICTIONARY_REJECTED",
            Event::EmptySet => "EMPTY_SET",
            Event::WriteFlushed => "WRITE_FLUSHED",
        }
    }

    /// Severity the event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::DictionaryRejected => Severity::Warn,
            Event::WriteFlushed => Severity::Trace,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
