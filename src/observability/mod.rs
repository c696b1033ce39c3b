//! Observability for the record store
//!
//! - Structured logging (JSON lines on stderr)
//! - Typed lifecycle events
//! - Begin/complete scopes around whole-stream operations
//!
//! Logging never changes the outcome of the operation being observed and
//! never blocks on anything but the stderr write.
//!
//! ```ignore
//! use ais_store::observability::{log_event_with_fields, Event, ObservationScope};
//!
//! log_event_with_fields(Event::StoreOpened, &[("fields", "4")]);
//!
//! let scope = ObservationScope::new("SUBSET");
//! // ... scan ...
//! scope.complete();
//! ```

mod events;
mod logger;
mod scope;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use scope::{ObservationScope, Timer};

/// Log a lifecycle event at its own severity
pub fn log_event(event: Event) {
    Logger::log(event.severity(), event.as_str(), &[]);
}

/// Log a lifecycle event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}
