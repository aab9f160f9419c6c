//! Observability subsystem
//!
//! Provides:
//! - Structured logging (JSON lines on stderr)
//! - Per-store operation counters
//! - Typed store events
//!
//! Observability is read-only: it never changes the outcome of an operation.
//!
//! # Usage
//!
//! ```ignore
//! use smsconf::observability::{log_event, Event};
//!
//! log_event(Event::RecordInserted, &[("kind", "country_operator"), ("id", "abc")]);
//! ```

mod events;
mod logger;
mod metrics;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use metrics::{MetricsRegistry, MetricsSnapshot};

/// Log a typed event at its own severity
pub fn log_event(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}
