//! Observability subsystem
//!
//! - Structured logging (JSON lines)
//! - Typed lifecycle and request events
//! - Atomic counters exposed at `/api/metrics`
//!
//! Observability is read-only: it never fails or alters the operation
//! being observed.
//!
//! ```ignore
//! use dakia::observability::{log_event_with_fields, Event, MetricsRegistry};
//!
//! log_event_with_fields(Event::DocumentCreated, &[("collection", "courses")]);
//!
//! let metrics = MetricsRegistry::new();
//! metrics.record_created("courses");
//! ```

mod events;
mod logger;
mod metrics;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use metrics::{MetricsRegistry, MetricsSnapshot};

fn severity_for(event: Event) -> Severity {
    if event.is_fatal() {
        Severity::Fatal
    } else {
        Severity::Info
    }
}

/// Log a lifecycle event
pub fn log_event(event: Event) {
    Logger::log(severity_for(event), event.as_str(), &[]);
}

/// Log a lifecycle event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(severity_for(event), event.as_str(), fields);
}
