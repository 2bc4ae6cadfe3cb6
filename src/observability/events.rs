//! Observable events for DAKIA Academy
//!
//! Events are explicit and typed. Each maps to one stable uppercase name
//! that appears as the `event` key of a log line.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Lifecycle
    /// Process startup begins
    BootStart,
    /// Configuration file loaded and validated
    ConfigLoaded,
    /// Listener bound, ready for requests
    Serving,
    /// Shutdown signal received
    ShutdownStart,
    /// Shutdown finished, store closed
    ShutdownComplete,
    /// OS signal handler could not be installed
    SignalHandlerFailed,

    // Store
    /// Record file replayed into collections
    StoreReplayComplete,
    /// Store open and accepting writes
    StoreOpened,
    /// Store closed, clean-shutdown marker written
    StoreClosed,
    /// Record file failed validation (FATAL)
    StoreCorruption,

    // Requests
    /// Document inserted through the API
    DocumentCreated,
    /// Insert rejected by a unique index
    DuplicateKeyRejected,
    /// Request failed with an internal error
    RequestFailed,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::BootStart => "DAKIA_STARTUP_BEGIN",
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::Serving => "DAKIA_SERVING",
            Event::ShutdownStart => "SHUTDOWN_START",
            Event::ShutdownComplete => "SHUTDOWN_COMPLETE",
            Event::SignalHandlerFailed => "SIGNAL_HANDLER_FAILED",

            Event::StoreReplayComplete => "STORE_REPLAY_COMPLETE",
            Event::StoreOpened => "STORE_OPENED",
            Event::StoreClosed => "STORE_CLOSED",
            Event::StoreCorruption => "DATA_CORRUPTION",

            Event::DocumentCreated => "DOCUMENT_CREATED",
            Event::DuplicateKeyRejected => "DUPLICATE_KEY_REJECTED",
            Event::RequestFailed => "REQUEST_FAILED",
        }
    }

    /// Returns true if this event indicates a fatal condition
    pub fn is_fatal(&self) -> bool {
        matches!(self, Event::StoreCorruption)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
