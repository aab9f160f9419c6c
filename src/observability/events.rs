//! Observable record store events
//!
//! Events are explicit and typed.

use std::fmt;

use super::logger::Severity;

/// Observable events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Lifecycle
    /// Configuration loaded
    ConfigLoaded,
    /// Data directory initialized
    DataDirInitialized,
    /// Record store opened over a backend
    StoreOpened,

    // Writes
    /// Record inserted
    RecordInserted,
    /// Record merged with a partial update
    RecordUpdated,
    /// Record replaced in full
    RecordReplaced,
    /// Record removed
    RecordRemoved,
    /// Write rejected by the schema gate
    WriteRejected,

    // Reads
    /// Record fetched
    RecordFetched,
    /// Collection listed
    CollectionListed,
    /// Field equality lookup
    RecordLookup,

    /// Backend call failed
    BackendFailure,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::DataDirInitialized => "DATA_DIR_INITIALIZED",
            Event::StoreOpened => "STORE_OPENED",

            Event::RecordInserted => "RECORD_INSERTED",
            Event::RecordUpdated => "RECORD_UPDATED",
            Event::RecordReplaced => "RECORD_REPLACED",
            Event::RecordRemoved => "RECORD_REMOVED",
            Event::WriteRejected => "WRITE_REJECTED",

            Event::RecordFetched => "RECORD_FETCHED",
            Event::CollectionListed => "COLLECTION_LISTED",
            Event::RecordLookup => "RECORD_LOOKUP",

            Event::BackendFailure => "BACKEND_FAILURE",
        }
    }

    /// Severity the event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::RecordFetched | Event::CollectionListed | Event::RecordLookup => {
                Severity::Trace
            },
            Event::WriteRejected => Severity::Warn,
            Event::BackendFailure => Severity::Error,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
