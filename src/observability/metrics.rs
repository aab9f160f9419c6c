//! Metrics registry for the record store
//!
//! - Counters only
//! - Monotonic increase
//! - Thread-safe, lock-free

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Operational counters for one record store
///
/// All counters use Relaxed atomics; exact cross-counter consistency is not required.
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    inserts: AtomicU64,
    updates: AtomicU64,
    replaces: AtomicU64,
    removes: AtomicU64,
    fetches: AtomicU64,
    lists: AtomicU64,
    finds: AtomicU64,
    /// Writes refused by the schema gate
    rejected_writes: AtomicU64,
    /// Failures surfaced from the backend, not counting not-found
    backend_errors: AtomicU64,
}

impl MetricsRegistry {
    /// Create a new metrics registry with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_inserts(&self) {
        self.inserts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_updates(&self) {
        self.updates.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_replaces(&self) {
        self.replaces.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_removes(&self) {
        self.removes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_fetches(&self) {
        self.fetches.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_lists(&self) {
        self.lists.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_finds(&self) {
        self.finds.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_rejected_writes(&self) {
        self.rejected_writes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_backend_errors(&self) {
        self.backend_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Get all metrics as a snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            inserts: self.inserts.load(Ordering::Relaxed),
            updates: self.updates.load(Ordering::Relaxed),
            replaces: self.replaces.load(Ordering::Relaxed),
            removes: self.removes.load(Ordering::Relaxed),
            fetches: self.fetches.load(Ordering::Relaxed),
            lists: self.lists.load(Ordering::Relaxed),
            finds: self.finds.load(Ordering::Relaxed),
            rejected_writes: self.rejected_writes.load(Ordering::Relaxed),
            backend_errors: self.backend_errors.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time snapshot of all metrics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub inserts: u64,
    pub updates: u64,
    pub replaces: u64,
    pub removes: u64,
    pub fetches: u64,
    pub lists: u64,
    pub finds: u64,
    pub rejected_writes: u64,
    pub backend_errors: u64,
}
