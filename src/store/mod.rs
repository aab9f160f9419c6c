//! Record Store subsystem
//!
//! `RecordStore` owns the validation and write path; a `Backend` owns
//! physical storage and durability.
//!
//! # Invariants Enforced
//!
//! - Writes are validated before any backend call
//! - A rejected write reports all violations at once
//! - Updates are validated on the merged record, never on the patch alone
//! - Backend errors are surfaced unchanged; nothing is retried

mod backend;
mod errors;
mod file;
mod memory;
mod record_store;

pub use backend::Backend;
pub use errors::{BackendError, BackendResult, StoreError, StoreResult};
pub use file::{compute_checksum, FileBackend};
pub use memory::MemoryBackend;
pub use record_store::{RecordStore, DEFAULT_LIST_LIMIT};
