//! smsconf - A schema-validated record store for SMS carrier routing configuration
//!
//! Two record kinds are governed: carrier priority mappings
//! (`country_operators`) and user accounts (`users`). Every write is checked
//! against the kind's rule table before it reaches the storage backend.

pub mod cli;
pub mod model;
pub mod observability;
pub mod schema;
pub mod store;

pub use model::{CountryOperator, Document, Record, RecordId, StoredRecord, UserAccount};
pub use schema::{RecordKind, SchemaError, SchemaValidator, Violation};
pub use store::{Backend, BackendError, FileBackend, MemoryBackend, RecordStore, StoreError};
