//! Schema-gated record store
//!
//! Every write passes the rule table of its kind before the backend is
//! called. A rejected write never reaches the backend. Reads pass straight
//! through; data at rest is trusted to have passed the gate when written.
//!
//! The store holds no record state of its own. Concurrent callers share it
//! by reference and rely on the backend for per-record atomicity.

use serde_json::Value;

use super::backend::Backend;
use super::errors::{BackendError, StoreError, StoreResult};
use crate::model::{Document, Record, RecordId, StoredRecord, UserAccount};
use crate::observability::{log_event, Event, MetricsRegistry, MetricsSnapshot};
use crate::schema::{self, RecordKind, SchemaError};

/// Default upper bound on documents returned by [`RecordStore::list`]
pub const DEFAULT_LIST_LIMIT: usize = 100;

/// Validating front for a storage backend
#[derive(Debug)]
pub struct RecordStore<B: Backend> {
    backend: B,
    metrics: MetricsRegistry,
    list_limit: usize,
}

impl<B: Backend> RecordStore<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            metrics: MetricsRegistry::new(),
            list_limit: DEFAULT_LIST_LIMIT,
        }
    }

    /// Overrides the default list limit. Zero is treated as one.
    pub fn with_list_limit(mut self, limit: usize) -> Self {
        self.list_limit = limit.max(1);
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Validates a record without storing it.
    pub fn check(&self, kind: RecordKind, record: &Value) -> Result<(), SchemaError> {
        schema::check(kind, record).map(|_| ())
    }

    /// Validates and stores a new record, returning the backend-assigned id.
    ///
    /// # Errors
    ///
    /// - `StoreError::Validation` with every violation; the backend is not called
    /// - `StoreError::Backend` if the write fails
    pub fn insert(&self, kind: RecordKind, record: &Value) -> StoreResult<RecordId> {
        let document = self.admit(kind, record)?;

        let id = self
            .backend
            .insert(kind.collection(), document)
            .map_err(|e| self.backend_failure(kind, "insert", e))?;

        self.metrics.increment_inserts();
        log_event(
            Event::RecordInserted,
            &[("kind", kind.as_str()), ("id", id.as_str())],
        );
        Ok(id)
    }

    /// Merges `partial` onto the stored record and stores the result.
    ///
    /// The merged document is validated against the full rule table, so a
    /// patch can never leave a record without its required fields.
    ///
    /// # Errors
    ///
    /// - `StoreError::InvalidPatch` if `partial` is not an object
    /// - `StoreError::NotFound` if `id` does not exist
    /// - `StoreError::Validation` if the merged record breaks the rule table
    /// - `StoreError::Backend` if a backend call fails
    pub fn update(&self, kind: RecordKind, id: &RecordId, partial: &Value) -> StoreResult<()> {
        let patch = partial.as_object().ok_or_else(|| {
            StoreError::InvalidPatch(format!(
                "expected an object, got {}",
                schema::json_type_name(partial)
            ))
        })?;

        let mut merged = self.load(kind, id)?;
        for (field, value) in patch {
            merged.insert(field.clone(), value.clone());
        }

        if let Err(err) = schema::check_document(kind, &merged) {
            return Err(self.rejected(kind, err));
        }

        self.backend
            .update(kind.collection(), id, merged)
            .map_err(|e| self.backend_failure(kind, "update", e))?;

        self.metrics.increment_updates();
        log_event(
            Event::RecordUpdated,
            &[("kind", kind.as_str()), ("id", id.as_str())],
        );
        Ok(())
    }

    /// Replaces a stored record with a complete new one.
    pub fn replace(&self, kind: RecordKind, id: &RecordId, record: &Value) -> StoreResult<()> {
        let document = self.admit(kind, record)?;

        self.backend
            .update(kind.collection(), id, document)
            .map_err(|e| self.backend_failure(kind, "replace", e))?;

        self.metrics.increment_replaces();
        log_event(
            Event::RecordReplaced,
            &[("kind", kind.as_str()), ("id", id.as_str())],
        );
        Ok(())
    }

    /// Reads a record. No validation is applied.
    pub fn fetch(&self, kind: RecordKind, id: &RecordId) -> StoreResult<Document> {
        let document = self.load(kind, id)?;
        self.metrics.increment_fetches();
        log_event(
            Event::RecordFetched,
            &[("kind", kind.as_str()), ("id", id.as_str())],
        );
        Ok(document)
    }

    pub fn remove(&self, kind: RecordKind, id: &RecordId) -> StoreResult<()> {
        self.backend
            .remove(kind.collection(), id)
            .map_err(|e| self.backend_failure(kind, "remove", e))?;

        self.metrics.increment_removes();
        log_event(
            Event::RecordRemoved,
            &[("kind", kind.as_str()), ("id", id.as_str())],
        );
        Ok(())
    }

    /// Lists up to `limit` records (the store's list limit when `None`).
    pub fn list(&self, kind: RecordKind, limit: Option<usize>) -> StoreResult<Vec<StoredRecord>> {
        let limit = limit.unwrap_or(self.list_limit);
        let records = self
            .backend
            .list(kind.collection(), limit)
            .map_err(|e| self.backend_failure(kind, "list", e))?;

        self.metrics.increment_lists();
        let count = records.len().to_string();
        log_event(
            Event::CollectionListed,
            &[("kind", kind.as_str()), ("count", count.as_str())],
        );
        Ok(records
            .into_iter()
            .map(|(id, document)| StoredRecord { id, document })
            .collect())
    }

    /// First record whose `field` equals `value`.
    pub fn find_one(
        &self,
        kind: RecordKind,
        field: &str,
        value: &Value,
    ) -> StoreResult<Option<StoredRecord>> {
        let found = self
            .backend
            .find_one(kind.collection(), field, value)
            .map_err(|e| self.backend_failure(kind, "find_one", e))?;

        self.metrics.increment_finds();
        log_event(
            Event::RecordLookup,
            &[
                ("kind", kind.as_str()),
                ("field", field),
                ("found", if found.is_some() { "true" } else { "false" }),
            ],
        );
        Ok(found.map(|(id, document)| StoredRecord { id, document }))
    }

    // Typed helpers

    pub fn insert_record<R: Record>(&self, record: &R) -> StoreResult<RecordId> {
        self.insert(R::KIND, &record.to_value()?)
    }

    pub fn replace_record<R: Record>(&self, id: &RecordId, record: &R) -> StoreResult<()> {
        self.replace(R::KIND, id, &record.to_value()?)
    }

    pub fn fetch_record<R: Record>(&self, id: &RecordId) -> StoreResult<R> {
        let document = self.fetch(R::KIND, id)?;
        Ok(R::from_document(document)?)
    }

    /// Enables or disables a user account.
    pub fn set_disabled(&self, id: &RecordId, disabled: bool) -> StoreResult<()> {
        self.update(
            RecordKind::UserAccount,
            id,
            &serde_json::json!({ "disabled": disabled }),
        )
    }

    /// Swaps in a new pre-hashed credential for a user account.
    pub fn rotate_password(&self, id: &RecordId, hashed_password: &str) -> StoreResult<()> {
        self.update(
            RecordKind::UserAccount,
            id,
            &serde_json::json!({ "hashed_password": hashed_password }),
        )
    }

    pub fn find_user_by_username(
        &self,
        username: &str,
    ) -> StoreResult<Option<(RecordId, UserAccount)>> {
        match self.find_one(
            RecordKind::UserAccount,
            "username",
            &Value::String(username.to_string()),
        )? {
            Some(StoredRecord { id, document }) => {
                Ok(Some((id, UserAccount::from_document(document)?)))
            }
            None => Ok(None),
        }
    }

    /// Runs the schema gate and clones the record into a document.
    fn admit(&self, kind: RecordKind, record: &Value) -> StoreResult<Document> {
        match schema::check(kind, record) {
            Ok(fields) => Ok(fields.clone()),
            Err(err) => Err(self.rejected(kind, err)),
        }
    }

    fn load(&self, kind: RecordKind, id: &RecordId) -> StoreResult<Document> {
        self.backend
            .fetch(kind.collection(), id)
            .map_err(|e| self.backend_failure(kind, "fetch", e))?
            .ok_or_else(|| StoreError::NotFound {
                kind,
                id: id.clone(),
            })
    }

    fn rejected(&self, kind: RecordKind, err: SchemaError) -> StoreError {
        self.metrics.increment_rejected_writes();
        let count = err.violations().len().to_string();
        log_event(
            Event::WriteRejected,
            &[("kind", kind.as_str()), ("violations", count.as_str())],
        );
        StoreError::Validation(err)
    }

    fn backend_failure(&self, kind: RecordKind, op: &str, err: BackendError) -> StoreError {
        match err {
            BackendError::NotFound { id, .. } => StoreError::NotFound { kind, id },
            other => {
                self.metrics.increment_backend_errors();
                let message = other.to_string();
                log_event(
                    Event::BackendFailure,
                    &[("kind", kind.as_str()), ("op", op), ("error", message.as_str())],
                );
                StoreError::Backend(other)
            }
        }
    }
}
