//! # Storage Backend Trait
//!
//! The record store owns validation; a backend owns physical storage.
//! Implementations must make each individual call atomic for the record it
//! touches and must assign unique ids on insert.

use serde_json::Value;

use super::errors::BackendResult;
use crate::model::{Document, RecordId};

/// Backend trait for persistent document storage
pub trait Backend: Send + Sync + std::fmt::Debug {
    /// Store a new document, returning its assigned id
    fn insert(&self, collection: &str, document: Document) -> BackendResult<RecordId>;

    /// Overwrite an existing document. `BackendError::NotFound` if absent.
    fn update(&self, collection: &str, id: &RecordId, document: Document) -> BackendResult<()>;

    /// Read a document, `None` if absent
    fn fetch(&self, collection: &str, id: &RecordId) -> BackendResult<Option<Document>>;

    /// Delete a document. `BackendError::NotFound` if absent.
    fn remove(&self, collection: &str, id: &RecordId) -> BackendResult<()>;

    /// Up to `limit` documents, ordered by id
    fn list(&self, collection: &str, limit: usize) -> BackendResult<Vec<(RecordId, Document)>>;

    /// First document (by id order) whose `field` equals `value`
    fn find_one(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> BackendResult<Option<(RecordId, Document)>>;
}

impl<B: Backend + ?Sized> Backend for Box<B> {
    fn insert(&self, collection: &str, document: Document) -> BackendResult<RecordId> {
        (**self).insert(collection, document)
    }

    fn update(&self, collection: &str, id: &RecordId, document: Document) -> BackendResult<()> {
        (**self).update(collection, id, document)
    }

    fn fetch(&self, collection: &str, id: &RecordId) -> BackendResult<Option<Document>> {
        (**self).fetch(collection, id)
    }

    fn remove(&self, collection: &str, id: &RecordId) -> BackendResult<()> {
        (**self).remove(collection, id)
    }

    fn list(&self, collection: &str, limit: usize) -> BackendResult<Vec<(RecordId, Document)>> {
        (**self).list(collection, limit)
    }

    fn find_one(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> BackendResult<Option<(RecordId, Document)>> {
        (**self).find_one(collection, field, value)
    }
}
