//! # In-Memory Backend

use std::collections::{BTreeMap, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde_json::Value;

use super::backend::Backend;
use super::errors::{BackendError, BackendResult};
use crate::model::{Document, RecordId};

type Collections = HashMap<String, BTreeMap<RecordId, Document>>;

/// Process-local backend, for tests and ephemeral use
#[derive(Debug, Default)]
pub struct MemoryBackend {
    collections: RwLock<Collections>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents held in a collection
    pub fn len(&self, collection: &str) -> usize {
        self.read()
            .map(|c| c.get(collection).map_or(0, BTreeMap::len))
            .unwrap_or(0)
    }

    pub fn is_empty(&self, collection: &str) -> bool {
        self.len(collection) == 0
    }

    fn read(&self) -> BackendResult<RwLockReadGuard<'_, Collections>> {
        self.collections
            .read()
            .map_err(|_| BackendError::Internal("memory backend lock poisoned".into()))
    }

    fn write(&self) -> BackendResult<RwLockWriteGuard<'_, Collections>> {
        self.collections
            .write()
            .map_err(|_| BackendError::Internal("memory backend lock poisoned".into()))
    }
}

fn not_found(collection: &str, id: &RecordId) -> BackendError {
    BackendError::NotFound {
        collection: collection.to_string(),
        id: id.clone(),
    }
}

impl Backend for MemoryBackend {
    fn insert(&self, collection: &str, document: Document) -> BackendResult<RecordId> {
        let mut collections = self.write()?;
        let docs = collections.entry(collection.to_string()).or_default();

        let mut id = RecordId::generate();
        while docs.contains_key(&id) {
            id = RecordId::generate();
        }
        docs.insert(id.clone(), document);
        Ok(id)
    }

    fn update(&self, collection: &str, id: &RecordId, document: Document) -> BackendResult<()> {
        let mut collections = self.write()?;
        let slot = collections
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(id))
            .ok_or_else(|| not_found(collection, id))?;
        *slot = document;
        Ok(())
    }

    fn fetch(&self, collection: &str, id: &RecordId) -> BackendResult<Option<Document>> {
        let collections = self.read()?;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.get(id))
            .cloned())
    }

    fn remove(&self, collection: &str, id: &RecordId) -> BackendResult<()> {
        let mut collections = self.write()?;
        collections
            .get_mut(collection)
            .and_then(|docs| docs.remove(id))
            .map(|_| ())
            .ok_or_else(|| not_found(collection, id))
    }

    fn list(&self, collection: &str, limit: usize) -> BackendResult<Vec<(RecordId, Document)>> {
        let collections = self.read()?;
        Ok(collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .take(limit)
                    .map(|(id, doc)| (id.clone(), doc.clone()))
                    .collect()
            })
            .unwrap_or_default())
    }

    fn find_one(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> BackendResult<Option<(RecordId, Document)>> {
        let collections = self.read()?;
        Ok(collections.get(collection).and_then(|docs| {
            docs.iter()
                .find(|(_, doc)| doc.get(field) == Some(value))
                .map(|(id, doc)| (id.clone(), doc.clone()))
        }))
    }
}
