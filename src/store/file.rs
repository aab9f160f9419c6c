//! # Local Filesystem Backend
//!
//! Layout: `<root>/<collection>/<id>.json`, one document per file.
//!
//! Each file is an envelope `{"checksum": <crc32>, "document": {...}}`. The
//! checksum covers the canonical serialization of the document and is
//! verified on every read. Writes go to a uniquely named temporary file that
//! is fsynced and renamed into place, then the collection directory is
//! fsynced. A reader sees either the old or the new document.
//!
//! Mutations hold a backend-wide write lock, so an existence check and the
//! write that depends on it cannot interleave with a concurrent remove.

use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use crc32fast::Hasher;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::backend::Backend;
use super::errors::{BackendError, BackendResult};
use crate::model::{Document, RecordId};

const DOCUMENT_EXT: &str = "json";
const TEMP_EXT: &str = "tmp";

#[derive(Serialize, Deserialize)]
struct Envelope {
    checksum: u32,
    document: Document,
}

/// Computes a CRC32 checksum over the provided data.
pub fn compute_checksum(data: &[u8]) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(data);
    hasher.finalize()
}

/// Local filesystem storage backend
#[derive(Debug)]
pub struct FileBackend {
    root: PathBuf,
    write_lock: Mutex<()>,
}

impl FileBackend {
    /// Create a backend rooted at `root`. The directory is created lazily.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Creates the directory for a collection
    pub fn create_collection(&self, collection: &str) -> BackendResult<()> {
        fs::create_dir_all(self.collection_dir(collection)).map_err(io_error)
    }

    fn lock_writes(&self) -> BackendResult<MutexGuard<'_, ()>> {
        self.write_lock
            .lock()
            .map_err(|_| BackendError::Internal("file backend write lock poisoned".into()))
    }

    fn collection_dir(&self, collection: &str) -> PathBuf {
        self.root.join(collection)
    }

    fn document_path(&self, collection: &str, id: &RecordId) -> BackendResult<PathBuf> {
        validate_id(id)?;
        Ok(self
            .collection_dir(collection)
            .join(format!("{}.{}", id, DOCUMENT_EXT)))
    }

    fn write_document(&self, path: &Path, document: Document) -> BackendResult<()> {
        let canonical = serde_json::to_vec(&document)
            .map_err(|e| BackendError::Internal(format!("serialize document: {}", e)))?;
        let envelope = Envelope {
            checksum: compute_checksum(&canonical),
            document,
        };
        let bytes = serde_json::to_vec_pretty(&envelope)
            .map_err(|e| BackendError::Internal(format!("serialize envelope: {}", e)))?;

        let dir = path
            .parent()
            .ok_or_else(|| BackendError::Internal(format!("no parent for {}", path.display())))?;
        fs::create_dir_all(dir).map_err(io_error)?;

        let temp = temp_path(path);
        if let Err(e) = write_synced(&temp, &bytes) {
            let _ = fs::remove_file(&temp);
            return Err(e);
        }
        if let Err(e) = fs::rename(&temp, path) {
            let _ = fs::remove_file(&temp);
            return Err(io_error(e));
        }
        fsync_dir(dir)
    }

    fn read_document(
        &self,
        collection: &str,
        id: &RecordId,
        path: &Path,
    ) -> BackendResult<Option<Document>> {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(io_error(e)),
        };

        let corrupt = |reason: String| BackendError::Corrupt {
            collection: collection.to_string(),
            id: id.clone(),
            reason,
        };

        let envelope: Envelope =
            serde_json::from_slice(&bytes).map_err(|e| corrupt(format!("invalid JSON: {}", e)))?;
        let canonical = serde_json::to_vec(&envelope.document)
            .map_err(|e| BackendError::Internal(format!("serialize document: {}", e)))?;
        if compute_checksum(&canonical) != envelope.checksum {
            return Err(corrupt("checksum mismatch".into()));
        }

        Ok(Some(envelope.document))
    }

    /// Ids present in a collection, sorted
    fn ids(&self, collection: &str) -> BackendResult<Vec<RecordId>> {
        let entries = match fs::read_dir(self.collection_dir(collection)) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(io_error(e)),
        };

        let mut ids = Vec::new();
        for entry in entries {
            let path = entry.map_err(io_error)?.path();
            if path.extension().map_or(true, |ext| ext != DOCUMENT_EXT) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                ids.push(RecordId::new(stem));
            }
        }
        ids.sort();
        Ok(ids)
    }
}

/// Ids name files, so they must be a single plain path component.
fn validate_id(id: &RecordId) -> BackendResult<()> {
    let raw = id.as_str();
    let plain = !raw.is_empty()
        && raw
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if plain {
        Ok(())
    } else {
        Err(BackendError::InvalidId(raw.to_string()))
    }
}

/// `<id>.<nonce>.tmp`, unique per write and skipped by directory scans.
fn temp_path(path: &Path) -> PathBuf {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();
    path.with_file_name(format!("{}.{}.{}", stem, Uuid::new_v4().simple(), TEMP_EXT))
}

fn write_synced(path: &Path, bytes: &[u8]) -> BackendResult<()> {
    let mut file = File::create(path).map_err(io_error)?;
    file.write_all(bytes).map_err(io_error)?;
    file.sync_all().map_err(io_error)
}

fn fsync_dir(dir: &Path) -> BackendResult<()> {
    let handle = OpenOptions::new().read(true).open(dir).map_err(io_error)?;
    handle.sync_all().map_err(io_error)
}

fn io_error(e: std::io::Error) -> BackendError {
    BackendError::Io(e.to_string())
}

impl Backend for FileBackend {
    fn insert(&self, collection: &str, document: Document) -> BackendResult<RecordId> {
        let _guard = self.lock_writes()?;
        let mut id = RecordId::generate();
        let mut path = self.document_path(collection, &id)?;
        while path.exists() {
            id = RecordId::generate();
            path = self.document_path(collection, &id)?;
        }
        self.write_document(&path, document)?;
        Ok(id)
    }

    fn update(&self, collection: &str, id: &RecordId, document: Document) -> BackendResult<()> {
        let path = self.document_path(collection, id)?;
        let _guard = self.lock_writes()?;
        if !path.exists() {
            return Err(BackendError::NotFound {
                collection: collection.to_string(),
                id: id.clone(),
            });
        }
        self.write_document(&path, document)
    }

    fn fetch(&self, collection: &str, id: &RecordId) -> BackendResult<Option<Document>> {
        let path = self.document_path(collection, id)?;
        self.read_document(collection, id, &path)
    }

    fn remove(&self, collection: &str, id: &RecordId) -> BackendResult<()> {
        let path = self.document_path(collection, id)?;
        let _guard = self.lock_writes()?;
        fs::remove_file(&path).map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                BackendError::NotFound {
                    collection: collection.to_string(),
                    id: id.clone(),
                }
            } else {
                io_error(e)
            }
        })?;
        if let Some(dir) = path.parent() {
            fsync_dir(dir)?;
        }
        Ok(())
    }

    fn list(&self, collection: &str, limit: usize) -> BackendResult<Vec<(RecordId, Document)>> {
        let mut records = Vec::new();
        for id in self.ids(collection)? {
            if records.len() >= limit {
                break;
            }
            let path = self.document_path(collection, &id)?;
            // Removed between directory scan and read
            if let Some(document) = self.read_document(collection, &id, &path)? {
                records.push((id, document));
            }
        }
        Ok(records)
    }

    fn find_one(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> BackendResult<Option<(RecordId, Document)>> {
        for id in self.ids(collection)? {
            let path = self.document_path(collection, &id)?;
            if let Some(document) = self.read_document(collection, &id, &path)? {
                if document.get(field) == Some(value) {
                    return Ok(Some((id, document)));
                }
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            _ => panic!("fixture must be an object"),
        }
    }

    #[test]
    fn test_write_read() {
        let temp = TempDir::new().unwrap();
        let backend = FileBackend::new(temp.path());

        let id = backend
            .insert("country_operators", doc(json!({ "country": "US" })))
            .unwrap();
        let fetched = backend.fetch("country_operators", &id).unwrap().unwrap();
        assert_eq!(fetched["country"], "US");
        assert!(temp
            .path()
            .join("country_operators")
            .join(format!("{}.json", id))
            .exists());
    }

    #[test]
    fn test_fetch_missing_is_none() {
        let temp = TempDir::new().unwrap();
        let backend = FileBackend::new(temp.path());

        assert!(backend
            .fetch("users", &RecordId::new("missing"))
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_update_overwrites() {
        let temp = TempDir::new().unwrap();
        let backend = FileBackend::new(temp.path());

        let id = backend.insert("users", doc(json!({ "username": "a" }))).unwrap();
        backend
            .update("users", &id, doc(json!({ "username": "b" })))
            .unwrap();
        assert_eq!(backend.fetch("users", &id).unwrap().unwrap()["username"], "b");

        let missing = backend.update("users", &RecordId::new("ghost"), Document::new());
        assert!(matches!(missing, Err(BackendError::NotFound { .. })));
    }

    #[test]
    fn test_checksum_detects_corruption() {
        let temp = TempDir::new().unwrap();
        let backend = FileBackend::new(temp.path());

        let id = backend.insert("users", doc(json!({ "username": "alice" }))).unwrap();
        let path = temp.path().join("users").join(format!("{}.json", id));
        let tampered = fs::read_to_string(&path).unwrap().replace("alice", "mallory");
        fs::write(&path, tampered).unwrap();

        let result = backend.fetch("users", &id);
        assert!(matches!(result, Err(BackendError::Corrupt { .. })));
    }

    #[test]
    fn test_path_traversal_id_rejected() {
        let temp = TempDir::new().unwrap();
        let backend = FileBackend::new(temp.path());

        let result = backend.fetch("users", &RecordId::new("../etc/passwd"));
        assert!(matches!(result, Err(BackendError::InvalidId(_))));
    }

    #[test]
    fn test_remove_and_list() {
        let temp = TempDir::new().unwrap();
        let backend = FileBackend::new(temp.path());

        let a = backend.insert("users", doc(json!({ "username": "a" }))).unwrap();
        backend.insert("users", doc(json!({ "username": "b" }))).unwrap();
        backend.insert("users", doc(json!({ "username": "c" }))).unwrap();

        assert_eq!(backend.list("users", 2).unwrap().len(), 2);

        backend.remove("users", &a).unwrap();
        let remaining = backend.list("users", 100).unwrap();
        assert_eq!(remaining.len(), 2);
        assert!(remaining.iter().all(|(id, _)| *id != a));
        assert!(matches!(
            backend.remove("users", &a),
            Err(BackendError::NotFound { .. })
        ));
    }

    #[test]
    fn test_list_ignores_temp_files() {
        let temp = TempDir::new().unwrap();
        let backend = FileBackend::new(temp.path());
        backend.create_collection("users").unwrap();
        fs::write(temp.path().join("users").join("half.json.tmp"), b"{").unwrap();

        assert!(backend.list("users", 100).unwrap().is_empty());
    }

    #[test]
    fn test_writes_leave_no_temp_files() {
        let temp = TempDir::new().unwrap();
        let backend = FileBackend::new(temp.path());

        let id = backend.insert("users", doc(json!({ "username": "a" }))).unwrap();
        for name in ["b", "c", "d"] {
            backend
                .update("users", &id, doc(json!({ "username": name })))
                .unwrap();
        }

        let names: Vec<String> = fs::read_dir(temp.path().join("users"))
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec![format!("{}.json", id)]);
    }

    #[test]
    fn test_temp_paths_are_unique_per_write() {
        let path = Path::new("/data/users/abc.json");
        let first = temp_path(path);
        let second = temp_path(path);

        assert_ne!(first, second);
        assert_eq!(first.extension().unwrap(), TEMP_EXT);
        assert!(first
            .file_name()
            .unwrap()
            .to_str()
            .unwrap()
            .starts_with("abc."));
    }

    #[test]
    fn test_find_one() {
        let temp = TempDir::new().unwrap();
        let backend = FileBackend::new(temp.path());

        let id = backend
            .insert("users", doc(json!({ "username": "alice", "email": "a@x.com" })))
            .unwrap();

        let (found_id, _) = backend
            .find_one("users", "email", &json!("a@x.com"))
            .unwrap()
            .unwrap();
        assert_eq!(found_id, id);
        assert!(backend
            .find_one("users", "email", &json!("z@x.com"))
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_checksum_deterministic() {
        let data = b"country operator document";
        assert_eq!(compute_checksum(data), compute_checksum(data));
        assert_ne!(compute_checksum(b"a"), compute_checksum(b"b"));
    }
}
