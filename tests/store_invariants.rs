//! Record Store Invariant Tests
//!
//! - A rejected write never reaches the backend
//! - Backend errors reach the caller unchanged and are not retried
//! - Updates are validated on the merged record
//! - The store is shareable across threads

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use serde_json::{json, Value};
use smsconf::store::{Backend, BackendError, BackendResult, MemoryBackend, RecordStore, StoreError};
use smsconf::{CountryOperator, Document, RecordId, RecordKind, UserAccount, Violation};

// =============================================================================
// Test Utilities
// =============================================================================

/// Backend wrapper counting every call, with an optional injected failure.
#[derive(Debug, Default)]
struct CountingBackend {
    inner: MemoryBackend,
    calls: AtomicUsize,
    fail_with: Option<BackendError>,
}

impl CountingBackend {
    fn failing(err: BackendError) -> Self {
        Self {
            fail_with: Some(err),
            ..Self::default()
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn enter(&self) -> BackendResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.fail_with {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

impl Backend for CountingBackend {
    fn insert(&self, collection: &str, document: Document) -> BackendResult<RecordId> {
        self.enter()?;
        self.inner.insert(collection, document)
    }

    fn update(&self, collection: &str, id: &RecordId, document: Document) -> BackendResult<()> {
        self.enter()?;
        self.inner.update(collection, id, document)
    }

    fn fetch(&self, collection: &str, id: &RecordId) -> BackendResult<Option<Document>> {
        self.enter()?;
        self.inner.fetch(collection, id)
    }

    fn remove(&self, collection: &str, id: &RecordId) -> BackendResult<()> {
        self.enter()?;
        self.inner.remove(collection, id)
    }

    fn list(&self, collection: &str, limit: usize) -> BackendResult<Vec<(RecordId, Document)>> {
        self.enter()?;
        self.inner.list(collection, limit)
    }

    fn find_one(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> BackendResult<Option<(RecordId, Document)>> {
        self.enter()?;
        self.inner.find_one(collection, field, value)
    }
}

fn operator(country: &str, name: &str, high: bool) -> Value {
    json!({ "country": country, "operator": name, "is_high_priority": high })
}

// =============================================================================
// Rejected Writes Never Reach The Backend
// =============================================================================

#[test]
fn test_invalid_insert_makes_no_backend_call() {
    let store = RecordStore::new(CountingBackend::default());

    let err = store
        .insert(
            RecordKind::CountryOperator,
            &json!({ "country": "US", "operator": 42 }),
        )
        .unwrap_err();

    assert_eq!(store.backend().calls(), 0);
    assert_eq!(
        err.as_validation().unwrap().violations(),
        &[
            Violation::type_mismatch("operator", "string", "number"),
            Violation::missing_field("is_high_priority"),
        ]
    );
    assert_eq!(store.metrics().rejected_writes, 1);
}

#[test]
fn test_invalid_replace_makes_no_backend_call() {
    let store = RecordStore::new(CountingBackend::default());

    let err = store
        .replace(
            RecordKind::UserAccount,
            &RecordId::new("any"),
            &json!({ "username": "alice" }),
        )
        .unwrap_err();

    assert!(matches!(err, StoreError::Validation(_)));
    assert_eq!(store.backend().calls(), 0);
}

#[test]
fn test_non_object_patch_makes_no_backend_call() {
    let store = RecordStore::new(CountingBackend::default());

    let err = store
        .update(RecordKind::UserAccount, &RecordId::new("any"), &json!([1, 2]))
        .unwrap_err();

    assert_eq!(err.code(), "SMS_INVALID_PATCH");
    assert_eq!(store.backend().calls(), 0);
}

#[test]
fn test_valid_insert_makes_exactly_one_backend_call() {
    let store = RecordStore::new(CountingBackend::default());

    store
        .insert(RecordKind::CountryOperator, &operator("US", "Acme", true))
        .unwrap();
    assert_eq!(store.backend().calls(), 1);
}

// =============================================================================
// Backend Failures
// =============================================================================

#[test]
fn test_backend_error_surfaced_unchanged_without_retry() {
    let injected = BackendError::Unavailable("connection refused".into());
    let store = RecordStore::new(CountingBackend::failing(injected.clone()));

    let err = store
        .insert(RecordKind::CountryOperator, &operator("US", "Acme", true))
        .unwrap_err();

    match err {
        StoreError::Backend(inner) => assert_eq!(inner, injected),
        other => panic!("expected backend error, got {:?}", other),
    }
    assert_eq!(store.backend().calls(), 1);
    assert_eq!(store.metrics().backend_errors, 1);
}

#[test]
fn test_fetch_backend_error_surfaced() {
    let injected = BackendError::Io("read timeout".into());
    let store = RecordStore::new(CountingBackend::failing(injected.clone()));

    let err = store
        .fetch(RecordKind::UserAccount, &RecordId::new("u1"))
        .unwrap_err();
    assert!(matches!(err, StoreError::Backend(ref inner) if *inner == injected));
    assert_eq!(err.code(), "SMS_BACKEND_ERROR");
}

// =============================================================================
// Update Semantics
// =============================================================================

#[test]
fn test_update_validates_merged_record() {
    let store = RecordStore::new(MemoryBackend::new());
    let id = store
        .insert_record(&UserAccount::new("alice", "a@x.com", "h1"))
        .unwrap();

    // Patch alone lacks required fields; merged record is complete
    store
        .update(RecordKind::UserAccount, &id, &json!({ "full_name": "Alice" }))
        .unwrap();

    let account: UserAccount = store.fetch_record(&id).unwrap();
    assert_eq!(account.full_name.as_deref(), Some("Alice"));
    assert_eq!(account.username, "alice");
    assert!(!account.disabled);
}

#[test]
fn test_rejected_update_leaves_record_untouched() {
    let store = RecordStore::new(MemoryBackend::new());
    let id = store
        .insert(RecordKind::CountryOperator, &operator("IN", "Airtel", false))
        .unwrap();

    let err = store
        .update(
            RecordKind::CountryOperator,
            &id,
            &json!({ "country": "", "is_high_priority": "yes" }),
        )
        .unwrap_err();
    assert_eq!(err.as_validation().unwrap().violations().len(), 2);

    let stored = store.fetch(RecordKind::CountryOperator, &id).unwrap();
    assert_eq!(Value::Object(stored), operator("IN", "Airtel", false));
}

#[test]
fn test_update_unknown_id_is_not_found() {
    let store = RecordStore::new(MemoryBackend::new());
    let err = store
        .update(
            RecordKind::CountryOperator,
            &RecordId::new("missing"),
            &json!({ "is_high_priority": true }),
        )
        .unwrap_err();
    assert_eq!(err.code(), "SMS_RECORD_NOT_FOUND");
}

#[test]
fn test_fetch_does_not_validate() {
    let backend = MemoryBackend::new();
    let mut legacy = Document::new();
    legacy.insert("country".into(), json!("US"));
    let id = backend.insert("country_operators", legacy).unwrap();

    let store = RecordStore::new(backend);
    let doc = store.fetch(RecordKind::CountryOperator, &id).unwrap();
    assert_eq!(doc.len(), 1);
}

// =============================================================================
// Concurrency
// =============================================================================

#[test]
fn test_concurrent_inserts_get_distinct_ids() {
    let store = Arc::new(RecordStore::new(MemoryBackend::new()));
    let mut handles = Vec::new();

    for t in 0..8 {
        let store = Arc::clone(&store);
        handles.push(thread::spawn(move || {
            (0..25)
                .map(|n| {
                    store
                        .insert_record(&CountryOperator::new(
                            format!("C{}", t),
                            format!("Op{}", n),
                            n % 2 == 0,
                        ))
                        .unwrap()
                })
                .collect::<Vec<_>>()
        }));
    }

    let mut ids: Vec<RecordId> = handles
        .into_iter()
        .flat_map(|h| h.join().unwrap())
        .collect();
    ids.sort();
    ids.dedup();

    assert_eq!(ids.len(), 200);
    assert_eq!(store.metrics().inserts, 200);
    assert_eq!(
        store
            .list(RecordKind::CountryOperator, Some(1000))
            .unwrap()
            .len(),
        200
    );
}
