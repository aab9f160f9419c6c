//! Typed views over the governed record kinds
//!
//! The store speaks untyped JSON documents; these types give callers a
//! strongly typed way in and out. Conversions always go through the same
//! schema gate as untyped writes.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::schema::RecordKind;

/// A stored document: field name to value
pub type Document = Map<String, Value>;

/// Backend-assigned record identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generates a fresh random identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for RecordId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A document together with its identifier
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredRecord {
    pub id: RecordId,
    #[serde(flatten)]
    pub document: Document,
}

/// A typed record kind
pub trait Record: Serialize + DeserializeOwned {
    /// Kind whose rule table governs this type
    const KIND: RecordKind;

    /// Converts the record into its untyped document form.
    fn to_value(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }

    /// Reads a record back from a stored document.
    fn from_document(document: Document) -> serde_json::Result<Self> {
        serde_json::from_value(Value::Object(document))
    }
}

/// Carrier to country mapping with a routing priority flag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryOperator {
    pub country: String,
    pub operator: String,
    pub is_high_priority: bool,
}

impl CountryOperator {
    pub fn new(country: impl Into<String>, operator: impl Into<String>, is_high_priority: bool) -> Self {
        Self {
            country: country.into(),
            operator: operator.into(),
            is_high_priority,
        }
    }
}

impl Record for CountryOperator {
    const KIND: RecordKind = RecordKind::CountryOperator;
}

/// User account holding a credential hashed by the caller
///
/// `disabled` reads as `false` when the stored document omits it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    pub username: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    pub hashed_password: String,
    #[serde(default)]
    pub disabled: bool,
}

impl UserAccount {
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        hashed_password: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            full_name: None,
            hashed_password: hashed_password.into(),
            disabled: false,
        }
    }

    pub fn with_full_name(mut self, full_name: impl Into<String>) -> Self {
        self.full_name = Some(full_name.into());
        self
    }

    pub fn is_active(&self) -> bool {
        !self.disabled
    }
}

impl Record for UserAccount {
    const KIND: RecordKind = RecordKind::UserAccount;
}
