//! Rule tables for the two governed record kinds
//!
//! Each kind maps to an ordered list of `(name, type, required)` field rules.
//! The tables are `'static` and never change after startup.
//!
//! Supported types:
//! - string: UTF-8 string
//! - bool: Boolean

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use super::errors::SchemaError;

/// Field types a rule can demand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// UTF-8 string
    String,
    /// Boolean
    Bool,
}

impl FieldType {
    /// Returns the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Bool => "bool",
        }
    }

    /// Returns true if the JSON value carries this type
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            FieldType::String => value.is_string(),
            FieldType::Bool => value.is_boolean(),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// A single field rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldDef {
    /// Field name as it appears in the document
    pub name: &'static str,
    /// Field data type
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Whether field must be present
    pub required: bool,
}

impl FieldDef {
    /// Create a required string field
    pub const fn required_string(name: &'static str) -> Self {
        Self {
            name,
            field_type: FieldType::String,
            required: true,
        }
    }

    /// Create an optional string field
    pub const fn optional_string(name: &'static str) -> Self {
        Self {
            name,
            field_type: FieldType::String,
            required: false,
        }
    }

    /// Create a required bool field
    pub const fn required_bool(name: &'static str) -> Self {
        Self {
            name,
            field_type: FieldType::Bool,
            required: true,
        }
    }

    /// Create an optional bool field
    pub const fn optional_bool(name: &'static str) -> Self {
        Self {
            name,
            field_type: FieldType::Bool,
            required: false,
        }
    }

    fn description(&self) -> String {
        let article = match self.field_type {
            FieldType::String => "a string",
            FieldType::Bool => "a boolean",
        };
        if self.required {
            format!("must be {} and is required", article)
        } else {
            format!("must be {} if the field is present", article)
        }
    }
}

/// The schema-governed record kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    /// Carrier to country/priority mapping
    CountryOperator,
    /// User account with an opaque pre-hashed credential
    UserAccount,
}

impl RecordKind {
    /// Every kind, in a stable order
    pub const ALL: [RecordKind; 2] = [RecordKind::CountryOperator, RecordKind::UserAccount];

    /// Returns the rule table for this kind
    pub fn schema(&self) -> &'static Schema {
        match self {
            RecordKind::CountryOperator => &COUNTRY_OPERATOR_SCHEMA,
            RecordKind::UserAccount => &USER_ACCOUNT_SCHEMA,
        }
    }

    /// Returns the backend collection the kind is persisted in
    pub fn collection(&self) -> &'static str {
        self.schema().collection
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::CountryOperator => "country_operator",
            RecordKind::UserAccount => "user_account",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordKind {
    type Err = SchemaError;

    /// Accepts the kind name or its collection name, with `-` or `_`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        RecordKind::ALL
            .into_iter()
            .find(|kind| normalized == kind.as_str() || normalized == kind.collection())
            .ok_or_else(|| SchemaError::unknown_kind(s))
    }
}

/// Complete rule table for one record kind
#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct Schema {
    /// Kind governed by this table
    pub kind: RecordKind,
    /// Backend collection name
    pub collection: &'static str,
    /// Ordered field rules
    pub fields: &'static [FieldDef],
}

impl Schema {
    /// Looks up the rule for a field
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Names of required fields, in rule order
    pub fn required_fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().filter(|f| f.required).map(|f| f.name)
    }

    /// Renders the table as a `$jsonSchema` collection validator document.
    pub fn to_json_schema(&self) -> Value {
        let mut properties = Map::new();
        for field in self.fields {
            properties.insert(
                field.name.to_string(),
                json!({
                    "bsonType": field.field_type.type_name(),
                    "description": field.description(),
                }),
            );
        }

        json!({
            "collection": self.collection,
            "validator": {
                "$jsonSchema": {
                    "bsonType": "object",
                    "required": self.required_fields().collect::<Vec<_>>(),
                    "properties": properties,
                }
            }
        })
    }
}

pub static COUNTRY_OPERATOR_SCHEMA: Schema = Schema {
    kind: RecordKind::CountryOperator,
    collection: "country_operators",
    fields: &[
        FieldDef::required_string("country"),
        FieldDef::required_string("operator"),
        FieldDef::required_bool("is_high_priority"),
    ],
};

pub static USER_ACCOUNT_SCHEMA: Schema = Schema {
    kind: RecordKind::UserAccount,
    collection: "users",
    fields: &[
        FieldDef::required_string("username"),
        FieldDef::required_string("email"),
        FieldDef::optional_string("full_name"),
        FieldDef::required_string("hashed_password"),
        FieldDef::optional_bool("disabled"),
    ],
};
