//! Schema Validator subsystem
//!
//! Every write to the record store is gated by the rule table of its record
//! kind. Reads are never validated.
//!
//! # Design Principles
//!
//! - One generic routine over explicit rule tables
//! - Validation before any backend call
//! - All violations reported in one pass
//! - No coercion, no defaults written
//! - Deterministic validation

mod errors;
mod types;
mod validator;

pub use errors::{SchemaError, SchemaErrorCode, SchemaResult, Violation};
pub use types::{
    FieldDef, FieldType, RecordKind, Schema, COUNTRY_OPERATOR_SCHEMA, USER_ACCOUNT_SCHEMA,
};
pub use validator::{check, check_document, json_type_name, SchemaValidator};
