//! Schema validator for record validation
//!
//! Validation semantics:
//! - All required fields are present
//! - Present fields match their declared type exactly (null never matches)
//! - Required strings are non-empty
//! - Undeclared fields are ignored
//! - Every violation is collected; validation never stops at the first one
//!
//! The validator is a pure function of its inputs and does not mutate records.

use serde_json::{Map, Value};

use super::errors::{SchemaError, SchemaResult, Violation};
use super::types::{FieldType, RecordKind, Schema};

/// Validates records against one kind's rule table.
#[derive(Debug, Clone, Copy)]
pub struct SchemaValidator {
    schema: &'static Schema,
}

impl SchemaValidator {
    /// Creates a validator for the given record kind.
    pub fn for_kind(kind: RecordKind) -> Self {
        Self {
            schema: kind.schema(),
        }
    }

    /// Returns the rule table this validator enforces.
    pub fn schema(&self) -> &'static Schema {
        self.schema
    }

    /// Validates a record, returning the record's fields on success.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError` (SMS_SCHEMA_VALIDATION_FAILED) listing every
    /// violation if the record is not an object or breaks any field rule.
    pub fn validate<'r>(&self, record: &'r Value) -> SchemaResult<&'r Map<String, Value>> {
        let obj = record.as_object().ok_or_else(|| {
            SchemaError::validation_failed(
                self.schema.kind,
                vec![Violation::type_mismatch(
                    "$root",
                    "object",
                    json_type_name(record),
                )],
            )
        })?;

        self.validate_fields(obj)?;
        Ok(obj)
    }

    /// Validates an already-unwrapped document.
    pub fn validate_fields(&self, obj: &Map<String, Value>) -> SchemaResult<()> {
        let violations = self.violations(obj);
        if violations.is_empty() {
            Ok(())
        } else {
            Err(SchemaError::validation_failed(self.schema.kind, violations))
        }
    }

    /// Collects every violation of the rule table, in rule order.
    pub fn violations(&self, obj: &Map<String, Value>) -> Vec<Violation> {
        let mut violations = Vec::new();

        for field in self.schema.fields {
            match obj.get(field.name) {
                None => {
                    if field.required {
                        violations.push(Violation::missing_field(field.name));
                    }
                }
                Some(value) if !field.field_type.matches(value) => {
                    violations.push(Violation::type_mismatch(
                        field.name,
                        field.field_type.type_name(),
                        json_type_name(value),
                    ));
                }
                Some(Value::String(s))
                    if field.required && field.field_type == FieldType::String && s.is_empty() =>
                {
                    violations.push(Violation::empty_value(field.name));
                }
                Some(_) => {}
            }
        }

        violations
    }
}

/// Validates a record of the given kind.
pub fn check(kind: RecordKind, record: &Value) -> SchemaResult<&Map<String, Value>> {
    SchemaValidator::for_kind(kind).validate(record)
}

/// Validates an unwrapped document of the given kind.
pub fn check_document(kind: RecordKind, document: &Map<String, Value>) -> SchemaResult<()> {
    SchemaValidator::for_kind(kind).validate_fields(document)
}

/// Returns the JSON type name for error messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
