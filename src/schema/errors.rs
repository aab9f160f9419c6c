//! Schema error types
//!
//! Error codes:
//! - SMS_SCHEMA_VALIDATION_FAILED (REJECT)
//! - SMS_UNKNOWN_RECORD_KIND (REJECT)

use std::fmt;

use serde::Serialize;

use super::types::RecordKind;

/// Schema-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaErrorCode {
    /// Record violates its rule table
    SmsSchemaValidationFailed,
    /// Record kind name not recognised
    SmsUnknownRecordKind,
}

impl SchemaErrorCode {
    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            SchemaErrorCode::SmsSchemaValidationFailed => "SMS_SCHEMA_VALIDATION_FAILED",
            SchemaErrorCode::SmsUnknownRecordKind => "SMS_UNKNOWN_RECORD_KIND",
        }
    }
}

impl fmt::Display for SchemaErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// One field failing validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "violation", rename_all = "snake_case")]
pub enum Violation {
    /// Required field absent
    MissingField { field: String },
    /// Field present with the wrong type
    TypeMismatch {
        field: String,
        expected: &'static str,
        actual: &'static str,
    },
    /// Required string field present but empty
    EmptyValue { field: String },
}

impl Violation {
    pub fn missing_field(field: impl Into<String>) -> Self {
        Violation::MissingField {
            field: field.into(),
        }
    }

    pub fn type_mismatch(
        field: impl Into<String>,
        expected: &'static str,
        actual: &'static str,
    ) -> Self {
        Violation::TypeMismatch {
            field: field.into(),
            expected,
            actual,
        }
    }

    pub fn empty_value(field: impl Into<String>) -> Self {
        Violation::EmptyValue {
            field: field.into(),
        }
    }

    /// Name of the offending field
    pub fn field(&self) -> &str {
        match self {
            Violation::MissingField { field }
            | Violation::TypeMismatch { field, .. }
            | Violation::EmptyValue { field } => field,
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::MissingField { field } => {
                write!(f, "field '{}': expected field to be present, got missing", field)
            }
            Violation::TypeMismatch {
                field,
                expected,
                actual,
            } => write!(f, "field '{}': expected {}, got {}", field, expected, actual),
            Violation::EmptyValue { field } => {
                write!(f, "field '{}': expected non-empty string, got empty string", field)
            }
        }
    }
}

/// Schema error with full context
///
/// A validation failure always carries every violation found, in rule order.
#[derive(Debug, Clone)]
pub struct SchemaError {
    code: SchemaErrorCode,
    message: String,
    kind: Option<RecordKind>,
    violations: Vec<Violation>,
}

impl SchemaError {
    /// Create a validation failed error
    pub fn validation_failed(kind: RecordKind, violations: Vec<Violation>) -> Self {
        let listed = violations
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        Self {
            code: SchemaErrorCode::SmsSchemaValidationFailed,
            message: format!(
                "{} record has {} violation(s): {}",
                kind,
                violations.len(),
                listed
            ),
            kind: Some(kind),
            violations,
        }
    }

    /// Create an unknown record kind error
    pub fn unknown_kind(name: impl Into<String>) -> Self {
        Self {
            code: SchemaErrorCode::SmsUnknownRecordKind,
            message: format!("Unknown record kind '{}'", name.into()),
            kind: None,
            violations: Vec::new(),
        }
    }

    /// Returns the error code
    pub fn code(&self) -> SchemaErrorCode {
        self.code
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the record kind the error was raised for
    pub fn kind(&self) -> Option<RecordKind> {
        self.kind
    }

    /// Returns every violation, in rule order
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn into_violations(self) -> Vec<Violation> {
        self.violations
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REJECT] {}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for SchemaError {}

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            SchemaErrorCode::SmsSchemaValidationFailed.code(),
            "SMS_SCHEMA_VALIDATION_FAILED"
        );
        assert_eq!(SchemaErrorCode::SmsUnknownRecordKind.code(), "SMS_UNKNOWN_RECORD_KIND");
    }

    #[test]
    fn test_violation_display() {
        let violation = Violation::type_mismatch("operator", "string", "number");
        let display = violation.to_string();
        assert!(display.contains("operator"));
        assert!(display.contains("string"));
        assert!(display.contains("number"));
    }

    #[test]
    fn test_message_lists_every_violation() {
        let err = SchemaError::validation_failed(
            RecordKind::UserAccount,
            vec![
                Violation::missing_field("email"),
                Violation::empty_value("username"),
            ],
        );
        let display = err.to_string();
        assert!(display.contains("SMS_SCHEMA_VALIDATION_FAILED"));
        assert!(display.contains("2 violation(s)"));
        assert!(display.contains("email"));
        assert!(display.contains("username"));
        assert_eq!(err.kind(), Some(RecordKind::UserAccount));
    }

    #[test]
    fn test_violation_serializes_tagged() {
        let value = serde_json::to_value(Violation::missing_field("country")).unwrap();
        assert_eq!(value["violation"], "missing_field");
        assert_eq!(value["field"], "country");
    }
}
