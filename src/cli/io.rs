//! JSON I/O handling for CLI
//!
//! - Input: single JSON value via stdin
//! - Output: single JSON object via stdout
//! - UTF-8 only

use std::io::{self, Read, Write};

use serde_json::{json, Value};

use super::errors::{CliError, CliResult};
use crate::schema::Violation;

/// Read a JSON value from stdin. The value may span several lines.
pub fn read_request() -> CliResult<Value> {
    let mut input = String::new();
    io::stdin().lock().read_to_string(&mut input)?;
    parse_request(&input)
}

fn parse_request(input: &str) -> CliResult<Value> {
    if input.trim().is_empty() {
        return Err(CliError::EmptyRequest);
    }
    Ok(serde_json::from_str(input)?)
}

/// Write a success response to stdout
pub fn write_response(data: Value) -> CliResult<()> {
    emit(&json!({
        "status": "ok",
        "data": data
    }))
}

/// Write an error response to stdout. Violations are listed when present.
pub fn write_error(code: &str, message: &str, violations: &[Violation]) -> CliResult<()> {
    let mut response = json!({
        "status": "error",
        "code": code,
        "message": message
    });
    if !violations.is_empty() {
        response["violations"] = serde_json::to_value(violations)?;
    }
    emit(&response)
}

fn emit(response: &Value) -> CliResult<()> {
    let mut stdout = io::stdout();
    serde_json::to_writer(&mut stdout, response)?;
    writeln!(stdout)?;
    stdout.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_multiline_request() {
        let value = parse_request("{\n  \"country\": \"US\"\n}\n").unwrap();
        assert_eq!(value["country"], "US");
    }

    #[test]
    fn test_empty_request_rejected() {
        let err = parse_request("  \n").unwrap_err();
        assert!(matches!(err, CliError::EmptyRequest));
    }

    #[test]
    fn test_malformed_request_rejected() {
        assert!(parse_request("{\"country\":").is_err());
    }
}
