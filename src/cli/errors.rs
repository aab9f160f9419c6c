//! CLI-specific error types

use std::path::PathBuf;

use thiserror::Error;

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

/// Failures that end a CLI run with a non-zero exit
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed JSON request: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Empty request on stdin")]
    EmptyRequest,

    #[error("Data directory already initialized: {}", .0.display())]
    AlreadyInitialized(PathBuf),

    #[error("Data directory not initialized: {}. Run 'smsconf init' first.", .0.display())]
    NotInitialized(PathBuf),

    /// The memory backend starts empty on every run
    #[error("'{0}' addresses stored records; the memory backend keeps none between runs")]
    NotPersistent(&'static str),

    /// Store refused the request; the error response has already been written
    #[error("{code}: {message}")]
    RequestFailed { code: &'static str, message: String },
}

impl CliError {
    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            CliError::Config(_) => "SMS_CLI_CONFIG_ERROR",
            CliError::Io(_) | CliError::Json(_) | CliError::EmptyRequest => "SMS_CLI_IO_ERROR",
            CliError::AlreadyInitialized(_) => "SMS_CLI_ALREADY_INITIALIZED",
            CliError::NotInitialized(_) => "SMS_CLI_NOT_INITIALIZED",
            CliError::NotPersistent(_) => "SMS_CLI_NOT_PERSISTENT",
            CliError::RequestFailed { .. } => "SMS_CLI_REQUEST_FAILED",
        }
    }

    pub(crate) fn config(msg: impl Into<String>) -> Self {
        CliError::Config(msg.into())
    }
}
