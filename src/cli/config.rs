//! Configuration file structure
//!
//! ```json
//! { "data_dir": "/var/lib/smsconf", "backend": "file", "list_limit": 100, "log_level": "info" }
//! ```
//!
//! Only `data_dir` is required.
//!
//! The `memory` backend lives only as long as one CLI process. It serves
//! `insert` as a dry run through the full store path; commands that address
//! stored records (`update`, `replace`, `fetch`, `remove`, `list`) refuse it.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::errors::{CliError, CliResult};
use crate::observability::Severity;
use crate::store::DEFAULT_LIST_LIMIT;

/// Backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// One checksummed JSON file per record under `data_dir`
    File,
    /// Process-local, discarded on exit
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Data directory (required)
    pub data_dir: String,

    /// Storage backend (optional, default "file")
    #[serde(default = "default_backend")]
    pub backend: BackendKind,

    /// Default list size (optional, default 100)
    #[serde(default = "default_list_limit")]
    pub list_limit: usize,

    /// Minimum log severity (optional, default "info")
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_backend() -> BackendKind {
    BackendKind::File
}
fn default_list_limit() -> usize {
    DEFAULT_LIST_LIMIT
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config(format!("Failed to read config: {}", e)))?;

        Self::parse(&content)
    }

    /// Parse and validate configuration JSON
    pub fn parse(content: &str) -> CliResult<Self> {
        let config: Config = serde_json::from_str(content)
            .map_err(|e| CliError::config(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> CliResult<()> {
        if self.data_dir.trim().is_empty() {
            return Err(CliError::config("data_dir must not be empty"));
        }

        if self.list_limit == 0 {
            return Err(CliError::config("list_limit must be > 0"));
        }

        self.severity()?;

        Ok(())
    }

    /// Get data directory as Path
    pub fn data_path(&self) -> &Path {
        Path::new(&self.data_dir)
    }

    /// Parsed `log_level`
    pub fn severity(&self) -> CliResult<Severity> {
        self.log_level
            .parse()
            .map_err(|e: String| CliError::config(format!("Invalid log_level: {}", e)))
    }
}
