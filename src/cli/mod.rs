//! CLI module for smsconf
//!
//! Provides command-line interface for:
//! - init: Create the data directory
//! - check / schema: Validate a record, print a kind's validator
//! - insert / update / replace / fetch / remove / list: Record store operations

mod args;
mod commands;
mod config;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{check, init, run, run_command};
pub use config::{BackendKind, Config};
pub use errors::{CliError, CliResult};
pub use io::{read_request, write_error, write_response};
