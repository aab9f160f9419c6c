//! CLI argument definitions using clap
//!
//! Commands:
//! - smsconf init --config <path>
//! - smsconf check --kind <kind>
//! - smsconf schema --kind <kind>
//! - smsconf insert|update|replace|fetch|remove|list --config <path> --kind <kind> ...

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::schema::RecordKind;

/// smsconf - schema-validated store for SMS routing configuration
#[derive(Parser, Debug)]
#[command(name = "smsconf")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Initialize a new data directory
    Init {
        /// Path to configuration file
        #[arg(long, default_value = "./smsconf.json")]
        config: PathBuf,
    },

    /// Validate a record read from stdin without storing it
    Check {
        /// Record kind (country-operator or user-account)
        #[arg(long)]
        kind: RecordKind,
    },

    /// Print the collection validator for a record kind
    Schema {
        /// Record kind (country-operator or user-account)
        #[arg(long)]
        kind: RecordKind,
    },

    /// Insert a record read from stdin
    Insert {
        #[arg(long, default_value = "./smsconf.json")]
        config: PathBuf,
        #[arg(long)]
        kind: RecordKind,
    },

    /// Merge a partial record read from stdin onto a stored record
    Update {
        #[arg(long, default_value = "./smsconf.json")]
        config: PathBuf,
        #[arg(long)]
        kind: RecordKind,
        /// Record id
        #[arg(long)]
        id: String,
    },

    /// Replace a stored record with a full record read from stdin
    Replace {
        #[arg(long, default_value = "./smsconf.json")]
        config: PathBuf,
        #[arg(long)]
        kind: RecordKind,
        #[arg(long)]
        id: String,
    },

    /// Fetch a stored record
    Fetch {
        #[arg(long, default_value = "./smsconf.json")]
        config: PathBuf,
        #[arg(long)]
        kind: RecordKind,
        #[arg(long)]
        id: String,
    },

    /// Remove a stored record
    Remove {
        #[arg(long, default_value = "./smsconf.json")]
        config: PathBuf,
        #[arg(long)]
        kind: RecordKind,
        #[arg(long)]
        id: String,
    },

    /// List stored records of a kind
    List {
        #[arg(long, default_value = "./smsconf.json")]
        config: PathBuf,
        #[arg(long)]
        kind: RecordKind,
        /// Maximum records returned (defaults to the configured list_limit)
        #[arg(long)]
        limit: Option<usize>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_insert() {
        let cli = Cli::try_parse_from(["smsconf", "insert", "--kind", "country-operator"]).unwrap();
        match cli.command {
            Command::Insert { config, kind } => {
                assert_eq!(config, PathBuf::from("./smsconf.json"));
                assert_eq!(kind, RecordKind::CountryOperator);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_list_with_limit() {
        let cli = Cli::try_parse_from([
            "smsconf",
            "list",
            "--config",
            "/etc/smsconf.json",
            "--kind",
            "users",
            "--limit",
            "5",
        ])
        .unwrap();
        match cli.command {
            Command::List { config, kind, limit } => {
                assert_eq!(config, PathBuf::from("/etc/smsconf.json"));
                assert_eq!(kind, RecordKind::UserAccount);
                assert_eq!(limit, Some(5));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_kind_rejected() {
        assert!(Cli::try_parse_from(["smsconf", "check", "--kind", "sms-metrics"]).is_err());
    }
}
