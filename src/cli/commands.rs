//! CLI command implementations
//!
//! Each command is one request: read at most one JSON value from stdin,
//! write exactly one JSON response to stdout. Store refusals are written as
//! error responses and also returned as `CliError` so the process exits
//! non-zero.

use std::fs;
use std::path::Path;

use serde_json::{json, Value};

use crate::model::{RecordId, StoredRecord};
use crate::observability::{log_event, Event, Logger};
use crate::schema::{self, RecordKind};
use crate::store::{Backend, FileBackend, MemoryBackend, RecordStore, StoreResult};

use super::args::Command;
use super::config::{BackendKind, Config};
use super::errors::{CliError, CliResult};
use super::io::{read_request, write_error, write_response};

/// Marker file written by `init`
const INIT_MARKER: &str = ".smsconf";
/// Directory under `data_dir` holding one subdirectory per collection
const COLLECTIONS_DIR: &str = "collections";

type DynStore = RecordStore<Box<dyn Backend>>;

/// Parse arguments and run the selected command
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Init { config } => init(&config),
        Command::Check { kind } => check(kind, read_request()?),
        Command::Schema { kind } => write_response(kind.schema().to_json_schema()),
        Command::Insert { config, kind } => {
            let store = open(&config, "insert")?;
            let record = read_request()?;
            respond(store.insert(kind, &record), |id| json!({ "id": id }))
        }
        Command::Update { config, kind, id } => {
            let store = open(&config, "update")?;
            let patch = read_request()?;
            let id = RecordId::new(id);
            respond(store.update(kind, &id, &patch), |()| json!({ "id": id }))
        }
        Command::Replace { config, kind, id } => {
            let store = open(&config, "replace")?;
            let record = read_request()?;
            let id = RecordId::new(id);
            respond(store.replace(kind, &id, &record), |()| json!({ "id": id }))
        }
        Command::Fetch { config, kind, id } => {
            let store = open(&config, "fetch")?;
            let id = RecordId::new(id);
            let result = store
                .fetch(kind, &id)
                .map(|document| StoredRecord { id, document });
            respond(result, |record| json!(record))
        }
        Command::Remove { config, kind, id } => {
            let store = open(&config, "remove")?;
            let id = RecordId::new(id);
            respond(store.remove(kind, &id), |()| json!({ "removed": id }))
        }
        Command::List {
            config,
            kind,
            limit,
        } => {
            let store = open(&config, "list")?;
            respond(store.list(kind, limit), |records| json!(records))
        }
    }
}

/// Initialize a new data directory with one directory per collection
pub fn init(config_path: &Path) -> CliResult<()> {
    let config = load_config(config_path)?;
    let data_dir = config.data_path();

    if is_initialized(data_dir) {
        return Err(CliError::AlreadyInitialized(data_dir.to_path_buf()));
    }

    let backend = FileBackend::new(data_dir.join(COLLECTIONS_DIR));
    for kind in RecordKind::ALL {
        backend.create_collection(kind.collection()).map_err(|e| {
            CliError::config(format!(
                "Failed to create collection {}: {}",
                kind.collection(),
                e
            ))
        })?;
    }
    fs::write(
        data_dir.join(INIT_MARKER),
        json!({ "version": env!("CARGO_PKG_VERSION") }).to_string(),
    )?;

    log_event(
        Event::DataDirInitialized,
        &[("data_dir", config.data_dir.as_str())],
    );
    write_response(json!({ "initialized": true }))
}

/// Validate a record without opening a store
pub fn check(kind: RecordKind, record: Value) -> CliResult<()> {
    match schema::check(kind, &record) {
        Ok(_) => write_response(json!({ "valid": true, "kind": kind })),
        Err(err) => {
            write_error(err.code().code(), err.message(), err.violations())?;
            Err(CliError::RequestFailed {
                code: err.code().code(),
                message: err.message().to_string(),
            })
        }
    }
}

fn load_config(path: &Path) -> CliResult<Config> {
    let config = Config::load(path)?;
    Logger::set_min_severity(config.severity()?);
    log_event(
        Event::ConfigLoaded,
        &[("data_dir", config.data_dir.as_str())],
    );
    Ok(config)
}

/// Commands that can run against a store that starts empty
const DRY_RUN_COMMANDS: &[&str] = &["insert"];

fn open(config_path: &Path, command: &'static str) -> CliResult<DynStore> {
    let config = load_config(config_path)?;

    let backend: Box<dyn Backend> = match config.backend {
        BackendKind::File => {
            if !is_initialized(config.data_path()) {
                return Err(CliError::NotInitialized(config.data_path().to_path_buf()));
            }
            Box::new(FileBackend::new(config.data_path().join(COLLECTIONS_DIR)))
        }
        BackendKind::Memory if DRY_RUN_COMMANDS.contains(&command) => {
            Box::new(MemoryBackend::new())
        }
        BackendKind::Memory => return Err(CliError::NotPersistent(command)),
    };

    let backend_name = match config.backend {
        BackendKind::File => "file",
        BackendKind::Memory => "memory",
    };
    log_event(Event::StoreOpened, &[("backend", backend_name)]);

    Ok(RecordStore::new(backend).with_list_limit(config.list_limit))
}

fn is_initialized(data_dir: &Path) -> bool {
    data_dir.join(INIT_MARKER).exists()
}

/// Write the outcome of a store call as the command response.
fn respond<T>(result: StoreResult<T>, to_data: impl FnOnce(T) -> Value) -> CliResult<()> {
    match result {
        Ok(value) => write_response(to_data(value)),
        Err(err) => {
            let violations = err
                .as_validation()
                .map(|e| e.violations())
                .unwrap_or_default();
            write_error(err.code(), &err.to_string(), violations)?;
            Err(CliError::RequestFailed {
                code: err.code(),
                message: err.to_string(),
            })
        }
    }
}
