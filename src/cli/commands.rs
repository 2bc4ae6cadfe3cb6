//! CLI command implementations
//!
//! `serve` follows a fixed boot order: load config, open the store (replay
//! and index rebuild), bind the listener, serve. On Ctrl-C or SIGTERM it
//! drains requests, then closes the store so the next open sees a clean
//! shutdown.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::http_server::{shutdown_signal, HttpServer, HttpServerConfig};
use crate::models::catalog;
use crate::observability::{log_event, log_event_with_fields, Event};
use crate::store::{DocumentStore, StoreError};

use super::args::Command;
use super::errors::{CliError, CliResult};
use super::io::write_response;

/// Configuration file structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Data directory (required)
    pub data_dir: String,

    #[serde(flatten)]
    pub server: HttpServerConfig,
}

impl Config {
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> CliResult<Self> {
        let config: Config = serde_json::from_str(content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> CliResult<()> {
        if self.data_dir.trim().is_empty() {
            return Err(CliError::config_error("data_dir must not be empty"));
        }

        if self.server.list_limit == 0 {
            return Err(CliError::config_error("list_limit must be > 0"));
        }

        Ok(())
    }

    pub fn data_path(&self) -> &Path {
        Path::new(&self.data_dir)
    }
}

/// Main CLI entry point
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Init { config } => init(&config),
        Command::Serve { config, port } => serve(&config, port),
    }
}

fn is_initialized(data_dir: &Path) -> bool {
    data_dir.join("data").is_dir()
}

/// Creates the data directory layout. Never starts the server.
pub fn init(config_path: &Path) -> CliResult<()> {
    let config = Config::load(config_path)?;
    let data_dir = config.data_path();

    if is_initialized(data_dir) {
        return Err(CliError::already_initialized());
    }

    let dir = data_dir.join("data");
    fs::create_dir_all(&dir).map_err(|e| {
        CliError::config_error(format!("Failed to create directory {:?}: {}", dir, e))
    })?;

    write_response(json!({"initialized": true, "data_dir": config.data_dir}))
}

/// Opens the store at `data_dir`, logging corruption as FATAL.
fn open_store(data_dir: &Path) -> CliResult<Arc<DocumentStore>> {
    match DocumentStore::open(data_dir, &catalog()) {
        Ok(store) => Ok(Arc::new(store)),
        Err(e) => {
            let fatal = match &e {
                StoreError::Storage(s) => s.is_fatal(),
                StoreError::Index(i) => i.code().is_fatal(),
                _ => false,
            };
            if fatal {
                log_event_with_fields(Event::StoreCorruption, &[("error", &e.to_string())]);
            }
            Err(e.into())
        }
    }
}

/// Serves the HTTP API until Ctrl-C or SIGTERM.
pub fn serve(config_path: &Path, port: Option<u16>) -> CliResult<()> {
    log_event(Event::BootStart);

    let mut config = Config::load(config_path)?;
    if let Some(port) = port {
        config.server.port = port;
    }
    log_event_with_fields(
        Event::ConfigLoaded,
        &[
            ("data_dir", &config.data_dir),
            ("port", &config.server.port.to_string()),
        ],
    );

    let data_dir = config.data_path();
    if !is_initialized(data_dir) {
        return Err(CliError::not_initialized());
    }

    let store = open_store(data_dir)?;
    let server = HttpServer::new(config.server.clone(), Arc::clone(&store));

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to create tokio runtime: {}", e)))?;

    let served = rt.block_on(async {
        server
            .start(shutdown_signal())
            .await
            .map_err(|e| CliError::boot_failed(format!("HTTP server failed: {}", e)))
    });

    // Close the store even when the listener failed
    store
        .shutdown()
        .map_err(|e| CliError::io_error(format!("Store shutdown failed: {}", e)))?;
    served?;

    log_event(Event::ShutdownComplete);
    Ok(())
}
