//! CLI module
//!
//! - init: create the data directory layout
//! - serve: open the store and serve the HTTP API until signalled

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{init, run, run_command, serve, Config};
pub use errors::{CliError, CliErrorCode, CliResult};
