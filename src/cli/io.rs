//! JSON output for CLI commands
//!
//! One JSON object per line on stdout.

use std::io::{self, Write};

use serde_json::{json, Value};

use super::errors::CliResult;

pub fn write_json<W: Write>(writer: &mut W, value: &Value) -> CliResult<()> {
    serde_json::to_writer(&mut *writer, value)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

/// Writes `{"status":"ok","data":...}` to stdout
pub fn write_response(data: Value) -> CliResult<()> {
    write_json(&mut io::stdout(), &json!({"status": "ok", "data": data}))
}
