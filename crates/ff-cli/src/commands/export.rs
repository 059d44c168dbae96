//! Export command: dump all data as a single JSON document.

use std::io::Write;

use anyhow::{Context, Result};

use ff_db::Database;

/// Writes the full data export as pretty-printed JSON.
pub fn run<W: Write>(writer: &mut W, db: &Database) -> Result<()> {
    let export = db.export_data()?;
    serde_json::to_writer_pretty(&mut *writer, &export).context("failed to serialize export")?;
    writeln!(writer)?;
    Ok(())
}
