//! Wipe command: delete all stored data.

use std::io::Write;

use anyhow::{Result, bail};

use ff_db::Database;

pub fn run<W: Write>(writer: &mut W, yes: bool, db: &Database) -> Result<()> {
    if !yes {
        bail!("refusing to delete data without --yes");
    }
    db.wipe()?;
    writeln!(writer, "All data deleted.")?;
    Ok(())
}
