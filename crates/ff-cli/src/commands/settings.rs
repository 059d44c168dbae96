//! Settings commands: show and set free-form keys.

use std::io::Write;

use anyhow::Result;
use serde_json::Value;

use ff_db::Database;

pub fn show<W: Write>(writer: &mut W, db: &Database) -> Result<()> {
    let profile = db.get_profile()?;
    serde_json::to_writer_pretty(&mut *writer, &profile.settings)?;
    writeln!(writer)?;
    Ok(())
}

pub fn set<W: Write>(writer: &mut W, key: &str, value: &str, db: &Database) -> Result<()> {
    // Accept JSON values ("25", "true", '{"a":1}'); fall back to a string.
    let value: Value =
        serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    db.set_setting(key, value)?;
    writeln!(writer, "Set {key}.")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_parses_json_values() {
        let db = Database::open_in_memory().unwrap();
        let mut output = Vec::new();
        set(&mut output, "pomodoro_mins", "25", &db).unwrap();
        set(&mut output, "theme", "dark", &db).unwrap();

        let settings = db.get_profile().unwrap().settings;
        assert_eq!(settings["pomodoro_mins"], 25);
        assert_eq!(settings["theme"], "dark");
    }

    #[test]
    fn show_prints_settings_json() {
        let db = Database::open_in_memory().unwrap();
        let mut output = Vec::new();
        set(&mut output, "theme", "dark", &db).unwrap();

        let mut output = Vec::new();
        show(&mut output, &db).unwrap();
        let parsed: Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(parsed["theme"], "dark");
    }
}
