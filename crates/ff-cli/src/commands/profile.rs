//! Profile commands: show and update name/email.

use std::io::Write;

use anyhow::Result;

use ff_db::Database;

pub fn show<W: Write>(writer: &mut W, db: &Database) -> Result<()> {
    let profile = db.get_profile()?;
    writeln!(writer, "Name:  {}", profile.name.as_deref().unwrap_or("-"))?;
    writeln!(writer, "Email: {}", profile.email.as_deref().unwrap_or("-"))?;
    Ok(())
}

pub fn set<W: Write>(
    writer: &mut W,
    name: Option<&str>,
    email: Option<&str>,
    db: &Database,
) -> Result<()> {
    let mut profile = db.get_profile()?;
    if let Some(name) = name {
        profile.name = Some(name.to_string());
    }
    if let Some(email) = email {
        profile.email = Some(email.to_string());
    }
    db.set_profile(&profile)?;
    writeln!(writer, "Profile updated.")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_is_partial() {
        let db = Database::open_in_memory().unwrap();
        let mut output = Vec::new();
        set(&mut output, Some("Dana"), None, &db).unwrap();
        set(&mut output, None, Some("dana@example.com"), &db).unwrap();

        let mut output = Vec::new();
        show(&mut output, &db).unwrap();
        let output = String::from_utf8(output).unwrap();
        insta::assert_snapshot!(output, @r"
        Name:  Dana
        Email: dana@example.com
        ");
    }

    #[test]
    fn show_renders_placeholders_when_unset() {
        let db = Database::open_in_memory().unwrap();
        let mut output = Vec::new();
        show(&mut output, &db).unwrap();
        let output = String::from_utf8(output).unwrap();
        assert!(output.contains("Name:  -"));
        assert!(output.contains("Email: -"));
    }
}
