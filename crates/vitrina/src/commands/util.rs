//! Shared helpers for command handlers.

use chrono::{DateTime, Local, Utc};
use secrecy::SecretString;

use vitrina_core::Notice;

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

/// Print a notice honoring `--color` and `--quiet`.
pub fn notify(global: &GlobalOpts, notice: &Notice) {
    output::print_notice(notice, &global.color, global.quiet);
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(prompt_err)
}

/// Map a dialoguer / interactive I/O failure into CliError.
pub fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

/// Read a password without echo.
pub fn prompt_secret(prompt: &str) -> Result<SecretString, CliError> {
    let value = rpassword::prompt_password(prompt).map_err(prompt_err)?;
    Ok(SecretString::from(value))
}

/// Local wall-clock rendering for tables.
pub fn fmt_local(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%d/%m %H:%M").to_string()
}

/// Parse an RFC 3339 timestamp flag.
pub fn parse_time(field: &str, raw: &str) -> Result<DateTime<Utc>, CliError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| CliError::Validation {
            field: field.into(),
            reason: format!("expected RFC 3339 time: {e}"),
        })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parses_offset_times_to_utc() {
        let t = parse_time("at", "2026-10-20T18:00:00-03:00").unwrap();
        assert_eq!(t.to_rfc3339(), "2026-10-20T21:00:00+00:00");
        assert!(parse_time("at", "mañana").is_err());
    }
}
