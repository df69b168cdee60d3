//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use vitrina_config::ConfigError;
use vitrina_core::CoreError;

pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const PERMISSION: i32 = 5;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not reach the marketplace at {url}: {reason}")]
    #[diagnostic(
        code(vitrina::connection_failed),
        help(
            "Check the API URL and your network connection.\n\
             URL: {url}\n\
             Override with --api-url or VITRINA_API_URL."
        )
    )]
    ConnectionFailed { url: String, reason: String },

    // ── Authentication ───────────────────────────────────────────────

    #[error("{message}")]
    #[diagnostic(
        code(vitrina::auth_failed),
        help("Check your email and password, or run: vitrina config set-password")
    )]
    AuthFailed { message: String },

    #[error("This command requires signing in")]
    #[diagnostic(
        code(vitrina::not_signed_in),
        help(
            "Set `audience` and `email` in your profile (vitrina config init)\n\
             or export VITRINA_TOKEN."
        )
    )]
    NotSignedIn,

    #[error("No {what} configured for profile '{profile}'")]
    #[diagnostic(
        code(vitrina::no_credentials),
        help("Configure the profile with: vitrina config init")
    )]
    MissingSetting { what: String, profile: String },

    // ── Permissions ──────────────────────────────────────────────────

    #[error("{message}")]
    #[diagnostic(code(vitrina::not_permitted))]
    NotPermitted { message: String },

    // ── Resources ────────────────────────────────────────────────────

    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(vitrina::not_found),
        help("Run: vitrina {list_command} to see what is available")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── API ──────────────────────────────────────────────────────────

    #[error("API error ({code}): {message}")]
    #[diagnostic(code(vitrina::api_error))]
    ApiError { code: String, message: String },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(vitrina::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(vitrina::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: vitrina config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error(transparent)]
    #[diagnostic(code(vitrina::config))]
    Config(ConfigError),

    // ── Timeout ──────────────────────────────────────────────────────

    #[error("Request timed out after {seconds}s")]
    #[diagnostic(
        code(vitrina::timeout),
        help("Increase the timeout with --timeout.")
    )]
    Timeout { seconds: u64 },

    // ── IO ───────────────────────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NotSignedIn | Self::MissingSetting { .. } => {
                exit_code::AUTH
            }
            Self::NotFound { .. } | Self::ProfileNotFound { .. } => exit_code::NOT_FOUND,
            Self::NotPermitted { .. } => exit_code::PERMISSION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── ConfigError → CliError mapping ──────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Missing { what, profile } => CliError::MissingSetting { what, profile },
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::UnknownProfile(name) => CliError::ProfileNotFound {
                name,
                available: String::new(),
            },
            other => CliError::Config(other),
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

fn list_command(entity_type: &str) -> String {
    match entity_type.to_ascii_lowercase().as_str() {
        "shop" => "shops list".into(),
        "stream" => "streams list".into(),
        "reel" => "reels list".into(),
        "notification" => "notifications list".into(),
        "report" => "admin reports".into(),
        other => format!("{other}s list"),
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => {
                CliError::ConnectionFailed { url, reason }
            }

            CoreError::Disconnected => CliError::ConnectionFailed {
                url: "(disconnected)".into(),
                reason: "Marketplace connection was lost".into(),
            },

            CoreError::Timeout { timeout_secs } => CliError::Timeout {
                seconds: timeout_secs,
            },

            CoreError::NotSignedIn => CliError::NotSignedIn,

            err @ (CoreError::AuthenticationFailed { .. }
            | CoreError::Auth(_)
            | CoreError::EmailNotVerified { .. }) => CliError::AuthFailed {
                message: err.to_string(),
            },

            err @ (CoreError::PreviewBlocked { .. }
            | CoreError::NotPermitted { .. }
            | CoreError::PlaceholderContent { .. }
            | CoreError::ExtensionLimit { .. }) => CliError::NotPermitted {
                message: err.notice().message,
            },

            CoreError::ValidationFailed { message } => CliError::Validation {
                field: "input".into(),
                reason: message,
            },

            CoreError::NotFound {
                entity_type,
                identifier,
            } => CliError::NotFound {
                list_command: list_command(&entity_type),
                resource_type: entity_type,
                identifier,
            },

            CoreError::Api { message, code, .. } => CliError::ApiError {
                code: code.unwrap_or_else(|| "unknown".into()),
                message,
            },

            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },

            CoreError::Internal(message) => CliError::ApiError {
                code: "internal".into(),
                message,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_rejections_exit_with_permission_code() {
        let err = CliError::from(CoreError::ExtensionLimit {
            stream_id: "st1".into(),
            max: 3,
        });
        assert_eq!(err.exit_code(), exit_code::PERMISSION);
    }

    #[test]
    fn not_found_points_at_list_command() {
        let err = CliError::from(CoreError::not_found("Stream", "st9"));
        match err {
            CliError::NotFound { list_command, .. } => assert_eq!(list_command, "streams list"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn sign_in_required_is_auth_code() {
        assert_eq!(CliError::from(CoreError::NotSignedIn).exit_code(), exit_code::AUTH);
    }
}
