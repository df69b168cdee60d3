// ── Core error types ──
//
// User-facing errors from vitrina-core. Consumers never see HTTP status
// codes or provider wire codes directly: `From<vitrina_api::Error>`
// translates them, and `CoreError::notice` turns any error into a notice.

use thiserror::Error;

use crate::auth::AuthErrorKind;
use crate::notice::Notice;

#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach the marketplace API at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("Marketplace is not connected")]
    Disconnected,

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("This action requires signing in")]
    NotSignedIn,

    /// Identity provider rejection, already classified.
    #[error("{}", .0.message())]
    Auth(AuthErrorKind),

    #[error("{message}")]
    EmailNotVerified { message: String },

    // ── Client-side guards ───────────────────────────────────────────
    #[error("{message}")]
    PreviewBlocked { message: String },

    #[error("{message}")]
    NotPermitted { message: String },

    #[error("Placeholder content cannot be modified: {id}")]
    PlaceholderContent { id: String },

    #[error("Stream {stream_id} already used its {max} extensions")]
    ExtensionLimit { stream_id: String, max: u32 },

    #[error("{message}")]
    ValidationFailed { message: String },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: String,
        identifier: String,
    },

    #[error("API error: {message}")]
    Api {
        message: String,
        code: Option<String>,
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub fn not_found(entity_type: &str, identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: entity_type.into(),
            identifier: identifier.into(),
        }
    }

    /// Rejected before any network call by a client-side rule.
    pub fn is_guard(&self) -> bool {
        matches!(
            self,
            Self::PreviewBlocked { .. }
                | Self::NotPermitted { .. }
                | Self::PlaceholderContent { .. }
                | Self::ExtensionLimit { .. }
                | Self::ValidationFailed { .. }
                | Self::NotSignedIn
        )
    }

    /// Degrade into the notice shown to the user.
    pub fn notice(&self) -> Notice {
        match self {
            Self::PlaceholderContent { .. } => {
                Notice::info("Este contenido es de muestra y no admite interacciones.")
            }
            Self::NotSignedIn => Notice::warning("Iniciá sesión para continuar."),
            Self::EmailNotVerified { .. } => Notice::warning(self.to_string()),
            e if e.is_guard() => Notice::warning(e.to_string()),
            Self::Auth(kind) => Notice::error(kind.message()),
            Self::ConnectionFailed { .. } | Self::Timeout { .. } | Self::Disconnected => {
                Notice::error("No pudimos conectar con el servidor. Revisá tu conexión.")
            }
            other => Notice::error(other.to_string()),
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<vitrina_api::Error> for CoreError {
    fn from(err: vitrina_api::Error) -> Self {
        match err {
            vitrina_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            vitrina_api::Error::MissingToken => CoreError::NotSignedIn,
            vitrina_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout { timeout_secs: 0 }
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        code: None,
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            vitrina_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            vitrina_api::Error::Timeout { timeout_secs } => CoreError::Timeout { timeout_secs },
            vitrina_api::Error::Api {
                status: 404,
                message,
                ..
            } => CoreError::NotFound {
                entity_type: "Resource".into(),
                identifier: message,
            },
            vitrina_api::Error::Api {
                message,
                code,
                status,
            } => CoreError::Api {
                message,
                code,
                status: Some(status),
            },
            vitrina_api::Error::Identity { code, .. } => {
                CoreError::Auth(AuthErrorKind::from_code(&code))
            }
            vitrina_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}
