use thiserror::Error;

/// Top-level error type for the `vitrina-api` crate.
///
/// Covers every failure mode across both HTTP surfaces: the marketplace
/// REST API and the identity provider. `vitrina-core` maps these into
/// user-facing notices.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Request rejected for missing or invalid bearer token.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// An authenticated endpoint was called without a token.
    #[error("Not signed in -- this request requires an identity token")]
    MissingToken,

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Request timed out.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ── Marketplace API ─────────────────────────────────────────────
    /// Structured error from the marketplace API.
    #[error("API error (HTTP {status}): {message}")]
    Api {
        message: String,
        code: Option<String>,
        status: u16,
    },

    // ── Identity provider ───────────────────────────────────────────
    /// Error returned by the identity provider, keyed by its error code
    /// (e.g. `EMAIL_NOT_FOUND`, `INVALID_PASSWORD`, `EXPIRED_OOB_CODE`).
    #[error("Identity provider error: {code}")]
    Identity { code: String, status: u16 },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if this error indicates the identity token has
    /// expired or was never attached.
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::Authentication { .. } | Self::MissingToken)
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            Self::Api { status: 404, .. } => true,
            _ => false,
        }
    }

    /// Extract the API error code, if available.
    pub fn api_error_code(&self) -> Option<&str> {
        match self {
            Self::Api { code, .. } => code.as_deref(),
            _ => None,
        }
    }

    /// The identity provider's error code, if this is a provider error.
    pub fn identity_code(&self) -> Option<&str> {
        match self {
            Self::Identity { code, .. } => Some(code),
            _ => None,
        }
    }
}
