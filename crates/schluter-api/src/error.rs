use thiserror::Error;

/// Top-level error type for the `schluter-api` crate.
///
/// Covers every failure mode of the vendor API: credential exchange,
/// session handling, transport, and payload decoding.
/// `schluter-core` classifies these into poll outcomes.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// The service rejected the username/password pair.
    #[error("Invalid username or password: {message}")]
    InvalidCredentials { message: String },

    /// The session id was rejected (expired or revoked server-side).
    #[error("Session expired -- re-authentication required")]
    SessionExpired,

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Service ─────────────────────────────────────────────────────
    /// The service answered, but not with something we can use.
    #[error("Schluter API error{}: {message}", status.map(|s| format!(" (HTTP {s})")).unwrap_or_default())]
    Api {
        status: Option<u16>,
        message: String,
    },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if the credentials themselves were rejected.
    /// Retrying with the same credentials will not help.
    pub fn is_invalid_credentials(&self) -> bool {
        matches!(self, Self::InvalidCredentials { .. })
    }

    /// Returns `true` if the session token was rejected and a fresh
    /// credential exchange might resolve it.
    pub fn is_session_expired(&self) -> bool {
        matches!(self, Self::SessionExpired)
    }

    /// Returns `true` if this is a transient error worth retrying later.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(_) | Self::Api { .. } | Self::Deserialization { .. } => true,
            Self::InvalidCredentials { .. }
            | Self::SessionExpired
            | Self::InvalidUrl(_)
            | Self::Tls(_) => false,
        }
    }

    /// Returns `true` if the underlying HTTP request timed out.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport(e) if e.is_timeout())
    }

    /// HTTP status associated with this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => *status,
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
