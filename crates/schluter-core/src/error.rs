// ── Core error types ──
//
// Consumers never see HTTP status codes or JSON parse failures directly.
// `PollFailure` is the cause carried by a failed tick; `CoreError` is the
// `Result`-style signal for hosts that prefer errors over outcome enums.

use thiserror::Error;

/// Why a tick (or a command) did not produce what was asked for.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PollFailure {
    // ── Fatal ────────────────────────────────────────────────────────
    #[error("credentials rejected: {message}")]
    InvalidCredentials { message: String },

    // ── Transient ────────────────────────────────────────────────────
    #[error("refresh timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("session rejected again after re-authentication")]
    SessionStillExpired,

    #[error("service error: {message}")]
    Service {
        message: String,
        status: Option<u16>,
    },

    #[error("connection error: {message}")]
    Transport { message: String },
}

impl PollFailure {
    /// `true` only for failures the host must answer with new credentials.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::InvalidCredentials { .. })
    }
}

impl From<schluter_api::Error> for PollFailure {
    fn from(err: schluter_api::Error) -> Self {
        match err {
            schluter_api::Error::InvalidCredentials { message } => {
                PollFailure::InvalidCredentials { message }
            }
            schluter_api::Error::SessionExpired => PollFailure::SessionStillExpired,
            schluter_api::Error::Transport(ref e) => PollFailure::Transport {
                message: e.to_string(),
            },
            schluter_api::Error::Api { status, message } => PollFailure::Service { message, status },
            other @ (schluter_api::Error::InvalidUrl(_)
            | schluter_api::Error::Tls(_)
            | schluter_api::Error::Deserialization { .. }) => PollFailure::Service {
                message: other.to_string(),
                status: None,
            },
        }
    }
}

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The account needs new credentials; automatic polling must stop.
    #[error("Authentication failed -- new credentials required ({cause})")]
    AuthFailed {
        #[source]
        cause: PollFailure,
    },

    /// This refresh failed; the next scheduled one may succeed.
    #[error("Update failed: {cause}")]
    UpdateFailed {
        #[source]
        cause: PollFailure,
    },

    #[error("Thermostat not found: {serial_number}")]
    ThermostatNotFound { serial_number: String },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    pub fn is_auth_failed(&self) -> bool {
        matches!(self, Self::AuthFailed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_invalid_credentials_is_fatal() {
        let fatal: PollFailure = schluter_api::Error::InvalidCredentials {
            message: "ErrorCode 2".into(),
        }
        .into();
        assert!(fatal.is_fatal());

        let transient: PollFailure = schluter_api::Error::Api {
            status: Some(502),
            message: "bad gateway".into(),
        }
        .into();
        assert!(!transient.is_fatal());
        assert_eq!(
            transient,
            PollFailure::Service {
                message: "bad gateway".into(),
                status: Some(502)
            }
        );

        assert!(!PollFailure::Timeout { timeout_ms: 10_000 }.is_fatal());
    }

    #[test]
    fn core_error_messages() {
        let err = CoreError::UpdateFailed {
            cause: PollFailure::Timeout { timeout_ms: 250 },
        };
        assert_eq!(err.to_string(), "Update failed: refresh timed out after 250ms");
        assert!(!err.is_auth_failed());
    }
}
