//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `SetupError` into user-facing errors with help text
//! and a distinct process exit code.

use miette::Diagnostic;
use thiserror::Error;

use schluter_core::{CoreError, PollFailure, SetupError};

pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {reason}")]
    #[diagnostic(
        code(schluter::auth_failed),
        help(
            "Check the email and password used in the Schluter app.\n\
             Pass them with --username/--password or SCHLUTER_USERNAME/SCHLUTER_PASSWORD."
        )
    )]
    AuthFailed { reason: String },

    #[error("No credentials configured")]
    #[diagnostic(
        code(schluter::no_credentials),
        help(
            "Set username and password in {path},\n\
             or export SCHLUTER_USERNAME and SCHLUTER_PASSWORD."
        )
    )]
    NoCredentials { path: String },

    // ── Service ──────────────────────────────────────────────────────
    #[error("Could not reach the Schluter service: {reason}")]
    #[diagnostic(
        code(schluter::connection_failed),
        help("Check network access, or point --base-url at a reachable endpoint.")
    )]
    ConnectionFailed { reason: String },

    #[error("Refresh failed: {reason}")]
    #[diagnostic(
        code(schluter::update_failed),
        help("The service may be temporarily unavailable; try again in a minute.")
    )]
    UpdateFailed { reason: String },

    #[error("Request timed out after {millis}ms")]
    #[diagnostic(
        code(schluter::timeout),
        help("Increase the budget with --timeout or check service responsiveness.")
    )]
    Timeout { millis: u64 },

    #[error("Thermostat '{serial_number}' not found")]
    #[diagnostic(
        code(schluter::not_found),
        help("Run: schluter show to list serial numbers")
    )]
    NotFound { serial_number: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(schluter::validation))]
    Validation { field: String, reason: String },

    #[error(transparent)]
    #[diagnostic(code(schluter::config))]
    Config(Box<figment::Error>),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Could not render JSON: {0}")]
    #[diagnostic(code(schluter::json))]
    Json(#[from] serde_json::Error),
}

impl From<figment::Error> for CliError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::ConnectionFailed { .. } | Self::UpdateFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } | Self::Config(_) => exit_code::USAGE,
            Self::Io(_) | Self::Json(_) => exit_code::GENERAL,
        }
    }
}

// ── Core → CliError mapping ──────────────────────────────────────────

impl From<PollFailure> for CliError {
    fn from(cause: PollFailure) -> Self {
        match cause {
            PollFailure::InvalidCredentials { message } => CliError::AuthFailed { reason: message },
            PollFailure::Timeout { timeout_ms } => CliError::Timeout { millis: timeout_ms },
            PollFailure::Transport { message } => CliError::ConnectionFailed { reason: message },
            other @ (PollFailure::SessionStillExpired | PollFailure::Service { .. }) => {
                CliError::UpdateFailed {
                    reason: other.to_string(),
                }
            }
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::AuthFailed { cause } | CoreError::UpdateFailed { cause } => cause.into(),
            CoreError::ThermostatNotFound { serial_number } => CliError::NotFound { serial_number },
            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },
        }
    }
}

impl From<SetupError> for CliError {
    fn from(err: SetupError) -> Self {
        match err {
            SetupError::AuthFailed(cause) | SetupError::NotReady(cause) => cause.into(),
            SetupError::NoData(reason) => CliError::UpdateFailed {
                reason: reason.into(),
            },
        }
    }
}
