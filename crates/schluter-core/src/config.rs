// ── Runtime coordinator configuration ──
//
// These types describe *how* to poll one account. They carry credential
// data and timing, but never touch disk. The binary (or any other host)
// constructs them and hands them in.

use std::time::Duration;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Default polling interval.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(60);

/// Default budget for one complete tick (authenticate + fetch).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Account credentials. Fixed for the lifetime of a coordinator; changing
/// them means building a new one.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: SecretString) -> Self {
        Self {
            username: username.into(),
            password,
        }
    }
}

/// What a tick does after a rejected session was successfully renewed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExpiredSessionPolicy {
    /// End the tick without data; the next scheduled tick uses the new
    /// session. Dependent entities keep their last-known-good values.
    #[default]
    WaitForNextTick,
    /// Re-issue the fetch once with the new session inside the same tick.
    RetryImmediately,
}

/// Configuration for one polling coordinator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoordinatorConfig {
    /// How often the host should trigger a refresh.
    pub interval: Duration,
    /// Wall-clock budget for a whole tick, re-authentication included.
    pub timeout: Duration,
    pub expired_session_policy: ExpiredSessionPolicy,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_INTERVAL,
            timeout: DEFAULT_TIMEOUT,
            expired_session_policy: ExpiredSessionPolicy::default(),
        }
    }
}

impl CoordinatorConfig {
    /// Reject timings a poll loop cannot run with.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.interval.is_zero() {
            return Err(CoreError::Config {
                message: "polling interval must be greater than zero".into(),
            });
        }
        if self.timeout.is_zero() {
            return Err(CoreError::Config {
                message: "refresh timeout must be greater than zero".into(),
            });
        }
        Ok(())
    }
}
