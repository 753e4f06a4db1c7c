//! CLI-owned configuration: TOML file, `SCHLUTER_*` environment, and
//! command-line overrides, resolved into the runtime types core expects.
//!
//! Core never sees these types -- it receives a `CoordinatorConfig`,
//! `Credentials`, and a ready `SchluterClient`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use url::Url;

use schluter_core::{
    CoordinatorConfig, Credentials, DEFAULT_BASE_URL, ExpiredSessionPolicy, SchluterClient,
    TlsMode, TransportConfig,
};

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── TOML config struct ───────────────────────────────────────────────

/// On-disk configuration. Every field is optional in the file.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Account email.
    pub username: Option<String>,

    /// Account password (plaintext -- prefer SCHLUTER_PASSWORD).
    pub password: Option<String>,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Polling interval in humantime form ("1m", "90s").
    #[serde(default = "default_interval")]
    pub interval: String,

    /// Budget for one refresh, re-authentication included.
    #[serde(default = "default_timeout")]
    pub timeout: String,

    #[serde(default)]
    pub expired_session_policy: ExpiredSessionPolicy,

    /// Path to a custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    #[serde(default)]
    pub insecure: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            username: None,
            password: None,
            base_url: default_base_url(),
            interval: default_interval(),
            timeout: default_timeout(),
            expired_session_policy: ExpiredSessionPolicy::default(),
            ca_cert: None,
            insecure: false,
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.into()
}
fn default_interval() -> String {
    "1m".into()
}
fn default_timeout() -> String {
    "10s".into()
}

// ── Config file path ─────────────────────────────────────────────────

/// Resolve the config file path: `--config` first, then platform dirs.
pub fn config_path(global: &GlobalOpts) -> PathBuf {
    if let Some(path) = &global.config {
        return path.clone();
    }
    ProjectDirs::from("com", "schluter", "schluter")
        .map(|dirs| dirs.config_dir().join("config.toml"))
        .unwrap_or_else(|| PathBuf::from("schluter.toml"))
}

// ── Config loading ───────────────────────────────────────────────────

/// Load defaults, then the TOML file (if present), then `SCHLUTER_*`.
pub fn load_config(path: &Path) -> Result<Config, CliError> {
    let config: Config = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("SCHLUTER_").only(&[
            "username",
            "password",
            "base_url",
            "interval",
            "timeout",
            "expired_session_policy",
            "ca_cert",
            "insecure",
        ]))
        .extract()?;
    Ok(config)
}

// ── Resolution ───────────────────────────────────────────────────────

/// Everything needed to build a coordinator.
#[derive(Debug)]
pub struct Settings {
    pub base_url: Url,
    pub credentials: Credentials,
    pub coordinator: CoordinatorConfig,
    pub transport: TransportConfig,
}

impl Settings {
    pub fn client(&self) -> Result<SchluterClient, CliError> {
        SchluterClient::new(self.base_url.clone(), &self.transport).map_err(|e| {
            CliError::Validation {
                field: "ca_cert".into(),
                reason: e.to_string(),
            }
        })
    }
}

/// Merge the loaded file config with command-line flags (flags win).
///
/// This is the single boundary where CLI config types cross into core types.
pub fn resolve(config: Config, global: &GlobalOpts, path: &Path) -> Result<Settings, CliError> {
    // 1. Base URL
    let url_str = global.base_url.as_deref().unwrap_or(&config.base_url);
    let base_url: Url = url_str.parse().map_err(|_| CliError::Validation {
        field: "base_url".into(),
        reason: format!("invalid URL: {url_str}"),
    })?;

    // 2. Credentials
    let no_credentials = || CliError::NoCredentials {
        path: path.display().to_string(),
    };
    let username = global
        .username
        .clone()
        .or(config.username)
        .filter(|u| !u.is_empty())
        .ok_or_else(no_credentials)?;
    let password = global
        .password
        .clone()
        .or(config.password)
        .ok_or_else(no_credentials)?;
    let credentials = Credentials::new(username, SecretString::from(password));

    // 3. Timing
    let interval = match global.interval {
        Some(d) => d,
        None => parse_duration("interval", &config.interval)?,
    };
    let timeout = match global.timeout {
        Some(d) => d,
        None => parse_duration("timeout", &config.timeout)?,
    };
    let expired_session_policy = global
        .expired_session
        .map_or(config.expired_session_policy, Into::into);

    let coordinator = CoordinatorConfig {
        interval,
        timeout,
        expired_session_policy,
    };
    coordinator.validate()?;

    // 4. TLS
    let tls = if global.insecure || config.insecure {
        TlsMode::DangerAcceptInvalid
    } else if let Some(ca_path) = config.ca_cert {
        TlsMode::CustomCa(ca_path)
    } else {
        TlsMode::System
    };

    Ok(Settings {
        base_url,
        credentials,
        coordinator,
        transport: TransportConfig {
            tls,
            ..TransportConfig::default()
        },
    })
}

fn parse_duration(field: &str, raw: &str) -> Result<Duration, CliError> {
    humantime::parse_duration(raw).map_err(|e| CliError::Validation {
        field: field.into(),
        reason: format!("'{raw}': {e}"),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::io::Write;

    use clap::Parser;
    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;

    use super::*;
    use crate::cli::Cli;

    fn global(args: &[&str]) -> GlobalOpts {
        let mut argv = vec!["schluter"];
        argv.extend_from_slice(args);
        argv.push("show");
        Cli::try_parse_from(argv).unwrap().global
    }

    fn write_config(body: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(body.as_bytes()).unwrap();
        file
    }

    #[test]
    fn missing_file_yields_defaults() {
        let config = load_config(Path::new("/nonexistent/schluter.toml")).unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.interval, "1m");
        assert_eq!(config.timeout, "10s");
        assert_eq!(config.expired_session_policy, ExpiredSessionPolicy::WaitForNextTick);
    }

    #[test]
    fn file_values_resolve_into_core_config() {
        let file = write_config(
            r#"
            username = "me@example.com"
            password = "hunter2"
            interval = "5m"
            timeout = "20s"
            expired_session_policy = "retry-immediately"
            "#,
        );
        let config = load_config(file.path()).unwrap();
        let settings = resolve(config, &global(&[]), file.path()).unwrap();

        assert_eq!(settings.credentials.username, "me@example.com");
        assert_eq!(settings.credentials.password.expose_secret(), "hunter2");
        assert_eq!(settings.coordinator.interval, Duration::from_secs(300));
        assert_eq!(settings.coordinator.timeout, Duration::from_secs(20));
        assert_eq!(
            settings.coordinator.expired_session_policy,
            ExpiredSessionPolicy::RetryImmediately
        );
        assert_eq!(settings.transport.tls, TlsMode::System);
    }

    #[test]
    fn flags_override_file() {
        let file = write_config(
            r#"
            username = "file@example.com"
            password = "from-file"
            interval = "5m"
            "#,
        );
        let config = load_config(file.path()).unwrap();
        let opts = global(&[
            "--username",
            "flag@example.com",
            "--interval",
            "30s",
            "--expired-session",
            "retry-immediately",
            "--insecure",
        ]);
        let settings = resolve(config, &opts, file.path()).unwrap();

        assert_eq!(settings.credentials.username, "flag@example.com");
        assert_eq!(settings.credentials.password.expose_secret(), "from-file");
        assert_eq!(settings.coordinator.interval, Duration::from_secs(30));
        assert_eq!(
            settings.coordinator.expired_session_policy,
            ExpiredSessionPolicy::RetryImmediately
        );
        assert_eq!(settings.transport.tls, TlsMode::DangerAcceptInvalid);
    }

    #[test]
    fn missing_password_is_reported() {
        let file = write_config(r#"username = "me@example.com""#);
        let config = load_config(file.path()).unwrap();
        let err = resolve(config, &global(&[]), file.path()).unwrap_err();
        assert!(matches!(err, CliError::NoCredentials { .. }));
    }

    #[test]
    fn bad_duration_is_a_validation_error() {
        let file = write_config(
            r#"
            username = "me@example.com"
            password = "hunter2"
            interval = "often"
            "#,
        );
        let config = load_config(file.path()).unwrap();
        let err = resolve(config, &global(&[]), file.path()).unwrap_err();
        assert!(matches!(err, CliError::Validation { ref field, .. } if field == "interval"));
    }

    #[test]
    fn zero_interval_is_rejected() {
        let file = write_config(
            r#"
            username = "me@example.com"
            password = "hunter2"
            interval = "0s"
            "#,
        );
        let config = load_config(file.path()).unwrap();
        let err = resolve(config, &global(&[]), file.path()).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::exit_code::USAGE);
    }
}
