//! Clap derive structures for the `schluter` CLI.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};

use schluter_core::ExpiredSessionPolicy;

// ── Top-Level CLI ────────────────────────────────────────────────────

/// schluter -- poll DITRA-HEAT-E-WiFi floor thermostats
#[derive(Debug, Parser)]
#[command(
    name = "schluter",
    version,
    about = "Poll Schluter DITRA-HEAT floor-heating thermostats",
    long_about = "Signs in to the Schluter cloud service, keeps the session alive, \
        and reads or adjusts DITRA-HEAT-E-WiFi thermostats.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Path to the config file (defaults to the platform config dir)
    #[arg(long, env = "SCHLUTER_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Account email address
    #[arg(long, short = 'u', env = "SCHLUTER_USERNAME", global = true)]
    pub username: Option<String>,

    /// Account password
    #[arg(long, env = "SCHLUTER_PASSWORD", global = true, hide_env_values = true)]
    pub password: Option<String>,

    /// Service base URL (overrides config)
    #[arg(long, env = "SCHLUTER_BASE_URL", global = true)]
    pub base_url: Option<String>,

    /// Polling interval, e.g. "1m" or "90s"
    #[arg(long, value_parser = humantime::parse_duration, global = true)]
    pub interval: Option<Duration>,

    /// Per-refresh timeout, e.g. "10s"
    #[arg(long, value_parser = humantime::parse_duration, global = true)]
    pub timeout: Option<Duration>,

    /// What to do when a renewed session arrives mid-refresh
    #[arg(long, global = true)]
    pub expired_session: Option<ExpiredSessionArg>,

    /// Accept invalid TLS certificates
    #[arg(long, short = 'k', global = true)]
    pub insecure: bool,

    /// Output format
    #[arg(long, short = 'o', default_value = "table", global = true)]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

// ── Value Enums ──────────────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ExpiredSessionArg {
    /// Keep the previous data; fetch again on the next interval
    WaitForNextTick,
    /// Fetch again right away with the new session
    RetryImmediately,
}

impl From<ExpiredSessionArg> for ExpiredSessionPolicy {
    fn from(arg: ExpiredSessionArg) -> Self {
        match arg {
            ExpiredSessionArg::WaitForNextTick => Self::WaitForNextTick,
            ExpiredSessionArg::RetryImmediately => Self::RetryImmediately,
        }
    }
}

// ── Commands ─────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Refresh once and print every thermostat
    #[command(alias = "ls")]
    Show,

    /// Keep polling and print each refresh until interrupted
    Watch(WatchArgs),

    /// Hold a thermostat at a manual set point
    SetTemperature(SetTemperatureArgs),
}

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Stop after this many successful refreshes
    #[arg(long)]
    pub count: Option<u64>,
}

#[derive(Debug, Args)]
pub struct SetTemperatureArgs {
    /// Thermostat serial number
    pub serial_number: String,

    /// Target temperature in degrees Celsius
    #[arg(allow_negative_numbers = true)]
    pub celsius: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn parses_humantime_interval() {
        let cli = Cli::try_parse_from(["schluter", "--interval", "90s", "show"]).unwrap();
        assert_eq!(cli.global.interval, Some(Duration::from_secs(90)));
    }
}
