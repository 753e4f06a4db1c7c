//! Output formatting: table or JSON.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};

use schluter_core::{RefreshStatus, Thermostat, ThermostatSnapshot};

use crate::cli::{ColorMode, OutputFormat};
use crate::error::CliError;

/// Determine whether color output should be enabled.
pub fn should_color(mode: &ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ThermostatRow {
    #[tabled(rename = "Serial")]
    serial: String,
    #[tabled(rename = "Room")]
    room: String,
    #[tabled(rename = "Group")]
    group: String,
    #[tabled(rename = "Temp")]
    temperature: String,
    #[tabled(rename = "Set Point")]
    set_point: String,
    #[tabled(rename = "Mode")]
    mode: String,
    #[tabled(rename = "Heating")]
    heating: String,
    #[tabled(rename = "Online")]
    online: String,
}

impl From<&Thermostat> for ThermostatRow {
    fn from(t: &Thermostat) -> Self {
        Self {
            serial: t.serial_number.clone(),
            room: t.display_name().to_owned(),
            group: t.group_name.clone().unwrap_or_default(),
            temperature: format!("{:.1} °C", t.temperature_celsius()),
            set_point: format!("{:.1} °C", t.set_point_celsius()),
            mode: t.mode().to_string(),
            heating: yes_no(t.heating),
            online: yes_no(t.online),
        }
    }
}

fn yes_no(flag: bool) -> String {
    if flag { "yes" } else { "no" }.into()
}

// ── Renderers ───────────────────────────────────────────────────────

/// Render a snapshot in the chosen format.
pub fn render_snapshot(
    format: &OutputFormat,
    snapshot: &ThermostatSnapshot,
) -> Result<String, CliError> {
    let out = match format {
        OutputFormat::Table => {
            let rows: Vec<ThermostatRow> = snapshot.values().map(ThermostatRow::from).collect();
            Table::new(rows).with(Style::rounded()).to_string()
        }
        OutputFormat::Json => serde_json::to_string_pretty(snapshot)?,
        OutputFormat::JsonCompact => serde_json::to_string(snapshot)?,
    };
    Ok(out)
}

/// One-line refresh status for `watch`.
pub fn render_status(status: &RefreshStatus, color: bool) -> String {
    let when = status.last_refresh.map_or_else(
        || "never".to_owned(),
        |t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
    );
    let state = if status.last_update_success { "ok" } else { "stale" };
    let state = match (color, status.last_update_success) {
        (false, _) => state.to_owned(),
        (true, true) => state.green().to_string(),
        (true, false) => state.yellow().to_string(),
    };
    format!("last refresh: {when} ({state})")
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn snapshot() -> ThermostatSnapshot {
        let body = serde_json::json!({
            "SerialNumber": "device-1",
            "Room": "Bathroom",
            "GroupName": "Home",
            "Temperature": 2150,
            "SetPointTemp": 2200,
            "RegulationMode": 3,
            "Heating": true,
            "Online": true
        });
        let thermostat: Thermostat = serde_json::from_value(body).unwrap();
        ThermostatSnapshot::from([("device-1".to_owned(), thermostat)])
    }

    #[test]
    fn table_shows_celsius() {
        let out = render_snapshot(&OutputFormat::Table, &snapshot()).unwrap();
        assert!(out.contains("Bathroom"));
        assert!(out.contains("21.5 °C"));
        assert!(out.contains("22.0 °C"));
    }

    #[test]
    fn json_is_keyed_by_serial() {
        let out = render_snapshot(&OutputFormat::JsonCompact, &snapshot()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["device-1"]["Room"], "Bathroom");
    }

    #[test]
    fn status_without_refresh() {
        let status = RefreshStatus::default();
        assert_eq!(render_status(&status, false), "last refresh: never (stale)");
    }
}
