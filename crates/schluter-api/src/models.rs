// Thermostat wire types
//
// The service reports temperatures as integer hundredths of a degree
// Celsius. Fields are kept in wire units; the `*_celsius` accessors
// convert for display.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Current readings of every thermostat on the account, keyed by serial number.
pub type ThermostatSnapshot = BTreeMap<String, Thermostat>;

/// One thermostat as returned by `GET /api/thermostats`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Thermostat {
    pub serial_number: String,
    /// User-assigned room name.
    #[serde(default)]
    pub room: Option<String>,
    /// Name of the group this thermostat was listed under.
    #[serde(default)]
    pub group_name: Option<String>,
    /// Measured floor/air temperature, hundredths of °C.
    #[serde(default)]
    pub temperature: i32,
    /// Active set point, hundredths of °C.
    #[serde(default)]
    pub set_point_temp: i32,
    #[serde(default)]
    pub regulation_mode: u8,
    #[serde(default)]
    pub heating: bool,
    #[serde(default)]
    pub online: bool,
    #[serde(default)]
    pub comfort_temp: Option<i32>,
    #[serde(default)]
    pub manual_temp: Option<i32>,
    #[serde(default)]
    pub min_temp: Option<i32>,
    #[serde(default)]
    pub max_temp: Option<i32>,
    #[serde(default)]
    pub vacation_enabled: bool,
    #[serde(default)]
    pub error_code: i32,
    #[serde(default, rename = "KWhCharge")]
    pub kwh_charge: Option<f64>,
    #[serde(default)]
    pub load_measured_watt: Option<i32>,
    #[serde(default, rename = "SWVersion")]
    pub sw_version: Option<String>,
}

/// How the thermostat is currently deciding its set point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegulationMode {
    /// Following the programmed schedule.
    Schedule,
    /// Temporary comfort override until the next schedule change.
    Temporary,
    /// Permanent manual hold.
    Manual,
    Vacation,
    Unknown(u8),
}

impl From<u8> for RegulationMode {
    fn from(raw: u8) -> Self {
        match raw {
            1 => Self::Schedule,
            2 => Self::Temporary,
            3 => Self::Manual,
            4 => Self::Vacation,
            other => Self::Unknown(other),
        }
    }
}

impl std::fmt::Display for RegulationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Schedule => f.write_str("schedule"),
            Self::Temporary => f.write_str("temporary"),
            Self::Manual => f.write_str("manual"),
            Self::Vacation => f.write_str("vacation"),
            Self::Unknown(raw) => write!(f, "unknown({raw})"),
        }
    }
}

/// Convert hundredths of a degree to °C.
pub fn hundredths_to_celsius(raw: i32) -> f64 {
    f64::from(raw) / 100.0
}

/// Convert °C to the wire's hundredths of a degree, rounding to nearest.
#[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
pub fn celsius_to_hundredths(celsius: f64) -> i32 {
    (celsius * 100.0).round() as i32
}

impl Thermostat {
    pub fn temperature_celsius(&self) -> f64 {
        hundredths_to_celsius(self.temperature)
    }

    pub fn set_point_celsius(&self) -> f64 {
        hundredths_to_celsius(self.set_point_temp)
    }

    pub fn min_temp_celsius(&self) -> Option<f64> {
        self.min_temp.map(hundredths_to_celsius)
    }

    pub fn max_temp_celsius(&self) -> Option<f64> {
        self.max_temp.map(hundredths_to_celsius)
    }

    pub fn mode(&self) -> RegulationMode {
        RegulationMode::from(self.regulation_mode)
    }

    /// Display name: room name if set, otherwise the serial number.
    pub fn display_name(&self) -> &str {
        self.room.as_deref().unwrap_or(&self.serial_number)
    }
}

// ── Response envelopes ──────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct ThermostatsResponse {
    #[serde(default)]
    pub groups: Vec<ThermostatGroup>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct ThermostatGroup {
    #[serde(default)]
    pub group_name: Option<String>,
    #[serde(default)]
    pub thermostats: Vec<Thermostat>,
}

impl ThermostatsResponse {
    /// Flatten all groups into a serial-keyed snapshot, tagging each
    /// thermostat with its group name.
    pub(crate) fn into_snapshot(self) -> ThermostatSnapshot {
        self.groups
            .into_iter()
            .flat_map(|group| {
                let name = group.group_name;
                group.thermostats.into_iter().map(move |mut t| {
                    if t.group_name.is_none() {
                        t.group_name.clone_from(&name);
                    }
                    (t.serial_number.clone(), t)
                })
            })
            .collect()
    }
}
