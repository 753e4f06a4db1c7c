//! `schluter set-temperature <serial> <celsius>`

use schluter_core::{Coordinator, CoreError};

use crate::cli::{GlobalOpts, SetTemperatureArgs};
use crate::error::CliError;

pub async fn handle(
    coordinator: &Coordinator,
    args: SetTemperatureArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    if !args.celsius.is_finite() {
        return Err(CliError::Validation {
            field: "celsius".into(),
            reason: format!("{} is not a temperature", args.celsius),
        });
    }

    let snapshot = super::refresh_once(coordinator).await?;
    let Some(thermostat) = snapshot.get(&args.serial_number) else {
        return Err(CoreError::ThermostatNotFound {
            serial_number: args.serial_number,
        }
        .into());
    };

    if let (Some(min), Some(max)) = (thermostat.min_temp_celsius(), thermostat.max_temp_celsius())
    {
        if !(min..=max).contains(&args.celsius) {
            return Err(CliError::Validation {
                field: "celsius".into(),
                reason: format!("{:.1} is outside {min:.1}..={max:.1} °C", args.celsius),
            });
        }
    }

    coordinator
        .set_temperature(&args.serial_number, args.celsius)
        .await?;

    if !global.quiet {
        eprintln!(
            "{} held at {:.1} °C",
            thermostat.display_name(),
            args.celsius
        );
    }
    Ok(())
}
