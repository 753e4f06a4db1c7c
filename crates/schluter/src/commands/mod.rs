//! Command dispatch: bridges CLI args -> coordinator -> output formatting.

pub mod set_temperature;
pub mod show;
pub mod watch;

use std::sync::Arc;

use schluter_core::{Coordinator, ThermostatSnapshot};

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    coordinator: Arc<Coordinator>,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Show => show::handle(&coordinator, global).await,
        Command::Watch(args) => watch::handle(coordinator, args, global).await,
        Command::SetTemperature(args) => set_temperature::handle(&coordinator, args, global).await,
    }
}

/// One refresh that must produce data. A tick that only renewed the
/// session is followed by a second tick on the new session.
pub(crate) async fn refresh_once(coordinator: &Coordinator) -> Result<ThermostatSnapshot, CliError> {
    if let Some(snapshot) = coordinator.refresh().await.into_result()? {
        return Ok(snapshot);
    }
    coordinator
        .refresh()
        .await
        .into_result()?
        .ok_or_else(|| CliError::UpdateFailed {
            reason: "service returned no data after renewing the session".into(),
        })
}
