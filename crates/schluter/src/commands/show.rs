//! `schluter show`

use schluter_core::Coordinator;

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

pub async fn handle(coordinator: &Coordinator, global: &GlobalOpts) -> Result<(), CliError> {
    let snapshot = super::refresh_once(coordinator).await?;
    tracing::debug!(thermostats = snapshot.len(), "rendering snapshot");

    let rendered = output::render_snapshot(&global.output, &snapshot)?;
    output::print_output(&rendered, global.quiet);
    Ok(())
}
