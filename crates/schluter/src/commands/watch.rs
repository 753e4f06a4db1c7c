//! `schluter watch`: keep polling until interrupted or credentials fail.

use std::sync::Arc;

use tracing::info;

use schluter_core::{Coordinator, CoordinatorState, DataStore, Poller};

use crate::cli::{GlobalOpts, WatchArgs};
use crate::error::CliError;
use crate::output;

pub async fn handle(
    coordinator: Arc<Coordinator>,
    args: WatchArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let store = Arc::new(DataStore::new());
    let mut state = coordinator.subscribe_state();
    let mut status = store.subscribe_status();
    let color = output::should_color(&global.color);

    let poller = Poller::start(coordinator, Arc::clone(&store)).await?;
    status.mark_unchanged();
    print_refresh(&store, global, color)?;
    let mut refreshes = 1_u64;

    loop {
        if args.count.is_some_and(|limit| refreshes >= limit) {
            break;
        }

        tokio::select! {
            biased;
            _ = tokio::signal::ctrl_c() => {
                info!("interrupted");
                break;
            }
            failed = state.wait_for(|s| *s == CoordinatorState::AuthFailed) => {
                drop(failed);
                poller.shutdown().await;
                return Err(CliError::AuthFailed {
                    reason: "credentials were rejected while polling".into(),
                });
            }
            changed = status.changed() => {
                if changed.is_err() {
                    break;
                }
                let current = *status.borrow_and_update();
                if current.last_update_success {
                    print_refresh(&store, global, color)?;
                    refreshes += 1;
                } else if !global.quiet {
                    eprintln!("{}", output::render_status(&current, color));
                }
            }
        }
    }

    poller.shutdown().await;
    Ok(())
}

fn print_refresh(store: &DataStore, global: &GlobalOpts, color: bool) -> Result<(), CliError> {
    let Some(snapshot) = store.snapshot() else {
        return Ok(());
    };
    let rendered = output::render_snapshot(&global.output, &snapshot)?;
    output::print_output(&rendered, global.quiet);
    if matches!(global.output, crate::cli::OutputFormat::Table) && !global.quiet {
        eprintln!("{}", output::render_status(&store.status(), color));
    }
    Ok(())
}
