// ── Poller ──
//
// Host-side driver for a coordinator: a synchronous first refresh that
// gates setup, then a fixed-interval background task that routes every
// outcome into the DataStore and stops for good on an auth failure.

use std::ops::ControlFlow;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::coordinator::{Coordinator, Outcome};
use crate::error::PollFailure;
use crate::store::DataStore;

/// Why setup could not complete.
#[derive(Debug, Error)]
pub enum SetupError {
    /// Credentials rejected on the first refresh. Do not retry
    /// automatically; ask the user for new credentials.
    #[error("Authentication failed during setup: {0}")]
    AuthFailed(#[source] PollFailure),

    /// First refresh failed in a retryable way; setup may be retried later.
    #[error("Not ready: {0}")]
    NotReady(#[source] PollFailure),

    /// First refresh ended without data or error (session renewed, or a
    /// refresh was already in flight).
    #[error("No data yet: {0}")]
    NoData(&'static str),
}

/// Running poll loop for one account.
pub struct Poller {
    coordinator: Arc<Coordinator>,
    store: Arc<DataStore>,
    cancel: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl Poller {
    /// Run the first refresh, then start periodic polling.
    ///
    /// Setup only completes with data in the store: a first tick that
    /// ends retryable yields [`SetupError::NotReady`] with its cause; one
    /// that merely re-authenticated yields [`SetupError::NoData`].
    pub async fn start(
        coordinator: Arc<Coordinator>,
        store: Arc<DataStore>,
    ) -> Result<Self, SetupError> {
        match coordinator.refresh().await {
            Outcome::Success(snapshot) => store.apply_success(snapshot),
            Outcome::AuthFailed(cause) => return Err(SetupError::AuthFailed(cause)),
            Outcome::Retryable(cause) => return Err(SetupError::NotReady(cause)),
            Outcome::Reauthenticated => {
                return Err(SetupError::NoData("session renewed during setup"));
            }
            Outcome::Skipped => return Err(SetupError::NoData("a refresh is already in flight")),
        }

        let cancel = CancellationToken::new();
        let interval = coordinator.interval();
        let handle = tokio::spawn(poll_task(
            Arc::clone(&coordinator),
            Arc::clone(&store),
            interval,
            cancel.clone(),
        ));

        info!(
            thermostats = store.thermostat_count(),
            interval_secs = interval.as_secs(),
            "polling started"
        );

        Ok(Self {
            coordinator,
            store,
            cancel,
            handle: Some(handle),
        })
    }

    pub fn coordinator(&self) -> &Arc<Coordinator> {
        &self.coordinator
    }

    pub fn store(&self) -> &Arc<DataStore> {
        &self.store
    }

    /// `false` once the poll task has exited (auth failure or shutdown).
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Wait until the poll task exits on its own.
    pub async fn stopped(&mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }

    /// Stop polling and wait for the task to finish. The coordinator
    /// (and its session) is dropped with the poller.
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        self.stopped().await;
        debug!("poller shut down");
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

// ── Background task ──────────────────────────────────────────────

async fn poll_task(
    coordinator: Arc<Coordinator>,
    store: Arc<DataStore>,
    interval: Duration,
    cancel: CancellationToken,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    ticker.tick().await; // the first refresh already ran in `start`

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = ticker.tick() => {
                if route_outcome(&store, coordinator.refresh().await).is_break() {
                    break;
                }
            }
        }
    }
}

/// Apply one outcome to the store. `Break` means polling must stop.
pub(crate) fn route_outcome(store: &DataStore, outcome: Outcome) -> ControlFlow<()> {
    match outcome {
        Outcome::Success(snapshot) => store.apply_success(snapshot),
        Outcome::Reauthenticated | Outcome::Skipped => {}
        Outcome::Retryable(_) => store.mark_failed(),
        Outcome::AuthFailed(_) => {
            store.mark_failed();
            warn!("polling halted; re-authentication required");
            return ControlFlow::Break(());
        }
    }
    ControlFlow::Continue(())
}
