// ── Polling coordinator ──
//
// Produces one fresh thermostat snapshot per tick, or fails in a
// classified way. Owns the session for one account; ticks are serialised
// through the session lock and bounded by a single wall-clock timeout.

use std::time::Duration;

use schluter_api::{SchluterClient, ThermostatSnapshot};
use tokio::sync::{Mutex, watch};
use tracing::{debug, error, info, warn};

use crate::config::{CoordinatorConfig, Credentials, ExpiredSessionPolicy};
use crate::error::{CoreError, PollFailure};
use crate::session::{SessionError, SessionManager};

// ── CoordinatorState ─────────────────────────────────────────────

/// Session state observable by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinatorState {
    /// No token held; the next tick authenticates.
    NoSession,
    /// A token from a successful exchange is cached.
    Authenticated,
    /// Credentials were rejected. Terminal: build a new coordinator
    /// with new credentials.
    AuthFailed,
}

// ── Outcome ──────────────────────────────────────────────────────

/// Result of one tick.
#[derive(Debug)]
pub enum Outcome {
    /// Fresh data, exactly as returned by the service.
    Success(ThermostatSnapshot),
    /// The session was rejected and renewed; no data this tick.
    /// Only produced under [`ExpiredSessionPolicy::WaitForNextTick`].
    Reauthenticated,
    /// Another tick was already in flight; nothing was done.
    Skipped,
    /// Failed this time; the next scheduled tick retries.
    Retryable(PollFailure),
    /// Credentials rejected; polling must stop until the user acts.
    AuthFailed(PollFailure),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn is_auth_failed(&self) -> bool {
        matches!(self, Self::AuthFailed(_))
    }

    /// Translate into `Result` signalling. `Ok(None)` means "nothing new,
    /// nothing wrong" (re-authenticated or skipped).
    pub fn into_result(self) -> Result<Option<ThermostatSnapshot>, CoreError> {
        match self {
            Self::Success(snapshot) => Ok(Some(snapshot)),
            Self::Reauthenticated | Self::Skipped => Ok(None),
            Self::Retryable(cause) => Err(CoreError::UpdateFailed { cause }),
            Self::AuthFailed(cause) => Err(CoreError::AuthFailed { cause }),
        }
    }
}

fn classify(err: SessionError) -> Outcome {
    match err {
        SessionError::InvalidCredentials(e) => Outcome::AuthFailed(e.into()),
        SessionError::Transient(e) => Outcome::Retryable(e.into()),
    }
}

// ── Coordinator ──────────────────────────────────────────────────

/// Session-aware polling coordinator for one account.
///
/// Share it behind an `Arc`; `refresh()` takes `&self`.
pub struct Coordinator {
    session: Mutex<SessionManager>,
    config: CoordinatorConfig,
    state: watch::Sender<CoordinatorState>,
}

impl Coordinator {
    pub fn new(client: SchluterClient, credentials: Credentials, config: CoordinatorConfig) -> Self {
        debug!(
            username = %credentials.username,
            interval_secs = config.interval.as_secs(),
            "creating coordinator"
        );
        let (state, _) = watch::channel(CoordinatorState::NoSession);
        Self {
            session: Mutex::new(SessionManager::new(client, credentials)),
            config,
            state,
        }
    }

    pub fn config(&self) -> &CoordinatorConfig {
        &self.config
    }

    /// How often the host should call [`refresh`](Self::refresh).
    pub fn interval(&self) -> Duration {
        self.config.interval
    }

    pub fn state(&self) -> CoordinatorState {
        *self.state.borrow()
    }

    /// Subscribe to session state changes.
    pub fn subscribe_state(&self) -> watch::Receiver<CoordinatorState> {
        self.state.subscribe()
    }

    // ── Tick ─────────────────────────────────────────────────────

    /// Run one tick.
    ///
    /// Returns [`Outcome::Skipped`] without waiting if a tick is already
    /// in flight, and [`Outcome::AuthFailed`] without any network call once
    /// the credentials have been rejected.
    pub async fn refresh(&self) -> Outcome {
        if self.state() == CoordinatorState::AuthFailed {
            return Outcome::AuthFailed(rejected_earlier());
        }

        let Ok(mut session) = self.session.try_lock() else {
            debug!("refresh already in flight, skipping tick");
            return Outcome::Skipped;
        };

        let outcome =
            match tokio::time::timeout(self.config.timeout, self.tick(&mut session)).await {
                Ok(outcome) => outcome,
                Err(_) => Outcome::Retryable(PollFailure::Timeout {
                    timeout_ms: duration_ms(self.config.timeout),
                }),
            };

        self.settle_state(&session, &outcome);
        log_outcome(&outcome);
        outcome
    }

    async fn tick(&self, session: &mut SessionManager) -> Outcome {
        let token = match session.ensure_token().await {
            Ok(token) => token,
            Err(e) => return classify(e),
        };
        self.set_state(CoordinatorState::Authenticated);

        let err = match session.client().current_thermostats(&token).await {
            Ok(snapshot) => return Outcome::Success(snapshot),
            Err(e) => e,
        };

        if !err.is_session_expired() {
            return Outcome::Retryable(err.into());
        }

        info!("session expired, re-authenticating");
        self.set_state(CoordinatorState::NoSession);

        let token = match session.force_refresh_token().await {
            Ok(token) => token,
            Err(e) => return classify(e),
        };
        self.set_state(CoordinatorState::Authenticated);

        match self.config.expired_session_policy {
            ExpiredSessionPolicy::WaitForNextTick => Outcome::Reauthenticated,
            ExpiredSessionPolicy::RetryImmediately => {
                match session.client().current_thermostats(&token).await {
                    Ok(snapshot) => Outcome::Success(snapshot),
                    Err(e) if e.is_session_expired() => {
                        session.invalidate();
                        Outcome::Retryable(PollFailure::SessionStillExpired)
                    }
                    Err(e) => Outcome::Retryable(e.into()),
                }
            }
        }
    }

    // ── Commands ─────────────────────────────────────────────────

    /// Put a thermostat into manual hold at `celsius`.
    ///
    /// Waits for any in-flight tick, then runs under the same timeout and
    /// the same single re-authentication rule. Unlike a tick, a renewed
    /// session always retries the command once.
    pub async fn set_temperature(&self, serial_number: &str, celsius: f64) -> Result<(), CoreError> {
        if self.state() == CoordinatorState::AuthFailed {
            return Err(CoreError::AuthFailed {
                cause: rejected_earlier(),
            });
        }

        let mut session = self.session.lock().await;
        // A tick holding the lock may have ended in AuthFailed.
        if self.state() == CoordinatorState::AuthFailed {
            return Err(CoreError::AuthFailed {
                cause: rejected_earlier(),
            });
        }

        let result = tokio::time::timeout(
            self.config.timeout,
            set_temperature_once(&mut session, serial_number, celsius),
        )
        .await
        .unwrap_or_else(|_| {
            Err(Outcome::Retryable(PollFailure::Timeout {
                timeout_ms: duration_ms(self.config.timeout),
            }))
        });

        match result {
            Ok(()) => {
                self.set_state(CoordinatorState::Authenticated);
                Ok(())
            }
            Err(outcome) => {
                self.settle_state(&session, &outcome);
                outcome.into_result().map(|_| ())
            }
        }
    }

    // ── State bookkeeping ────────────────────────────────────────

    fn set_state(&self, next: CoordinatorState) {
        self.state.send_if_modified(|current| {
            // AuthFailed is terminal.
            if *current == next || *current == CoordinatorState::AuthFailed {
                return false;
            }
            *current = next;
            true
        });
    }

    fn settle_state(&self, session: &SessionManager, outcome: &Outcome) {
        let next = if outcome.is_auth_failed() {
            CoordinatorState::AuthFailed
        } else if session.has_token() {
            CoordinatorState::Authenticated
        } else {
            CoordinatorState::NoSession
        };
        self.set_state(next);
    }
}

async fn set_temperature_once(
    session: &mut SessionManager,
    serial_number: &str,
    celsius: f64,
) -> Result<(), Outcome> {
    let token = session.ensure_token().await.map_err(classify)?;

    match session
        .client()
        .set_temperature(&token, serial_number, celsius)
        .await
    {
        Ok(()) => return Ok(()),
        Err(e) if !e.is_session_expired() => return Err(Outcome::Retryable(e.into())),
        Err(_) => {}
    }

    info!("session expired during command, re-authenticating");
    let token = session.force_refresh_token().await.map_err(classify)?;

    match session
        .client()
        .set_temperature(&token, serial_number, celsius)
        .await
    {
        Ok(()) => Ok(()),
        Err(e) if e.is_session_expired() => {
            session.invalidate();
            Err(Outcome::Retryable(PollFailure::SessionStillExpired))
        }
        Err(e) => Err(Outcome::Retryable(e.into())),
    }
}

fn log_outcome(outcome: &Outcome) {
    match outcome {
        Outcome::Success(snapshot) => debug!(thermostats = snapshot.len(), "refresh complete"),
        Outcome::Reauthenticated => {
            debug!("session renewed; fresh data on next tick");
        }
        Outcome::Skipped => {}
        Outcome::Retryable(cause) => warn!(error = %cause, "refresh failed, will retry"),
        Outcome::AuthFailed(cause) => {
            error!(error = %cause, "authentication failed, new credentials required");
        }
    }
}

fn rejected_earlier() -> PollFailure {
    PollFailure::InvalidCredentials {
        message: "credentials were rejected earlier; reconfigure the account".into(),
    }
}

fn duration_ms(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}
