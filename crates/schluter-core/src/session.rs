// ── Session manager ──
//
// Holds the (possibly absent) session token for one account and performs
// credential exchanges on demand. No retries happen here; the coordinator
// owns retry policy.

use schluter_api::{SchluterClient, SessionToken};
use thiserror::Error;
use tracing::debug;

use crate::config::Credentials;

/// Why a credential exchange failed.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The service rejected the username/password pair.
    #[error("credentials rejected: {0}")]
    InvalidCredentials(#[source] schluter_api::Error),

    /// Network or service failure; the same credentials may work later.
    #[error("credential exchange failed: {0}")]
    Transient(#[source] schluter_api::Error),
}

impl From<schluter_api::Error> for SessionError {
    fn from(err: schluter_api::Error) -> Self {
        if err.is_invalid_credentials() {
            Self::InvalidCredentials(err)
        } else {
            Self::Transient(err)
        }
    }
}

/// Obtains and caches a session token for one set of credentials.
#[derive(Debug)]
pub struct SessionManager {
    client: SchluterClient,
    credentials: Credentials,
    token: Option<SessionToken>,
}

impl SessionManager {
    pub fn new(client: SchluterClient, credentials: Credentials) -> Self {
        Self {
            client,
            credentials,
            token: None,
        }
    }

    pub fn client(&self) -> &SchluterClient {
        &self.client
    }

    pub fn username(&self) -> &str {
        &self.credentials.username
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// Return the cached token, authenticating first if there is none.
    pub async fn ensure_token(&mut self) -> Result<SessionToken, SessionError> {
        if let Some(token) = &self.token {
            return Ok(token.clone());
        }
        self.exchange().await
    }

    /// Drop any cached token and authenticate again.
    pub async fn force_refresh_token(&mut self) -> Result<SessionToken, SessionError> {
        self.token = None;
        self.exchange().await
    }

    /// Drop the cached token without contacting the service.
    pub fn invalidate(&mut self) {
        if self.token.take().is_some() {
            debug!(username = %self.credentials.username, "session token discarded");
        }
    }

    async fn exchange(&mut self) -> Result<SessionToken, SessionError> {
        debug!(username = %self.credentials.username, "authenticating");
        let token = self
            .client
            .authenticate(&self.credentials.username, &self.credentials.password)
            .await?;
        self.token = Some(token.clone());
        Ok(token)
    }
}
