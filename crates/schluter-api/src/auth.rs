// Credential exchange
//
// The service trades an email/password pair for an opaque session id.
// That id is passed as a query parameter on every data call; there is no
// cookie or header-based session.

use std::fmt;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::client::SchluterClient;
use crate::error::Error;

/// Application id the vendor assigns to third-party integrations.
const APPLICATION_ID: u32 = 7;

/// Opaque session id issued by the service.
///
/// Kept secret so it never leaks through `Debug` output or logs.
#[derive(Clone)]
pub struct SessionToken(SecretString);

impl SessionToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(SecretString::from(token.into()))
    }

    /// The raw session id, for building request URLs.
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken([REDACTED])")
    }
}

impl PartialEq for SessionToken {
    fn eq(&self, other: &Self) -> bool {
        self.expose() == other.expose()
    }
}

impl Eq for SessionToken {}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
    application: u32,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct LoginResponse {
    #[serde(default)]
    session_id: Option<String>,
    #[serde(default)]
    error_code: i32,
}

impl SchluterClient {
    /// Exchange a username/password pair for a session token.
    ///
    /// `POST /api/authenticate/user`
    ///
    /// The service reports bad credentials in-band: HTTP 200 with a
    /// non-zero `ErrorCode` (1 = unknown user, 2 = wrong password).
    /// A 401/403 status is treated the same way.
    pub async fn authenticate(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<SessionToken, Error> {
        let url = self.api_url("authenticate/user")?;
        debug!(%username, "requesting session id");

        let body = LoginRequest {
            email: username,
            password: password.expose_secret(),
            application: APPLICATION_ID,
        };

        let resp = self.http().post(url).json(&body).send().await?;

        let status = resp.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(Error::InvalidCredentials {
                message: format!("login rejected (HTTP {status})"),
            });
        }

        let login: LoginResponse = self.parse_json(resp).await?;

        match (login.error_code, login.session_id) {
            (0, Some(id)) if !id.is_empty() => {
                debug!("session id issued");
                Ok(SessionToken::new(id))
            }
            (0, _) => Err(Error::Api {
                status: Some(status.as_u16()),
                message: "login succeeded but no session id was returned".into(),
            }),
            (code @ (1 | 2), _) => Err(Error::InvalidCredentials {
                message: format!("login rejected (ErrorCode {code})"),
            }),
            (code, _) => Err(Error::Api {
                status: Some(status.as_u16()),
                message: format!("login failed (ErrorCode {code})"),
            }),
        }
    }
}
