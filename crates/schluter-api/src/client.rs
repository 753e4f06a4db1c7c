// Schluter API HTTP client
//
// Wraps `reqwest::Client` with base-URL handling and response decoding.
// Endpoint groups (auth, thermostats) are implemented as inherent methods
// in separate files to keep this module focused on transport mechanics.

use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// Production endpoint of the DITRA-HEAT-E-WiFi cloud service.
pub const DEFAULT_BASE_URL: &str = "https://ditra-heat-e-wifi.schluter.com";

/// Raw HTTP client for the Schluter thermostat cloud API.
///
/// Cheap to clone: the inner `reqwest::Client` shares its connection pool.
/// The client holds no session state; callers pass a
/// [`SessionToken`](crate::SessionToken) to every data call.
#[derive(Debug, Clone)]
pub struct SchluterClient {
    http: reqwest::Client,
    base_url: Url,
}

impl SchluterClient {
    /// Create a new client from a `TransportConfig`.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self { http, base_url })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    ///
    /// Use this when the host already owns a shared HTTP client.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    /// The underlying HTTP client.
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// The service base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build a full URL for an API path: `{base}/api/{path}`.
    pub(crate) fn api_url(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}/api/{path}"))?)
    }

    // ── Response helpers ─────────────────────────────────────────────

    /// Decode a successful response body as JSON.
    ///
    /// Non-2xx statuses become [`Error::Api`]; callers that need to treat
    /// specific statuses differently (401 on data calls) check first.
    pub(crate) async fn parse_json<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, Error> {
        let status = resp.status();

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Api {
                status: Some(status.as_u16()),
                message: preview(&body),
            });
        }

        let body = resp.text().await?;
        trace!(bytes = body.len(), "response body received");

        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: format!("{e} (body preview: {:?})", preview(&body)),
            body,
        })
    }

    /// Fail with [`Error::SessionExpired`] if the service rejected the
    /// session id, otherwise hand the response back untouched.
    pub(crate) fn check_session(resp: reqwest::Response) -> Result<reqwest::Response, Error> {
        if resp.status() == reqwest::StatusCode::UNAUTHORIZED {
            debug!("session id rejected (HTTP 401)");
            return Err(Error::SessionExpired);
        }
        Ok(resp)
    }
}

pub(crate) fn preview(body: &str) -> String {
    body.chars().take(200).collect()
}
