// Thermostat endpoints
//
// Both calls authenticate via the `sessionid` query parameter. A 401
// means the session id is no longer valid, which the caller can fix by
// exchanging credentials again.

use serde::Serialize;
use tracing::debug;

use crate::auth::SessionToken;
use crate::client::{SchluterClient, preview};
use crate::error::Error;
use crate::models::{ThermostatSnapshot, ThermostatsResponse, celsius_to_hundredths};

/// Regulation mode written by a manual set-point change (permanent hold).
const MANUAL_REGULATION_MODE: u8 = 3;

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct SetTemperatureRequest {
    manual_temperature: i32,
    regulation_mode: u8,
    vacation_enabled: bool,
}

impl SchluterClient {
    /// Fetch the current state of every thermostat on the account.
    ///
    /// `GET /api/thermostats?sessionid={token}`
    pub async fn current_thermostats(
        &self,
        token: &SessionToken,
    ) -> Result<ThermostatSnapshot, Error> {
        let url = self.api_url("thermostats")?;
        debug!("fetching thermostats");

        let resp = self
            .http()
            .get(url)
            .query(&[("sessionid", token.expose())])
            .send()
            .await?;

        let resp = Self::check_session(resp)?;
        let body: ThermostatsResponse = self.parse_json(resp).await?;
        let snapshot = body.into_snapshot();

        debug!(thermostats = snapshot.len(), "thermostats fetched");
        Ok(snapshot)
    }

    /// Put a thermostat into manual hold at the given set point.
    ///
    /// `POST /api/thermostat?sessionid={token}&serialnumber={serial}`
    pub async fn set_temperature(
        &self,
        token: &SessionToken,
        serial_number: &str,
        celsius: f64,
    ) -> Result<(), Error> {
        let url = self.api_url("thermostat")?;
        debug!(%serial_number, celsius, "setting manual temperature");

        let body = SetTemperatureRequest {
            manual_temperature: celsius_to_hundredths(celsius),
            regulation_mode: MANUAL_REGULATION_MODE,
            vacation_enabled: false,
        };

        let resp = self
            .http()
            .post(url)
            .query(&[("sessionid", token.expose()), ("serialnumber", serial_number)])
            .json(&body)
            .send()
            .await?;

        let resp = Self::check_session(resp)?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Api {
                status: Some(status.as_u16()),
                message: preview(&body),
            });
        }

        Ok(())
    }
}
