// schluter-api: Async Rust client for the Schluter DITRA-HEAT-E-WiFi cloud API

pub mod auth;
pub mod client;
pub mod error;
pub mod models;
pub mod thermostats;
pub mod transport;

pub use auth::SessionToken;
pub use client::{DEFAULT_BASE_URL, SchluterClient};
pub use error::Error;
pub use models::{RegulationMode, Thermostat, ThermostatSnapshot};
pub use transport::{TlsMode, TransportConfig};
