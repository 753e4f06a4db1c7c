// schluter-core: Session-aware polling between schluter-api and a host.

pub mod config;
pub mod coordinator;
pub mod error;
pub mod poller;
pub mod session;
pub mod store;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{
    CoordinatorConfig, Credentials, DEFAULT_INTERVAL, DEFAULT_TIMEOUT, ExpiredSessionPolicy,
};
pub use coordinator::{Coordinator, CoordinatorState, Outcome};
pub use error::{CoreError, PollFailure};
pub use poller::{Poller, SetupError};
pub use session::{SessionError, SessionManager};
pub use store::{DataStore, RefreshStatus};

// Re-export API types consumers need without depending on schluter-api.
pub use schluter_api::{
    DEFAULT_BASE_URL, RegulationMode, SchluterClient, Thermostat, ThermostatSnapshot, TlsMode,
    TransportConfig,
};
