// ── Snapshot store ──
//
// Last-known-good thermostat data plus refresh status, published over
// `watch` channels. The coordinator never keeps a snapshot; the host
// routes each successful tick in here and consumers subscribe.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use schluter_api::{Thermostat, ThermostatSnapshot};
use tokio::sync::watch;

/// Refresh status as seen by dependent entities.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefreshStatus {
    /// `false` after a failed tick, until the next successful one.
    /// Consumers show their values as stale/unavailable meanwhile.
    pub last_update_success: bool,
    pub last_refresh: Option<DateTime<Utc>>,
}

/// Data-distribution point for one account.
pub struct DataStore {
    snapshot: watch::Sender<Option<Arc<ThermostatSnapshot>>>,
    status: watch::Sender<RefreshStatus>,
}

impl DataStore {
    pub fn new() -> Self {
        let (snapshot, _) = watch::channel(None);
        let (status, _) = watch::channel(RefreshStatus::default());
        Self { snapshot, status }
    }

    // ── Mutations ────────────────────────────────────────────────

    /// Replace the snapshot with fresh data and mark the update successful.
    pub fn apply_success(&self, snapshot: ThermostatSnapshot) {
        self.snapshot.send_replace(Some(Arc::new(snapshot)));
        self.status.send_replace(RefreshStatus {
            last_update_success: true,
            last_refresh: Some(Utc::now()),
        });
    }

    /// Mark the last update as failed. The previous snapshot stays
    /// available as last-known-good.
    pub fn mark_failed(&self) {
        self.status.send_if_modified(|status| {
            let changed = status.last_update_success;
            status.last_update_success = false;
            changed
        });
    }

    // ── Accessors ────────────────────────────────────────────────

    pub fn snapshot(&self) -> Option<Arc<ThermostatSnapshot>> {
        self.snapshot.borrow().clone()
    }

    pub fn thermostat(&self, serial_number: &str) -> Option<Thermostat> {
        self.snapshot
            .borrow()
            .as_ref()
            .and_then(|snap| snap.get(serial_number).cloned())
    }

    pub fn thermostat_count(&self) -> usize {
        self.snapshot.borrow().as_ref().map_or(0, |snap| snap.len())
    }

    pub fn status(&self) -> RefreshStatus {
        *self.status.borrow()
    }

    pub fn last_update_success(&self) -> bool {
        self.status.borrow().last_update_success
    }

    pub fn last_refresh(&self) -> Option<DateTime<Utc>> {
        self.status.borrow().last_refresh
    }

    // ── Subscriptions ────────────────────────────────────────────

    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<ThermostatSnapshot>>> {
        self.snapshot.subscribe()
    }

    pub fn subscribe_status(&self) -> watch::Receiver<RefreshStatus> {
        self.status.subscribe()
    }
}

impl Default for DataStore {
    fn default() -> Self {
        Self::new()
    }
}
