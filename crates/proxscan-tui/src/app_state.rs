//! AppState — shared read-only data passed to all components during render/event.
//!
//! The App event-loop is the only thing that writes to AppState.

use proxscan_proto::network::Network;
use proxscan_proto::store::{DeviceStore, ScanReport};

use crate::cycle::{CycleStatus, Phase};

pub struct AppState {
    /// Wall-clock seconds captured once per frame.
    pub now: f64,
    pub cycle: CycleStatus,
    /// Cycle length in seconds, used for the title reveal.
    pub interval: f64,
    pub title: String,
    pub version: String,

    /// Latest scan, strongest first.
    pub networks: Vec<Network>,
    pub store: DeviceStore,
    pub last_report: Option<ScanReport>,
    pub scans_completed: u64,
}

impl AppState {
    pub fn new(store: DeviceStore, title: String, version: String, interval: f64, now: f64) -> Self {
        Self {
            now,
            cycle: CycleStatus {
                phase: Phase::Countdown,
                remaining: interval,
                elapsed: 0.0,
                scan_due: false,
            },
            interval,
            title,
            version,
            networks: Vec::new(),
            store,
            last_report: None,
            scans_completed: 0,
        }
    }
}
