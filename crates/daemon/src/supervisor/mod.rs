// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Exostream Contributors

//! Stream Supervisor (§4.D): owns the in-memory stream table and drives the
//! State Store (A) and Encoder Driver (C).
//!
//! Exactly one coarse-grained lock (`table`) guards the table itself; a
//! second lock (`handles`) guards the side table of live encoder handles
//! that [`exostream_core::ActiveStream`] deliberately excludes. Both locks
//! are only ever held across synchronous bookkeeping, never across child
//! I/O or an `.await` (§4.D.6).

mod health;
mod restart;
mod start;
mod stop;

pub use health::HealthView;
pub use restart::RestartParams;
pub use stop::StopResult;

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use exostream_core::{ActiveStream, Device, DeviceView, StreamParams, StreamStatus};
use exostream_storage::StateStore;
use parking_lot::Mutex;
use serde::Serialize;
use smol_str::SmolStr;

use crate::device;
use crate::encoder::EncoderHandle;

/// Device enumeration seam: production code points this at
/// [`device::list_devices`]; tests substitute a closure returning fixture
/// devices so `start_stream` doesn't depend on real `/dev/video*` nodes.
type DeviceProbe = Box<dyn Fn() -> Vec<Device> + Send + Sync>;

/// Result of a successful `stream.start` (§4.F.1).
#[derive(Debug, Clone, Serialize)]
pub struct StartResult {
    pub status: &'static str,
    pub device: SmolStr,
    pub stream_name: SmolStr,
    pub resolution: SmolStr,
    pub fps: u32,
    pub pid: Option<u32>,
}

/// Result of a successful `stream.restart` / `settings.update` restart.
#[derive(Debug, Clone, Serialize)]
pub struct RestartResult {
    pub status: &'static str,
    pub device: SmolStr,
    pub downtime_seconds: f64,
    pub old_settings: StreamParams,
    pub new_settings: StreamParams,
}

pub struct StreamSupervisor {
    pub(super) table: Arc<Mutex<BTreeMap<SmolStr, ActiveStream>>>,
    pub(super) handles: Mutex<HashMap<SmolStr, EncoderHandle>>,
    pub(super) store: Arc<StateStore>,
    pub(super) encoder_binary: PathBuf,
    pub(super) device_probe: DeviceProbe,
}

impl StreamSupervisor {
    pub fn new(store: Arc<StateStore>, encoder_binary: PathBuf) -> Self {
        Self {
            table: Arc::new(Mutex::new(BTreeMap::new())),
            handles: Mutex::new(HashMap::new()),
            store,
            encoder_binary,
            device_probe: Box::new(device::list_devices),
        }
    }

    /// Overrides the device probe, e.g. in tests so `start_stream`'s device
    /// lookup doesn't depend on real `/dev/video*` nodes being present.
    #[cfg(test)]
    pub(crate) fn with_device_probe(mut self, probe: impl Fn() -> Vec<Device> + Send + Sync + 'static) -> Self {
        self.device_probe = Box::new(probe);
        self
    }

    /// Snapshot view of every active row, for `stream.status{}` with no
    /// device and for `daemon.status`.
    pub fn list_streams(&self) -> Vec<StreamStatus> {
        let table = self.table.lock();
        let now = Utc::now();
        table.values().map(|row| StreamStatus::from_active(row, now)).collect()
    }

    /// Single-stream view, for `stream.status{device}`.
    pub fn stream_status(&self, device: &str) -> Option<StreamStatus> {
        let table = self.table.lock();
        table.get(device).map(|row| StreamStatus::from_active(row, Utc::now()))
    }

    pub fn stream_count(&self) -> usize {
        self.table.lock().len()
    }

    /// Device Probe (B) augmented with the `in_use` flag (§4.D.1).
    pub fn list_devices(&self) -> Vec<DeviceView> {
        let devices = (self.device_probe)();
        let table = self.table.lock();
        devices
            .iter()
            .map(|d| DeviceView::from_device(d, table.contains_key(d.path.as_str())))
            .collect()
    }

    /// Stops every active stream, used at orderly shutdown (§5). Errors are
    /// logged and do not abort the sweep.
    pub async fn shutdown(&self) {
        let devices: Vec<SmolStr> = self.table.lock().keys().cloned().collect();
        for device in devices {
            if let Err(err) = self.stop_one(&device, exostream_core::STOP_JOIN_TIMEOUT).await {
                tracing::warn!(device = %device, error = %err, "error stopping stream during shutdown");
            }
        }
    }
}


#[cfg(test)]
#[path = "../supervisor_tests.rs"]
mod supervisor_tests;
