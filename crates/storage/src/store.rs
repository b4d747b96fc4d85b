// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Exostream Contributors

use std::collections::BTreeMap;
use std::fs;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use chrono::Utc;
use exostream_core::{DaemonState, LastConfig, StreamParams, StreamSnapshot};
use parking_lot::Mutex;
use smol_str::SmolStr;
use tracing::{debug, warn};

use crate::error::StateStoreError;

const STATE_FILE_NAME: &str = "state.json";
const TEMP_FILE_NAME: &str = "state.json.tmp";

/// Crash-safe on-disk reflection of declared stream intent (§4.A).
///
/// Holds the authoritative in-memory [`DaemonState`] behind one mutex;
/// every mutating call re-serializes the full document into a sibling temp
/// file and renames it over the target so readers never observe a partial
/// write. I/O failures are logged and swallowed: the in-memory copy stays
/// authoritative and the next successful write rewrites the snapshot.
pub struct StateStore {
    dir: PathBuf,
    state: Mutex<DaemonState>,
}

impl StateStore {
    /// Opens (or creates) the state directory and loads `state.json` from
    /// it. A missing or corrupt file produces a fresh default document and
    /// a warning; this never fails startup (§4.A).
    pub fn open(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        if let Err(source) = fs::create_dir_all(&dir) {
            warn!(dir = %dir.display(), error = %source, "failed to create state directory, using in-memory default");
        }
        let state = Self::load_from_disk(&dir).unwrap_or_else(|err| {
            warn!(error = %err, "failed to load state file, starting from default");
            DaemonState::default()
        });
        let store = Self {
            dir,
            state: Mutex::new(state),
        };
        store.save();
        store
    }

    fn load_from_disk(dir: &Path) -> Result<DaemonState, StateStoreError> {
        let path = dir.join(STATE_FILE_NAME);
        if !path.exists() {
            debug!(path = %path.display(), "no existing state file, starting fresh");
            return Ok(DaemonState::default());
        }
        let bytes = fs::read(&path).map_err(|source| StateStoreError::Read {
            path: path.display().to_string(),
            source,
        })?;
        serde_json::from_slice(&bytes).map_err(|source| StateStoreError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Re-serializes the full document and atomically replaces `state.json`.
    /// Failures are logged and swallowed per §4.A's error semantics.
    fn save(&self) {
        if let Err(err) = self.try_save() {
            warn!(error = %err, "failed to persist daemon state");
        }
    }

    fn try_save(&self) -> Result<(), StateStoreError> {
        let path = self.dir.join(STATE_FILE_NAME);
        let temp_path = self.dir.join(TEMP_FILE_NAME);

        let json = {
            let state = self.state.lock();
            serde_json::to_vec_pretty(&*state).expect("DaemonState always serializes")
        };

        let mut file = fs::File::create(&temp_path).map_err(|source| StateStoreError::Write {
            path: temp_path.display().to_string(),
            source,
        })?;
        file.write_all(&json).map_err(|source| StateStoreError::Write {
            path: temp_path.display().to_string(),
            source,
        })?;
        file.flush().map_err(|source| StateStoreError::Write {
            path: temp_path.display().to_string(),
            source,
        })?;
        drop(file);

        fs::rename(&temp_path, &path).map_err(|source| StateStoreError::Rename {
            path: path.display().to_string(),
            source,
        })?;
        debug!(path = %path.display(), "saved daemon state");
        Ok(())
    }

    /// Marks the daemon as started: records `pid` and the current instant.
    pub fn set_daemon_started(&self, pid: u32) {
        {
            let mut state = self.state.lock();
            state.daemon.started_at = Some(Utc::now().to_rfc3339());
            state.daemon.pid = Some(pid);
        }
        self.save();
    }

    /// Clears the daemon-started marker at orderly shutdown.
    pub fn clear_daemon_started(&self) {
        {
            let mut state = self.state.lock();
            state.daemon.started_at = None;
            state.daemon.pid = None;
        }
        self.save();
    }

    /// Marks one stream active, persisting its snapshot and updating
    /// `last_config` to match (§4.A).
    pub fn set_stream_active(&self, params: &StreamParams, ffmpeg_pid: Option<u32>) {
        {
            let mut state = self.state.lock();
            let snapshot = StreamSnapshot::from_params(params, Utc::now().to_rfc3339(), ffmpeg_pid);
            state.last_config = LastConfig {
                device: params.device_path.clone(),
                resolution: params.resolution.clone(),
                fps: params.fps,
                raw_input: params.raw_input,
            };
            state.streams.insert(params.device_path.clone(), snapshot);
        }
        self.save();
    }

    /// Marks one stream (or, when `device` is absent, every stream)
    /// inactive by removing its persisted row.
    pub fn set_stream_inactive(&self, device: Option<&str>) {
        {
            let mut state = self.state.lock();
            match device {
                Some(device) => {
                    state.streams.remove(device);
                }
                None => state.streams.clear(),
            }
        }
        self.save();
    }

    /// Updates the recorded encoder PID for an already-active stream.
    pub fn update_stream_pid(&self, device: &str, pid: Option<u32>) {
        let changed = {
            let mut state = self.state.lock();
            match state.streams.get_mut(device) {
                Some(snapshot) => {
                    snapshot.ffmpeg_pid = pid;
                    true
                }
                None => false,
            }
        };
        if changed {
            self.save();
        }
    }

    /// Returns the persisted snapshot for one device, if active.
    pub fn streaming_info(&self, device: &str) -> Option<StreamSnapshot> {
        self.state.lock().streams.get(device).cloned()
    }

    /// Returns every persisted stream snapshot, keyed by device path.
    pub fn all_streams(&self) -> BTreeMap<SmolStr, StreamSnapshot> {
        self.state.lock().streams.clone()
    }

    /// Returns the last known-good configuration.
    pub fn last_config(&self) -> LastConfig {
        self.state.lock().last_config.clone()
    }

    /// Persists `last_config` in isolation, without touching `streams`.
    ///
    /// Used by `settings.update` when no stream is currently running: the
    /// update has nowhere live to apply to, so it only seeds the defaults
    /// the next `stream.start` will fall back to.
    pub fn update_last_config(&self, last_config: LastConfig) {
        {
            let mut state = self.state.lock();
            state.last_config = last_config;
        }
        self.save();
    }

    /// Returns the recorded daemon start instant and PID, if set.
    pub fn daemon_started_at(&self) -> Option<String> {
        self.state.lock().daemon.started_at.clone()
    }

    /// Resets the document to its default (used by `daemon.shutdown`-adjacent
    /// tooling and tests); writes the reset document immediately.
    pub fn clear(&self) {
        {
            let mut state = self.state.lock();
            *state = DaemonState::default();
        }
        self.save();
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod store_tests;
