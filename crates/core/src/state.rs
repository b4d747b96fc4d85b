// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Exostream Contributors

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::stream::StreamParams;

/// Current schema version written into `state.json`. Bumped only if the
/// on-disk shape changes in an incompatible way; readers tolerate unknown
/// keys regardless (§6).
pub const STATE_VERSION: &str = "0.1.0";

/// `{started_at, pid}` half of the persisted state, set once at launch and
/// cleared at orderly shutdown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaemonInfo {
    pub started_at: Option<String>,
    pub pid: Option<u32>,
}

/// One persisted stream entry under `streams[<device_path>]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamSnapshot {
    pub active: bool,
    pub stream_name: SmolStr,
    pub device: SmolStr,
    pub resolution: SmolStr,
    pub fps: u32,
    pub raw_input: bool,
    pub groups: Option<SmolStr>,
    pub started_at: String,
    pub ffmpeg_pid: Option<u32>,
}

impl StreamSnapshot {
    pub fn from_params(params: &StreamParams, started_at: String, ffmpeg_pid: Option<u32>) -> Self {
        Self {
            active: true,
            stream_name: params.stream_name.clone(),
            device: params.device_path.clone(),
            resolution: params.resolution.clone(),
            fps: params.fps,
            raw_input: params.raw_input,
            groups: params.groups.clone(),
            started_at,
            ffmpeg_pid,
        }
    }
}

/// Last known good configuration, used as the default for the next
/// `stream.start` and reported by `settings.get` while idle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastConfig {
    pub device: SmolStr,
    pub resolution: SmolStr,
    pub fps: u32,
    pub raw_input: bool,
}

impl Default for LastConfig {
    fn default() -> Self {
        Self {
            device: "/dev/video0".into(),
            resolution: "1920x1080".into(),
            fps: 30,
            raw_input: false,
        }
    }
}

/// The full document persisted to `state.json` (§6). Top-level keys are
/// fixed; unknown keys and missing optional fields must round-trip without
/// error so that future versions can add fields without breaking old
/// daemons reading a newer file (and vice versa).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaemonState {
    pub version: SmolStr,
    pub daemon: DaemonInfo,
    pub streams: BTreeMap<SmolStr, StreamSnapshot>,
    pub last_config: LastConfig,
}

impl Default for DaemonState {
    fn default() -> Self {
        Self {
            version: STATE_VERSION.into(),
            daemon: DaemonInfo::default(),
            streams: BTreeMap::new(),
            last_config: LastConfig::default(),
        }
    }
}
