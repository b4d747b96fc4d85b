// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Exostream Contributors

//! Fixed timing and sizing constants shared across the control plane.
//!
//! These are not configurable: the specification pins exact values for them
//! so that behavior is identical across deployments. Anything an operator
//! can override (socket path, TCP port, state directory) lives in
//! `exostream-daemon`'s config module instead.

use std::time::Duration;

/// Maximum number of concurrently active streams.
pub const N_MAX: usize = 3;

/// Grace window after spawning an encoder before re-checking liveness.
pub const ENCODER_GRACE_WINDOW: Duration = Duration::from_millis(200);

/// Join timeout for an ordinary stop.
pub const STOP_JOIN_TIMEOUT: Duration = Duration::from_secs(10);

/// Join timeout used when stopping the old encoder during a restart.
pub const RESTART_STOP_TIMEOUT: Duration = Duration::from_secs(5);

/// Upper bound (inclusive) on width/height for a stream's resolution.
pub const START_RESOLUTION_MAX: u32 = 4096;

/// Lower bound (inclusive) on frame rate.
pub const START_FPS_MIN: u32 = 1;

/// Upper bound (inclusive) on frame rate.
pub const START_FPS_MAX: u32 = 120;

/// UDP port shared by the presence beacon and the discovery listener.
pub const BEACON_PORT: u16 = 5354;

/// Interval between presence beacon broadcasts.
pub const BROADCAST_INTERVAL: Duration = Duration::from_secs(3);

/// Interval between discovery-listener liveness sweeps.
pub const DISCOVERY_SWEEP_INTERVAL: Duration = Duration::from_secs(2);

/// A peer is considered stale once this long has passed since its last beacon.
pub const DISCOVERY_TIMEOUT: Duration = Duration::from_secs(10);

/// Resolutions advertised by `settings.get_available` as common presets.
///
/// Any resolution up to [`START_RESOLUTION_MAX`] is still accepted by
/// `stream.start`; this list is a UI convenience, not a validation bound.
pub const COMMON_RESOLUTIONS: &[&str] = &[
    "640x480",
    "800x600",
    "1280x720",
    "1920x1080",
    "2560x1440",
    "3840x2160",
];

/// Frame rates advertised by `settings.get_available` as common presets.
pub const COMMON_FPS: &[u32] = &[15, 24, 30, 60];

/// Capture input formats advertised by `settings.get_available`.
pub const INPUT_FORMATS: &[&str] = &["mjpeg", "yuyv"];
