// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Exostream Contributors

//! Shared data model and domain errors for the exostream control plane.
//!
//! This crate has no I/O of its own: it defines the types every other crate
//! in the workspace passes across its seams (device identity, stream
//! parameters, the persisted daemon snapshot, discovery peers) plus the
//! closed set of domain errors the RPC router maps to wire codes.

pub mod constants;
pub mod device;
pub mod error;
pub mod peer;
pub mod state;
pub mod stream;
pub mod validate;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use constants::{
    BEACON_PORT, BROADCAST_INTERVAL, COMMON_FPS, COMMON_RESOLUTIONS, DISCOVERY_SWEEP_INTERVAL,
    DISCOVERY_TIMEOUT, ENCODER_GRACE_WINDOW, INPUT_FORMATS, N_MAX, RESTART_STOP_TIMEOUT,
    START_FPS_MAX, START_FPS_MIN, START_RESOLUTION_MAX, STOP_JOIN_TIMEOUT,
};
pub use device::{Device, DeviceView};
pub use error::{DomainError, DomainResult};
pub use peer::{PeerService, PeerView};
pub use state::{DaemonInfo, DaemonState, LastConfig, StreamSnapshot};
pub use stream::{ActiveStream, StreamState, StreamStatus};
pub use validate::{validate_fps, validate_resolution, validate_stream_name, ValidatedResolution};

/// The `VideoParams` and `StreamParams` value types live in [`stream`] next
/// to the row type they configure.
pub use stream::{StreamParams, VideoParams};
