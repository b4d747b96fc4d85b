// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Exostream Contributors

//! Test-only builders shared across crates, enabled via the `test-support`
//! feature so integration tests in `exostream-storage` and
//! `exostream-daemon` don't each reinvent fixture construction.

use smol_str::SmolStr;

use crate::device::Device;
use crate::stream::StreamParams;

/// Builds a [`StreamParams`] with sensible defaults, overridable field by
/// field. Mirrors the fixture-builder pattern used throughout this
/// workspace's other crates.
pub struct StreamParamsBuilder {
    params: StreamParams,
}

impl Default for StreamParamsBuilder {
    fn default() -> Self {
        Self {
            params: StreamParams {
                device_path: "/dev/video0".into(),
                stream_name: "Cam".into(),
                resolution: "1920x1080".into(),
                fps: 30,
                raw_input: false,
                groups: None,
            },
        }
    }
}

impl StreamParamsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn device_path(mut self, device_path: impl Into<SmolStr>) -> Self {
        self.params.device_path = device_path.into();
        self
    }

    pub fn stream_name(mut self, stream_name: impl Into<SmolStr>) -> Self {
        self.params.stream_name = stream_name.into();
        self
    }

    pub fn resolution(mut self, resolution: impl Into<SmolStr>) -> Self {
        self.params.resolution = resolution.into();
        self
    }

    pub fn fps(mut self, fps: u32) -> Self {
        self.params.fps = fps;
        self
    }

    pub fn raw_input(mut self, raw_input: bool) -> Self {
        self.params.raw_input = raw_input;
        self
    }

    pub fn groups(mut self, groups: impl Into<SmolStr>) -> Self {
        self.params.groups = Some(groups.into());
        self
    }

    pub fn build(self) -> StreamParams {
        self.params
    }
}

/// Builds a [`Device`] fixture, defaulting to a single stand-in webcam.
pub fn fake_device(path: &str, index: u32) -> Device {
    Device {
        path: path.into(),
        name: format!("Fake Webcam {index}").into(),
        index,
        driver: "uvcvideo".into(),
        card: format!("Fake Webcam {index}").into(),
    }
}

/// Builds `count` distinct fake devices, `/dev/video0` through
/// `/dev/video{count-1}`.
pub fn fake_devices(count: u32) -> Vec<Device> {
    (0..count)
        .map(|i| fake_device(&format!("/dev/video{i}"), i))
        .collect()
}
