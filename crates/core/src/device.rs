// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Exostream Contributors

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// Identity of a capture source observed by the OS, as returned by the
/// device probe. Immutable for the lifetime of one probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    /// Stable string identifier, e.g. `/dev/video0`.
    pub path: SmolStr,
    /// Human-readable card name, e.g. `HD Pro Webcam C930e`.
    pub name: SmolStr,
    /// Numeric index extracted from the device path.
    pub index: u32,
    /// Kernel driver name, e.g. `uvcvideo`.
    pub driver: SmolStr,
    /// Card identifier as reported by the driver.
    pub card: SmolStr,
}

/// A [`Device`] augmented with whether the stream supervisor currently has
/// an active row for it. Returned by `devices.list` and
/// `stream_supervisor.list_devices`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceView {
    pub path: SmolStr,
    pub name: SmolStr,
    pub index: u32,
    pub driver: SmolStr,
    pub card: SmolStr,
    pub in_use: bool,
}

impl DeviceView {
    pub fn from_device(device: &Device, in_use: bool) -> Self {
        Self {
            path: device.path.clone(),
            name: device.name.clone(),
            index: device.index,
            driver: device.driver.clone(),
            card: device.card.clone(),
            in_use,
        }
    }
}
