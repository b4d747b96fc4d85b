// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Exostream Contributors

//! Device Probe (§4.B): a read-only scan of the V4L2 device namespace.
//!
//! Mirrors the original `WebcamManager.detect_devices()` — glob `/dev/video*`,
//! sort by index, read what sysfs will give up for free. Never raises: a
//! platform with no capture devices (or no `/dev` entries at all) just
//! yields an empty list.

use std::fs;
use std::path::Path;

use exostream_core::Device;
use tracing::debug;

const DEV_DIR: &str = "/dev";
const SYSFS_VIDEO4LINUX_DIR: &str = "/sys/class/video4linux";

/// Scans for V4L2 capture devices, sorted by numeric index.
pub fn list_devices() -> Vec<Device> {
    list_devices_in(DEV_DIR, SYSFS_VIDEO4LINUX_DIR)
}

fn list_devices_in(dev_dir: &str, sysfs_dir: &str) -> Vec<Device> {
    let entries = match fs::read_dir(dev_dir) {
        Ok(entries) => entries,
        Err(err) => {
            debug!(dir = dev_dir, error = %err, "failed to read device directory");
            return Vec::new();
        }
    };

    let mut devices: Vec<Device> = entries
        .filter_map(Result::ok)
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter_map(|name| probe_one(dev_dir, sysfs_dir, &name))
        .collect();

    devices.sort_by_key(|d| d.index);
    devices
}

fn probe_one(dev_dir: &str, sysfs_dir: &str, file_name: &str) -> Option<Device> {
    let index: u32 = file_name.strip_prefix("video")?.parse().ok()?;
    let path = format!("{dev_dir}/{file_name}");

    let sysfs_node = Path::new(sysfs_dir).join(file_name);
    let name = read_trimmed(&sysfs_node.join("name")).unwrap_or_else(|| format!("Video Device {index}"));
    let driver = read_driver_name(&sysfs_node).unwrap_or_default();

    Some(Device {
        path: path.into(),
        name: name.clone().into(),
        index,
        driver: driver.into(),
        card: name.into(),
    })
}

fn read_trimmed(path: &Path) -> Option<String> {
    fs::read_to_string(path).ok().map(|s| s.trim().to_string())
}

/// Resolves the kernel driver name via the `device/driver` symlink that
/// V4L2 devices expose under sysfs, e.g.
/// `/sys/class/video4linux/video0/device/driver -> .../drivers/uvcvideo`.
fn read_driver_name(sysfs_node: &Path) -> Option<String> {
    let link = fs::read_link(sysfs_node.join("device/driver")).ok()?;
    link.file_name()?.to_str().map(str::to_string)
}

#[cfg(test)]
#[path = "device_tests.rs"]
mod device_tests;
