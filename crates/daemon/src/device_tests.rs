// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Exostream Contributors

use super::*;
use std::os::unix::fs::symlink;

#[test]
fn empty_dev_dir_yields_no_devices() {
    let dev = tempfile::tempdir().expect("tempdir");
    let sysfs = tempfile::tempdir().expect("tempdir");
    let devices = list_devices_in(dev.path().to_str().expect("utf8"), sysfs.path().to_str().expect("utf8"));
    assert!(devices.is_empty());
}

#[test]
fn missing_dev_dir_yields_no_devices_without_panicking() {
    let devices = list_devices_in("/does/not/exist", "/does/not/exist");
    assert!(devices.is_empty());
}

#[test]
fn devices_are_sorted_by_index_and_read_sysfs_name() {
    let dev = tempfile::tempdir().expect("tempdir");
    let sysfs = tempfile::tempdir().expect("tempdir");

    for (name, index) in [("video1", 1u32), ("video0", 0u32)] {
        fs::write(dev.path().join(name), []).expect("write device node");
        let node = sysfs.path().join(name);
        fs::create_dir_all(&node).expect("mkdir sysfs node");
        fs::write(node.join("name"), format!("Fake Cam {index}\n")).expect("write name");
    }
    // Non-video entries must be ignored.
    fs::write(dev.path().join("null"), []).expect("write unrelated node");

    let devices = list_devices_in(dev.path().to_str().expect("utf8"), sysfs.path().to_str().expect("utf8"));

    assert_eq!(devices.len(), 2);
    assert_eq!(devices[0].index, 0);
    assert_eq!(devices[0].name, "Fake Cam 0");
    assert_eq!(devices[1].index, 1);
}

#[test]
fn driver_is_resolved_from_the_device_driver_symlink() {
    let dev = tempfile::tempdir().expect("tempdir");
    let sysfs = tempfile::tempdir().expect("tempdir");

    fs::write(dev.path().join("video0"), []).expect("write device node");
    let node = sysfs.path().join("video0");
    fs::create_dir_all(node.join("device")).expect("mkdir device dir");
    fs::write(node.join("name"), "Fake Cam\n").expect("write name");
    symlink("../../../drivers/uvcvideo", node.join("device/driver")).expect("symlink driver");

    let devices = list_devices_in(dev.path().to_str().expect("utf8"), sysfs.path().to_str().expect("utf8"));

    assert_eq!(devices.len(), 1);
    assert_eq!(devices[0].driver, "uvcvideo");
}

#[test]
fn missing_sysfs_name_falls_back_to_generated_name() {
    let dev = tempfile::tempdir().expect("tempdir");
    let sysfs = tempfile::tempdir().expect("tempdir");
    fs::write(dev.path().join("video3"), []).expect("write device node");

    let devices = list_devices_in(dev.path().to_str().expect("utf8"), sysfs.path().to_str().expect("utf8"));

    assert_eq!(devices.len(), 1);
    assert_eq!(devices[0].name, "Video Device 3");
    assert_eq!(devices[0].driver, "");
}
