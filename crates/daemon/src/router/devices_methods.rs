// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Exostream Contributors

use serde::Serialize;
use serde_json::Value;

use exostream_core::DeviceView;

use super::RouterCtx;

#[derive(Serialize)]
struct DevicesList {
    devices: Vec<DeviceView>,
}

pub(super) fn list(ctx: &RouterCtx) -> Value {
    let devices = ctx.supervisor.list_devices();
    serde_json::to_value(DevicesList { devices }).expect("DevicesList always serializes")
}
