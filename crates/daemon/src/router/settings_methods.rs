// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Exostream Contributors

//! `settings.*` handlers (§4.F.1), modeled on the original
//! `SettingsManager`/`_handle_settings_*` pair: "current settings" is
//! whichever stream is active, or the last-known-good config when idle.
//!
//! This workspace generalizes the original single-stream daemon to up to
//! [`N_MAX`] concurrent streams (SPEC_FULL.md §10.E). When no `device` is
//! named in the request and more than one stream is active, the
//! lowest-sorting device path is treated as "current" — the original never
//! had to make this choice because it only ever ran one stream.

use exostream_core::{
    validate_fps, validate_resolution, validate_stream_name, DomainError, LastConfig,
    COMMON_FPS, COMMON_RESOLUTIONS, INPUT_FORMATS,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use smol_str::SmolStr;

use super::RouterCtx;
use crate::supervisor::RestartParams;

const DEFAULT_STREAM_NAME: &str = "exostream";

/// Wire shape for `settings.get`'s result and the `settings` field of
/// `settings.update`'s result; mirrors the original `SettingsInfo`.
#[derive(Debug, Clone, Serialize)]
struct SettingsView {
    device: SmolStr,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<SmolStr>,
    resolution: SmolStr,
    fps: u32,
    raw_input: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    groups: Option<SmolStr>,
    streaming: bool,
}

/// Picks the device that "current settings" refers to absent an explicit
/// `device` param: the first active stream by sorted device path, or
/// `None` if nothing is streaming.
fn current_device(ctx: &RouterCtx) -> Option<SmolStr> {
    ctx.supervisor.list_streams().into_iter().map(|s| s.device).next()
}

fn current_settings(ctx: &RouterCtx, device: Option<&str>) -> SettingsView {
    let target = device.map(SmolStr::from).or_else(|| current_device(ctx));

    if let Some(target) = target {
        if let Some(snapshot) = ctx.store.streaming_info(&target) {
            return SettingsView {
                device: snapshot.device,
                name: Some(snapshot.stream_name),
                resolution: snapshot.resolution,
                fps: snapshot.fps,
                raw_input: snapshot.raw_input,
                groups: snapshot.groups,
                streaming: true,
            };
        }
    }

    let last_config = ctx.store.last_config();
    SettingsView {
        device: last_config.device,
        name: None,
        resolution: last_config.resolution,
        fps: last_config.fps,
        raw_input: last_config.raw_input,
        groups: None,
        streaming: false,
    }
}

pub(super) fn get(ctx: &RouterCtx) -> Value {
    serde_json::to_value(current_settings(ctx, None)).expect("SettingsView always serializes")
}

#[derive(Serialize)]
struct AvailableOptions {
    devices: Vec<exostream_core::DeviceView>,
    resolutions: &'static [&'static str],
    fps_options: &'static [u32],
    input_formats: &'static [&'static str],
}

pub(super) fn get_available(ctx: &RouterCtx) -> Value {
    let options = AvailableOptions {
        devices: ctx.supervisor.list_devices(),
        resolutions: COMMON_RESOLUTIONS,
        fps_options: COMMON_FPS,
        input_formats: INPUT_FORMATS,
    };
    serde_json::to_value(options).expect("AvailableOptions always serializes")
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct SettingsUpdateParams {
    #[serde(default)]
    device: Option<SmolStr>,
    #[serde(default)]
    name: Option<SmolStr>,
    #[serde(default)]
    resolution: Option<SmolStr>,
    #[serde(default)]
    fps: Option<u32>,
    #[serde(default)]
    raw_input: Option<bool>,
    #[serde(default)]
    groups: Option<SmolStr>,
    #[serde(default)]
    restart_if_streaming: bool,
}

fn merge(baseline: &SettingsView, params: &SettingsUpdateParams) -> SettingsView {
    SettingsView {
        device: params.device.clone().unwrap_or_else(|| baseline.device.clone()),
        name: params.name.clone().or_else(|| baseline.name.clone()),
        resolution: params.resolution.clone().unwrap_or_else(|| baseline.resolution.clone()),
        fps: params.fps.unwrap_or(baseline.fps),
        raw_input: params.raw_input.unwrap_or(baseline.raw_input),
        groups: params.groups.clone().or_else(|| baseline.groups.clone()),
        streaming: baseline.streaming,
    }
}

#[derive(Serialize)]
struct UpdateResult {
    status: &'static str,
    settings: SettingsView,
    #[serde(skip_serializing_if = "Option::is_none")]
    stream_info: Option<crate::supervisor::RestartResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'static str>,
}

pub(super) async fn update(ctx: &RouterCtx, params: SettingsUpdateParams) -> Result<Value, DomainError> {
    if let Some(device) = &params.device {
        let known = ctx.supervisor.list_devices().into_iter().any(|d| d.path == *device);
        if !known {
            return Err(DomainError::DeviceNotFound {
                requested: device.to_string(),
                available: ctx.supervisor.list_devices().into_iter().map(|d| d.path.to_string()).collect(),
            });
        }
    }
    if let Some(name) = &params.name {
        validate_stream_name(name)?;
    }

    let baseline = current_settings(ctx, params.device.as_deref());
    let merged = merge(&baseline, &params);
    validate_resolution(&merged.resolution)?;
    validate_fps(merged.fps)?;

    let was_streaming = baseline.streaming;
    let target_device = merged.device.clone();

    if was_streaming && params.restart_if_streaming {
        let restart_params = RestartParams {
            stream_name: Some(merged.name.clone().unwrap_or_else(|| DEFAULT_STREAM_NAME.into())),
            resolution: Some(merged.resolution.clone()),
            fps: Some(merged.fps),
            raw_input: Some(merged.raw_input),
            groups: merged.groups.clone(),
        };
        let restart_result = ctx.supervisor.restart_stream(&target_device, restart_params).await?;
        let settings = SettingsView {
            device: restart_result.new_settings.device_path.clone(),
            name: Some(restart_result.new_settings.stream_name.clone()),
            resolution: restart_result.new_settings.resolution.clone(),
            fps: restart_result.new_settings.fps,
            raw_input: restart_result.new_settings.raw_input,
            groups: restart_result.new_settings.groups.clone(),
            streaming: true,
        };
        return Ok(serde_json::to_value(UpdateResult {
            status: "updated_and_restarted",
            settings,
            stream_info: Some(restart_result),
            message: None,
        })
        .expect("UpdateResult always serializes"));
    }

    ctx.store.update_last_config(LastConfig {
        device: merged.device.clone(),
        resolution: merged.resolution.clone(),
        fps: merged.fps,
        raw_input: merged.raw_input,
    });

    let (status, message) = if was_streaming {
        ("saved_for_next_start", Some("Settings will be applied when stream is restarted"))
    } else {
        ("updated", None)
    };

    Ok(serde_json::to_value(UpdateResult { status, settings: merged, stream_info: None, message })
        .expect("UpdateResult always serializes"))
}
