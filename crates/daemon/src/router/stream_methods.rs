// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Exostream Contributors

use exostream_core::{DomainError, StreamParams, N_MAX};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use smol_str::SmolStr;

use super::RouterCtx;

#[derive(Debug, Deserialize)]
pub(super) struct StreamStartParams {
    device: SmolStr,
    name: SmolStr,
    resolution: SmolStr,
    fps: u32,
    #[serde(default)]
    raw_input: bool,
    #[serde(default)]
    groups: Option<SmolStr>,
}

impl From<StreamStartParams> for StreamParams {
    fn from(p: StreamStartParams) -> Self {
        StreamParams {
            device_path: p.device,
            stream_name: p.name,
            resolution: p.resolution,
            fps: p.fps,
            raw_input: p.raw_input,
            groups: p.groups,
        }
    }
}

pub(super) async fn start(ctx: &RouterCtx, params: StreamStartParams) -> Result<Value, DomainError> {
    let result = ctx.supervisor.start_stream(params.into()).await?;
    Ok(serde_json::to_value(result).expect("StartResult always serializes"))
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct DeviceParams {
    #[serde(default)]
    device: Option<SmolStr>,
}

pub(super) async fn stop(ctx: &RouterCtx, params: DeviceParams) -> Result<Value, DomainError> {
    let result = ctx.supervisor.stop_stream(params.device.as_deref()).await?;
    Ok(serde_json::to_value(result).expect("StopResult always serializes"))
}

#[derive(Serialize)]
struct UntrackedStatus {
    streaming: bool,
    device: SmolStr,
}

#[derive(Serialize)]
struct AggregateStatus {
    streaming: bool,
    stream_count: usize,
    max_streams: usize,
    streams: Vec<exostream_core::StreamStatus>,
}

pub(super) fn status(ctx: &RouterCtx, params: DeviceParams) -> Value {
    match params.device {
        Some(device) => match ctx.supervisor.stream_status(&device) {
            Some(status) => serde_json::to_value(status).expect("StreamStatus always serializes"),
            None => serde_json::to_value(UntrackedStatus { streaming: false, device })
                .expect("UntrackedStatus always serializes"),
        },
        None => {
            let streams = ctx.supervisor.list_streams();
            let aggregate = AggregateStatus {
                streaming: !streams.is_empty(),
                stream_count: streams.len(),
                max_streams: N_MAX,
                streams,
            };
            serde_json::to_value(aggregate).expect("AggregateStatus always serializes")
        }
    }
}
