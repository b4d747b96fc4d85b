// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Exostream Contributors

use chrono::Utc;
use exostream_core::{
    validate_fps, validate_resolution, validate_stream_name, DomainError, StreamParams,
    StreamState, RESTART_STOP_TIMEOUT,
};
use smol_str::SmolStr;

use super::{RestartResult, StreamSupervisor};

/// Partial override set for `stream.restart` / `settings.update`. Any field
/// left `None` inherits the stream's current live value (§4.D.4).
#[derive(Debug, Clone, Default)]
pub struct RestartParams {
    pub stream_name: Option<SmolStr>,
    pub resolution: Option<SmolStr>,
    pub fps: Option<u32>,
    pub raw_input: Option<bool>,
    pub groups: Option<SmolStr>,
}

impl StreamSupervisor {
    /// Restart with rollback (§4.D.4): pre-validates before touching the
    /// live stream, then swaps the encoder, rolling back to the prior
    /// configuration on failure.
    pub async fn restart_stream(
        &self,
        device: &str,
        partial: RestartParams,
    ) -> Result<RestartResult, DomainError> {
        let old_params = {
            let table = self.table.lock();
            match table.get(device) {
                Some(row) if row.state == StreamState::Running => row.params.clone(),
                _ => {
                    return Err(DomainError::StreamNotRunning {
                        device: device.to_string(),
                    })
                }
            }
        };

        let new_params = merge_params(&old_params, partial);
        validate_resolution(&new_params.resolution)?;
        validate_fps(new_params.fps)?;
        validate_stream_name(&new_params.stream_name)?;

        let t0 = Utc::now();
        self.stop_one(device, RESTART_STOP_TIMEOUT).await?;

        match self.start_stream(new_params.clone()).await {
            Ok(_) => {
                let downtime_seconds = (Utc::now() - t0).num_milliseconds().max(0) as f64 / 1000.0;
                Ok(RestartResult {
                    status: "restarted",
                    device: device.into(),
                    downtime_seconds,
                    old_settings: old_params,
                    new_settings: new_params,
                })
            }
            Err(_) => match self.start_stream(old_params.clone()).await {
                Ok(_) => Err(DomainError::FfmpegError {
                    detail: "restart failed, rolled back".into(),
                }),
                Err(_) => Err(DomainError::FfmpegError {
                    detail: "restart failed and rollback failed — manual intervention required"
                        .into(),
                }),
            },
        }
    }
}

fn merge_params(old: &StreamParams, partial: RestartParams) -> StreamParams {
    StreamParams {
        device_path: old.device_path.clone(),
        stream_name: partial.stream_name.unwrap_or_else(|| old.stream_name.clone()),
        resolution: partial.resolution.unwrap_or_else(|| old.resolution.clone()),
        fps: partial.fps.unwrap_or(old.fps),
        raw_input: partial.raw_input.unwrap_or(old.raw_input),
        groups: partial.groups.or_else(|| old.groups.clone()),
    }
}
