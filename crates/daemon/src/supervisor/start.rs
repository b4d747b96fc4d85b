// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Exostream Contributors

use chrono::Utc;
use exostream_core::{
    validate_fps, validate_resolution, validate_stream_name, ActiveStream, DomainError,
    StreamParams, StreamState, ValidatedResolution, VideoParams, ENCODER_GRACE_WINDOW, N_MAX,
};

use super::{StartResult, StreamSupervisor};
use crate::encoder;

impl StreamSupervisor {
    /// Start algorithm (§4.D.2).
    pub async fn start_stream(&self, params: StreamParams) -> Result<StartResult, DomainError> {
        {
            let table = self.table.lock();
            if table.contains_key(&params.device_path) {
                return Err(DomainError::StreamAlreadyRunning {
                    device: params.device_path.to_string(),
                });
            }
            if table.len() >= N_MAX {
                return Err(DomainError::StreamAlreadyRunning {
                    device: params.device_path.to_string(),
                });
            }
        }

        let devices = (self.device_probe)();
        if devices.is_empty() {
            return Err(DomainError::DeviceNotFound {
                requested: params.device_path.to_string(),
                available: Vec::new(),
            });
        }
        if !devices.iter().any(|d| d.path == params.device_path) {
            return Err(DomainError::DeviceNotFound {
                requested: params.device_path.to_string(),
                available: devices.iter().map(|d| d.path.to_string()).collect(),
            });
        }

        let resolution = validate_resolution(&params.resolution)?;
        validate_fps(params.fps)?;
        validate_stream_name(&params.stream_name)?;

        let device_key = params.device_path.clone();
        {
            let mut table = self.table.lock();
            table.insert(device_key.clone(), ActiveStream::new(params.clone(), Utc::now()));
        }

        let table_for_errors = std::sync::Arc::clone(&self.table);
        let err_device = device_key.clone();
        let on_error = move |line: String| {
            let mut table = table_for_errors.lock();
            if let Some(row) = table.get_mut(&err_device) {
                row.push_error(line);
            }
        };

        let video = video_params(&resolution, params.fps);
        let spawned = encoder::spawn(&self.encoder_binary, video, &params, on_error);
        let handle = match spawned {
            Ok(handle) => handle,
            Err(err) => {
                self.table.lock().remove(&device_key);
                return Err(err);
            }
        };
        let pid = handle.pid();
        self.handles.lock().insert(device_key.clone(), handle);

        tokio::time::sleep(ENCODER_GRACE_WINDOW).await;

        let alive = {
            let mut handles = self.handles.lock();
            handles.get_mut(&device_key).map(|h| h.is_alive()).unwrap_or(false)
        };
        if !alive {
            self.handles.lock().remove(&device_key);
            self.table.lock().remove(&device_key);
            return Err(DomainError::FfmpegError {
                detail: format!("encoder for {device_key} exited immediately after start"),
            });
        }

        {
            let mut table = self.table.lock();
            if let Some(row) = table.get_mut(&device_key) {
                row.state = StreamState::Running;
                row.child_pid = pid;
            }
        }
        self.store.set_stream_active(&params, pid);

        Ok(StartResult {
            status: "started",
            device: params.device_path,
            stream_name: params.stream_name,
            resolution: params.resolution,
            fps: params.fps,
            pid,
        })
    }
}

pub(super) fn video_params(resolution: &ValidatedResolution, fps: u32) -> VideoParams {
    VideoParams {
        width: resolution.width,
        height: resolution.height,
        fps,
        bitrate_kbps: None,
        keyframe_interval: None,
    }
}
