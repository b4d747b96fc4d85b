// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Exostream Contributors

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// Maximum number of stderr lines retained per stream's error ring.
pub const ERROR_RING_CAPACITY: usize = 10;

/// Encoding parameters carried inside a [`StreamParams`], kept separate
/// because the encoder driver consumes only this subset when building a
/// command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoParams {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    /// Informational only; not enforced by the encoder driver contract.
    pub bitrate_kbps: Option<u32>,
    pub keyframe_interval: Option<u32>,
}

/// The full set of parameters a client supplies to start or reconfigure a
/// stream. `device_path` is the stream table's unique key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamParams {
    pub device_path: SmolStr,
    pub stream_name: SmolStr,
    /// `WxH`, e.g. `1920x1080`.
    pub resolution: SmolStr,
    pub fps: u32,
    pub raw_input: bool,
    pub groups: Option<SmolStr>,
}

/// Lifecycle state of one row in the stream table (§4.D.5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamState {
    Starting,
    Running,
    Stopping,
    Error,
}

/// A row in the stream supervisor's in-memory table, keyed by `device_path`.
///
/// `encoder_handle` is deliberately not part of this type: the supervisor
/// keeps the live `EncoderDriver` handle in a side table so that
/// `ActiveStream` itself stays `Clone` and cheap to snapshot for status
/// views and persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveStream {
    pub params: StreamParams,
    pub state: StreamState,
    pub child_pid: Option<u32>,
    pub started_at: DateTime<Utc>,
    pub recent_errors: VecDeque<String>,
}

impl ActiveStream {
    pub fn new(params: StreamParams, started_at: DateTime<Utc>) -> Self {
        Self {
            params,
            state: StreamState::Starting,
            child_pid: None,
            started_at,
            recent_errors: VecDeque::with_capacity(ERROR_RING_CAPACITY),
        }
    }

    /// Appends a line to the bounded error ring, evicting the oldest entry
    /// once at capacity.
    pub fn push_error(&mut self, line: impl Into<String>) {
        if self.recent_errors.len() == ERROR_RING_CAPACITY {
            self.recent_errors.pop_front();
        }
        self.recent_errors.push_back(line.into());
    }

    pub fn last_error(&self) -> Option<&str> {
        self.recent_errors.back().map(String::as_str)
    }
}

/// Wire-facing view of one stream, returned by `stream.status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamStatus {
    pub device: SmolStr,
    pub stream_name: SmolStr,
    pub resolution: SmolStr,
    pub fps: u32,
    pub streaming: bool,
    pub pid: Option<u32>,
    pub uptime_seconds: Option<i64>,
}

impl StreamStatus {
    pub fn from_active(stream: &ActiveStream, now: DateTime<Utc>) -> Self {
        Self {
            device: stream.params.device_path.clone(),
            stream_name: stream.params.stream_name.clone(),
            resolution: stream.params.resolution.clone(),
            fps: stream.params.fps,
            streaming: stream.state == StreamState::Running,
            pid: stream.child_pid,
            uptime_seconds: Some((now - stream.started_at).num_seconds().max(0)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> StreamParams {
        StreamParams {
            device_path: "/dev/video0".into(),
            stream_name: "Cam".into(),
            resolution: "1920x1080".into(),
            fps: 30,
            raw_input: false,
            groups: None,
        }
    }

    #[test]
    fn error_ring_evicts_oldest_past_capacity() {
        let mut stream = ActiveStream::new(params(), Utc::now());
        for i in 0..ERROR_RING_CAPACITY + 3 {
            stream.push_error(format!("line {i}"));
        }
        assert_eq!(stream.recent_errors.len(), ERROR_RING_CAPACITY);
        assert_eq!(stream.last_error(), Some("line 12"));
        assert_eq!(stream.recent_errors.front().map(String::as_str), Some("line 3"));
    }

    #[test]
    fn status_view_reports_streaming_only_when_running() {
        let mut stream = ActiveStream::new(params(), Utc::now());
        let view = StreamStatus::from_active(&stream, Utc::now());
        assert!(!view.streaming);

        stream.state = StreamState::Running;
        let view = StreamStatus::from_active(&stream, Utc::now());
        assert!(view.streaming);
    }
}
