// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Exostream Contributors

use std::time::Duration;

use exostream_core::{DomainError, StreamState};
use serde::Serialize;
use smol_str::SmolStr;

use super::StreamSupervisor;

/// Result of `stream.stop` (§4.F.1): single-device or aggregate shape.
#[derive(Debug, Clone, Serialize)]
pub struct StopResult {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device: Option<SmolStr>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl StreamSupervisor {
    /// Stop algorithm (§4.D.3). `device = None` stops every active stream
    /// and aggregates errors without aborting.
    pub async fn stop_stream(&self, device: Option<&str>) -> Result<StopResult, DomainError> {
        match device {
            Some(device) => {
                self.stop_one(device, exostream_core::STOP_JOIN_TIMEOUT).await?;
                Ok(StopResult {
                    status: "stopped",
                    device: Some(device.into()),
                    count: None,
                    errors: Vec::new(),
                })
            }
            None => {
                let devices: Vec<SmolStr> = self.table.lock().keys().cloned().collect();
                let mut errors = Vec::new();
                let mut count = 0;
                for device in devices {
                    match self.stop_one(&device, exostream_core::STOP_JOIN_TIMEOUT).await {
                        Ok(()) => count += 1,
                        Err(err) => errors.push(format!("{device}: {err}")),
                    }
                }
                Ok(StopResult { status: "stopped", device: None, count: Some(count), errors })
            }
        }
    }

    /// Stops one row: marks it `Stopping`, releases the table lock, then
    /// drives the encoder driver's graceful-then-forceful stop outside any
    /// lock (§4.D.6).
    pub(super) async fn stop_one(&self, device: &str, timeout: Duration) -> Result<(), DomainError> {
        let present = {
            let mut table = self.table.lock();
            match table.get_mut(device) {
                Some(row) => {
                    row.state = StreamState::Stopping;
                    true
                }
                None => false,
            }
        };
        if !present {
            return Err(DomainError::StreamNotRunning {
                device: device.to_string(),
            });
        }

        let handle = self.handles.lock().remove(device);
        if let Some(handle) = handle {
            handle.stop(timeout).await;
        }

        self.table.lock().remove(device);
        self.store.set_stream_inactive(Some(device));
        Ok(())
    }
}
