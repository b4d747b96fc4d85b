// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Exostream Contributors

//! Health check (§4.D.7): walks the table under the lock, copies
//! references, then polls each child's liveness outside the lock so the
//! stream-table lock is never held across child I/O (§4.D.6).

use exostream_core::StreamState;
use serde::Serialize;
use smol_str::SmolStr;

use super::StreamSupervisor;

/// Result of `Health()` / `daemon.status`'s embedded `health` field.
#[derive(Debug, Clone, Serialize)]
pub struct HealthView {
    pub healthy: bool,
    pub stream_count: usize,
    pub issues: Vec<String>,
}

impl StreamSupervisor {
    /// Walks the stream table for issues: a stream in `Error`, a `Running`
    /// stream whose child has already exited, or a non-empty error ring
    /// (surfacing only the most recent line).
    pub async fn health(&self) -> HealthView {
        let rows: Vec<(SmolStr, StreamState, Option<String>)> = {
            let table = self.table.lock();
            table
                .iter()
                .map(|(device, row)| (device.clone(), row.state, row.last_error().map(str::to_string)))
                .collect()
        };

        let mut issues = Vec::new();
        for (device, state, last_error) in &rows {
            match state {
                StreamState::Error => {
                    issues.push(format!("{device}: stream in error state"));
                }
                StreamState::Running => {
                    let alive = {
                        let mut handles = self.handles.lock();
                        handles.get_mut(device.as_str()).map(|h| h.is_alive())
                    };
                    match alive {
                        Some(true) => {}
                        Some(false) | None => {
                            issues.push(format!("{device}: encoder process died unexpectedly"));
                        }
                    }
                }
                StreamState::Starting | StreamState::Stopping => {}
            }
            if let Some(line) = last_error {
                issues.push(format!("{device}: {line}"));
            }
        }

        HealthView {
            healthy: issues.is_empty(),
            stream_count: rows.len(),
            issues,
        }
    }
}
