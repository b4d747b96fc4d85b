// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Exostream Contributors

//! Encoder Driver (§4.C): one instance per active stream.
//!
//! Owns exactly one child process: builds its command line from
//! [`VideoParams`]/[`StreamParams`], spawns it, relays stderr into a
//! classified log + error-ring callback, and exposes graceful-then-forceful
//! [`EncoderHandle::stop`].

mod classify;
mod command;

pub use classify::{classify_stderr_line, LineClass};
pub use command::build_command_args;

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use exostream_core::{DomainError, StreamParams, VideoParams};
use nix::sys::signal::{self, Signal};
use nix::unistd::Pid;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, Command};
use tracing::{debug, error, info, warn};

/// Default encoder binary name, resolved via `$PATH` like any other
/// subprocess. Overridable so tests can substitute a fake command.
pub const DEFAULT_ENCODER_BINARY: &str = "ffmpeg";

/// A spawned encoder child plus the background task draining its stderr.
///
/// The stderr task is detached logically (its `JoinHandle` is dropped) once
/// spawned; it runs until the pipe closes, which happens exactly when the
/// child exits, so nothing needs to join it explicitly during a normal stop.
pub struct EncoderHandle {
    child: Child,
}

impl EncoderHandle {
    /// PID of the underlying child, if it hasn't already been reaped.
    pub fn pid(&self) -> Option<u32> {
        self.child.id()
    }

    /// Non-blocking liveness check: `Ok(None)` means still running.
    pub fn is_alive(&mut self) -> bool {
        matches!(self.child.try_wait(), Ok(None))
    }

    /// Graceful-then-forceful stop (§4.C): SIGINT, wait up to `timeout`,
    /// then SIGKILL if still alive. Idempotent — stopping an already-dead
    /// child just reaps it.
    pub async fn stop(mut self, timeout: Duration) {
        let Some(pid) = self.child.id() else {
            return;
        };
        let nix_pid = Pid::from_raw(pid as i32);

        if signal::kill(nix_pid, Signal::SIGINT).is_err() {
            // Process is already gone; fall through to wait/reap below.
        }

        match tokio::time::timeout(timeout, self.child.wait()).await {
            Ok(Ok(status)) => {
                debug!(pid, ?status, "encoder exited after SIGINT");
                return;
            }
            Ok(Err(err)) => {
                warn!(pid, error = %err, "error waiting on encoder after SIGINT");
                return;
            }
            Err(_) => {
                warn!(pid, "encoder did not exit within grace window, sending SIGKILL");
            }
        }

        let _ = signal::kill(nix_pid, Signal::SIGKILL);
        if let Err(err) = self.child.wait().await {
            warn!(pid, error = %err, "error waiting on encoder after SIGKILL");
        }
    }
}

/// Spawns an encoder child for one stream and starts its stderr-draining
/// task. `on_error` is invoked (off the stderr task) for every line
/// classified as an error.
///
/// Returns immediately after a successful spawn; callers that need the
/// grace-window liveness check (§4.D.2 step 5) perform it themselves by
/// sleeping [`exostream_core::ENCODER_GRACE_WINDOW`] and calling
/// [`EncoderHandle::is_alive`].
pub fn spawn(
    binary: &Path,
    video: VideoParams,
    params: &StreamParams,
    on_error: impl Fn(String) + Send + Sync + 'static,
) -> Result<EncoderHandle, DomainError> {
    let args = build_command_args(video, params);
    info!(binary = %binary.display(), device = %params.device_path, args = ?args, "spawning encoder");

    let mut child = Command::new(binary)
        .args(&args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                DomainError::EncoderMissing {
                    path: binary.display().to_string(),
                }
            } else {
                DomainError::EncoderStartFailed {
                    detail: source.to_string(),
                }
            }
        })?;

    let stderr = child.stderr.take().expect("encoder spawned with piped stderr");
    let device = params.device_path.clone();
    tokio::spawn(async move {
        let mut lines = BufReader::new(stderr).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => match classify_stderr_line(&line) {
                    LineClass::Error => {
                        error!(device = %device, line = %line, "encoder stderr");
                        on_error(line);
                    }
                    LineClass::Warning => warn!(device = %device, line = %line, "encoder stderr"),
                    LineClass::Progress => debug!(device = %device, line = %line, "encoder stderr"),
                    LineClass::Info => debug!(device = %device, line = %line, "encoder stderr"),
                },
                Ok(None) => break,
                Err(err) => {
                    warn!(device = %device, error = %err, "error reading encoder stderr");
                    break;
                }
            }
        }
    });

    Ok(EncoderHandle { child })
}

/// Resolves the configured encoder binary, falling back to
/// [`DEFAULT_ENCODER_BINARY`].
pub fn resolve_binary(configured: Option<&str>) -> PathBuf {
    PathBuf::from(configured.unwrap_or(DEFAULT_ENCODER_BINARY))
}
