// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Exostream Contributors

use thiserror::Error;

/// Closed set of domain errors the stream supervisor and settings handlers
/// can raise. The RPC router (`exostream-daemon::listener::router`) maps
/// each variant to the bit-exact wire code from the error code table; no
/// other place in the codebase is allowed to invent a new code.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("stream already running on {device}")]
    StreamAlreadyRunning { device: String },

    #[error("stream not running on {device}")]
    StreamNotRunning { device: String },

    #[error("device not found: {requested} (available: {available:?})")]
    DeviceNotFound {
        requested: String,
        available: Vec<String>,
    },

    #[error("invalid configuration: {reason}")]
    InvalidConfiguration { reason: String },

    #[error("encoder binary not found: {path}")]
    EncoderMissing { path: String },

    #[error("encoder exited immediately on start: {detail}")]
    EncoderStartFailed { detail: String },

    #[error("encoder subprocess failed: {detail}")]
    FfmpegError { detail: String },
}

impl DomainError {
    /// Bit-exact JSON-RPC error code from the specification's error table.
    pub fn code(&self) -> i32 {
        match self {
            DomainError::StreamAlreadyRunning { .. } => -32000,
            DomainError::StreamNotRunning { .. } => -32001,
            DomainError::DeviceNotFound { .. } => -32002,
            DomainError::InvalidConfiguration { .. } => -32004,
            DomainError::EncoderMissing { .. }
            | DomainError::EncoderStartFailed { .. }
            | DomainError::FfmpegError { .. } => -32005,
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
