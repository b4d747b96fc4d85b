// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Exostream Contributors

use std::path::PathBuf;

use thiserror::Error;

/// Startup and transport failures that can abort the daemon process.
///
/// Domain-level failures from stream operations stay in
/// [`exostream_core::DomainError`]; this enum only covers the things that
/// can keep the daemon from coming up or force it down, mapped to exit
/// code 1 by `main`.
#[derive(Debug, Error)]
pub enum DaemonError {
    #[error("could not determine state directory (set EXOSTREAM_STATE_DIR or $HOME)")]
    NoStateDir,

    #[error("failed to create state directory {path}: {source}")]
    StateDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to bind local socket at {path}: {source}")]
    LocalBindFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to bind TCP listener on {addr}: {source}")]
    NetworkBindFailed {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to bind presence beacon socket: {0}")]
    BeaconBindFailed(#[source] std::io::Error),

    #[error("failed to bind discovery listener socket: {0}")]
    DiscoveryBindFailed(#[source] std::io::Error),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
