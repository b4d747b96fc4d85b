// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Exostream Contributors

use thiserror::Error;

/// Failures from reading or writing the on-disk state document.
///
/// Per §4.A / §7, every variant here is a *transient I/O* concern: callers
/// log and swallow it rather than propagate it to an RPC client. The type
/// exists so the store's internals stay `?`-friendly without `unwrap`.
#[derive(Debug, Error)]
pub enum StateStoreError {
    #[error("failed to create state directory {path}: {source}")]
    CreateDir {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write state file {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to rename temp file into place at {path}: {source}")]
    Rename {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read state file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse state file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}
