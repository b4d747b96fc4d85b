// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Exostream Contributors

use thiserror::Error;

/// Transport-level failures from reading or writing one RPC frame.
///
/// Domain errors ([`exostream_core::DomainError`]) are a distinct axis: this
/// enum only covers framing, encoding, and connection lifecycle.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("request body was not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("request body was valid JSON but not a conforming request: {0}")]
    InvalidRequest(serde_json::Error),

    #[error("request exceeded max frame size of {max} bytes (got {size})")]
    FrameTooLarge { size: usize, max: usize },

    #[error("peer closed the connection before sending a complete request")]
    ConnectionClosed,

    #[error("timed out waiting for a request")]
    Timeout,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ProtocolError {
    /// Maps a framing failure onto the JSON-RPC error code table (§4.E).
    /// Only [`ProtocolError::Parse`] and [`ProtocolError::InvalidRequest`]
    /// have documented codes; callers treat every other variant as a
    /// connection-level event, not a response.
    pub fn rpc_code(&self) -> i32 {
        match self {
            ProtocolError::Parse(_) => -32700,
            ProtocolError::InvalidRequest(_) => -32600,
            _ => -32603,
        }
    }
}
