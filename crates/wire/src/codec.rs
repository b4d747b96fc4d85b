// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Exostream Contributors

use std::time::Duration;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::ProtocolError;
use crate::request::Request;
use crate::response::Response;

/// Recommended maximum request size (§4.E): 64 KiB.
pub const MAX_REQUEST_SIZE: usize = 64 * 1024;

/// Reads one newline-terminated JSON request frame, with a bounded wait.
///
/// Readers are expected to tolerate chunked arrivals (§4.G/§4.H): this
/// function buffers across calls to the underlying reader until a `\n` is
/// seen. As a robustness fallback for peers that close the connection
/// immediately after writing one complete object without a trailing
/// newline, whatever bytes were read up to EOF are still handed to the
/// JSON parser rather than treated as a truncated frame.
pub async fn read_request<R>(
    reader: &mut R,
    timeout: Duration,
) -> Result<Request, ProtocolError>
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::new();
    let read = tokio::time::timeout(timeout, reader.read_until(b'\n', &mut buf))
        .await
        .map_err(|_| ProtocolError::Timeout)??;

    if read == 0 {
        return Err(ProtocolError::ConnectionClosed);
    }
    if buf.len() > MAX_REQUEST_SIZE {
        return Err(ProtocolError::FrameTooLarge {
            size: buf.len(),
            max: MAX_REQUEST_SIZE,
        });
    }

    while matches!(buf.last(), Some(b'\n') | Some(b'\r')) {
        buf.pop();
    }

    // Parse to a generic `Value` first so a JSON syntax error (-32700) is
    // distinguishable from syntactically-valid JSON that doesn't conform to
    // the request shape, e.g. a bare array or an object missing `method`
    // (-32600, §4.E).
    let value: serde_json::Value = serde_json::from_slice(&buf)?;
    let request: Request =
        serde_json::from_value(value).map_err(ProtocolError::InvalidRequest)?;
    Ok(request)
}

/// Writes one response frame terminated by a trailing newline and flushes
/// the writer so the peer observes the full frame promptly.
pub async fn write_response<W>(writer: &mut W, response: &Response) -> Result<(), ProtocolError>
where
    W: AsyncWrite + Unpin,
{
    let mut bytes = serde_json::to_vec(response)?;
    bytes.push(b'\n');
    writer.write_all(&bytes).await?;
    writer.flush().await?;
    Ok(())
}
