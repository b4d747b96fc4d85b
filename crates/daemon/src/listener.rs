// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Exostream Contributors

//! Local Listener (§4.G) and Network Listener (§4.H).
//!
//! Both expose the exact same [`crate::router::dispatch`] entry point;
//! only the transport differs. Each accepts in a loop with a 1-second
//! accept timeout so shutdown is observed promptly instead of blocking
//! forever inside `accept()`, and hands every connection to its own
//! spawned task so one slow or misbehaving peer never stalls another.

use std::net::IpAddr;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use socket2::{Domain, Protocol, Socket, Type};
use tokio::io::{AsyncRead, AsyncWrite, BufReader};
use tokio::net::{TcpListener, TcpStream, UnixListener, UnixStream};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use exostream_wire::{read_request, write_response, ProtocolError, Response};

use crate::error::DaemonError;
use crate::router::{self, RouterCtx};

/// Bound on one `accept()` call so the loop can re-check `shutdown`
/// without blocking indefinitely (§4.G/§4.H).
const ACCEPT_POLL: Duration = Duration::from_secs(1);

/// Binds the local stream socket (G): creates the parent directory if
/// absent, removes a stale socket left behind by a previous crash, and
/// chmods the bound socket to owner+group RW (`0660`). Bind failures are
/// fatal startup errors (§6 exit code 1), so this is split from
/// [`serve_local`] and called synchronously from `Daemon::start`.
pub fn bind_local(path: &Path) -> Result<UnixListener, DaemonError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| DaemonError::StateDirCreate {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    if path.exists() {
        let _ = std::fs::remove_file(path);
    }

    let listener = UnixListener::bind(path).map_err(|source| DaemonError::LocalBindFailed {
        path: path.to_path_buf(),
        source,
    })?;
    if let Err(err) = std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o660)) {
        warn!(path = %path.display(), error = %err, "failed to chmod local socket");
    }
    info!(path = %path.display(), "local listener bound");
    Ok(listener)
}

/// Binds the TCP control listener (H) with `SO_REUSEADDR` so a daemon
/// restart doesn't block on time-wait from the previous process's bound
/// socket. Split from [`serve_network`] for the same reason as
/// [`bind_local`].
pub fn bind_network(host: IpAddr, port: u16) -> Result<TcpListener, DaemonError> {
    let addr = std::net::SocketAddr::new(host, port);
    let listener = bind_tcp_reuseaddr(addr).map_err(|source| DaemonError::NetworkBindFailed {
        addr: addr.to_string(),
        source,
    })?;
    info!(%addr, "network listener bound");
    Ok(listener)
}

/// Serves the local stream-socket listener (G) until `shutdown` is
/// cancelled, then removes the socket file.
pub async fn serve_local(
    listener: UnixListener,
    path: &Path,
    ctx: Arc<RouterCtx>,
    request_timeout: Duration,
    shutdown: CancellationToken,
) {
    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            accepted = tokio::time::timeout(ACCEPT_POLL, listener.accept()) => {
                match accepted {
                    Err(_) => continue, // accept timeout, re-check shutdown
                    Ok(Err(err)) => error!(error = %err, "local accept error"),
                    Ok(Ok((stream, _addr))) => {
                        spawn_unix_connection(stream, Arc::clone(&ctx), request_timeout);
                    }
                }
            }
        }
    }

    debug!(path = %path.display(), "local listener stopping");
    let _ = std::fs::remove_file(path);
}

/// Serves the TCP control listener (H) until `shutdown` is cancelled.
pub async fn serve_network(
    listener: TcpListener,
    ctx: Arc<RouterCtx>,
    request_timeout: Duration,
    shutdown: CancellationToken,
) {
    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            accepted = tokio::time::timeout(ACCEPT_POLL, listener.accept()) => {
                match accepted {
                    Err(_) => continue, // accept timeout, re-check shutdown
                    Ok(Err(err)) => error!(error = %err, "network accept error"),
                    Ok(Ok((stream, peer))) => {
                        debug!(%peer, "network connection accepted");
                        spawn_tcp_connection(stream, Arc::clone(&ctx), request_timeout);
                    }
                }
            }
        }
    }

    debug!("network listener stopping");
}

fn bind_tcp_reuseaddr(addr: std::net::SocketAddr) -> std::io::Result<TcpListener> {
    let domain = if addr.is_ipv4() { Domain::IPV4 } else { Domain::IPV6 };
    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;
    socket.set_reuse_address(true)?;
    socket.set_nonblocking(true)?;
    socket.bind(&addr.into())?;
    socket.listen(128)?;
    TcpListener::from_std(socket.into())
}

fn spawn_unix_connection(stream: UnixStream, ctx: Arc<RouterCtx>, request_timeout: Duration) {
    tokio::spawn(async move {
        let (reader, writer) = stream.into_split();
        handle_connection(reader, writer, request_timeout, &ctx).await;
    });
}

fn spawn_tcp_connection(stream: TcpStream, ctx: Arc<RouterCtx>, request_timeout: Duration) {
    tokio::spawn(async move {
        let (reader, writer) = stream.into_split();
        handle_connection(reader, writer, request_timeout, &ctx).await;
    });
}

/// Handles exactly one request/response cycle then closes the connection
/// (§4.E): read until newline (tolerating chunked arrivals), dispatch to
/// the router, write the response, done. A framing failure still produces
/// a best-effort error response rather than silently dropping the peer.
async fn handle_connection<R, W>(reader: R, mut writer: W, request_timeout: Duration, ctx: &RouterCtx)
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut reader = BufReader::new(reader);
    let request = match read_request(&mut reader, request_timeout).await {
        Ok(request) => request,
        Err(ProtocolError::ConnectionClosed) | Err(ProtocolError::Timeout) => return,
        Err(err) => {
            let response = Response::error(err.rpc_code(), err.to_string(), None, None);
            let _ = write_response(&mut writer, &response).await;
            return;
        }
    };

    let response = router::dispatch(ctx, request).await;
    if let Err(err) = write_response(&mut writer, &response).await {
        warn!(error = %err, "failed to write response");
    }
}
