// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Exostream Contributors

//! Presence Beacon (§4.I): broadcasts one UDP announcement every
//! [`BROADCAST_INTERVAL`] describing this daemon's control endpoint.

use std::net::{IpAddr, Ipv4Addr, SocketAddr, ToSocketAddrs};

use chrono::Utc;
use exostream_core::{BEACON_PORT, BROADCAST_INTERVAL};
use serde::Serialize;
use smol_str::SmolStr;
use socket2::{Domain, Protocol, Socket, Type};
use tokio::net::UdpSocket;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

const BROADCAST_ADDR: &str = "255.255.255.255";
const ANNOUNCEMENT_KIND: &str = "EXOSTREAM_ANNOUNCEMENT";

#[derive(Debug, Serialize)]
struct Announcement {
    #[serde(rename = "type")]
    kind: &'static str,
    name: SmolStr,
    hostname: SmolStr,
    host: String,
    port: u16,
    version: &'static str,
    timestamp: i64,
}

/// Runs the beacon loop until `shutdown` is cancelled. `name` is the
/// publisher name advertised to peers (defaults to hostname, per §4.I);
/// `control_port` is whichever TCP port the network listener is bound to.
pub async fn run_beacon(name: SmolStr, control_port: u16, version: &'static str, shutdown: CancellationToken) {
    let socket = match bind_broadcast_socket() {
        Ok(socket) => socket,
        Err(err) => {
            warn!(error = %err, "failed to bind presence beacon socket, beacon disabled");
            return;
        }
    };
    let hostname = resolve_hostname();
    let target: SocketAddr = format!("{BROADCAST_ADDR}:{BEACON_PORT}")
        .parse()
        .expect("broadcast address and fixed port always parse");

    let mut interval = tokio::time::interval(BROADCAST_INTERVAL);
    loop {
        tokio::select! {
            _ = shutdown.cancelled() => {
                debug!("presence beacon stopping");
                return;
            }
            _ = interval.tick() => {
                send_announcement(&socket, target, &name, &hostname, control_port, version).await;
            }
        }
    }
}

async fn send_announcement(
    socket: &UdpSocket,
    target: SocketAddr,
    name: &SmolStr,
    hostname: &SmolStr,
    control_port: u16,
    version: &'static str,
) {
    let announcement = Announcement {
        kind: ANNOUNCEMENT_KIND,
        name: name.clone(),
        hostname: hostname.clone(),
        host: local_ipv4().to_string(),
        port: control_port,
        version,
        timestamp: Utc::now().timestamp(),
    };

    let payload = match serde_json::to_vec(&announcement) {
        Ok(payload) => payload,
        Err(err) => {
            warn!(error = %err, "failed to encode presence announcement");
            return;
        }
    };
    if let Err(err) = socket.send_to(&payload, target).await {
        warn!(error = %err, "failed to send presence beacon");
    }
}

fn bind_broadcast_socket() -> std::io::Result<UdpSocket> {
    let socket = Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP))?;
    socket.set_reuse_address(true)?;
    socket.set_broadcast(true)?;
    socket.set_nonblocking(true)?;
    let bind_addr: SocketAddr = (Ipv4Addr::UNSPECIFIED, 0).into();
    socket.bind(&bind_addr.into())?;
    UdpSocket::from_std(socket.into())
}

/// Standard "connect a UDP socket to a public address, read back the local
/// endpoint" trick (§4.I). No packet is actually sent to `8.8.8.8`; `connect`
/// on a `SOCK_DGRAM` socket only picks the outbound route and local address.
fn local_ipv4() -> IpAddr {
    if let Ok(socket) = std::net::UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0)) {
        if socket.connect(("8.8.8.8", 80)).is_ok() {
            if let Ok(addr) = socket.local_addr() {
                return addr.ip();
            }
        }
    }

    let hostname = resolve_hostname();
    if let Ok(mut addrs) = (hostname.as_str(), 0u16).to_socket_addrs() {
        if let Some(addr) = addrs.find(|a| a.is_ipv4()) {
            return addr.ip();
        }
    }

    IpAddr::V4(Ipv4Addr::LOCALHOST)
}

pub(crate) fn resolve_hostname() -> SmolStr {
    nix::unistd::gethostname()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|_| "unknown".to_string())
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_ipv4_never_fails() {
        // Always resolves to something, worst case 127.0.0.1 (§4.I).
        let _ = local_ipv4();
    }

    #[test]
    fn resolve_hostname_never_fails() {
        assert!(!resolve_hostname().is_empty());
    }
}
