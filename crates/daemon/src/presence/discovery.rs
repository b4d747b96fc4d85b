// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Exostream Contributors

//! Discovery Listener (§4.J): collects presence-beacon announcements into
//! a peer table and expires entries once they go quiet.

use std::collections::HashMap;
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::{Duration, Instant};

use exostream_core::{PeerService, PeerView, BEACON_PORT, DISCOVERY_SWEEP_INTERVAL, DISCOVERY_TIMEOUT};
use parking_lot::Mutex;
use serde::Deserialize;
use smol_str::SmolStr;
use socket2::{Domain, Protocol, Socket, Type};
use tokio::net::UdpSocket;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Bound on one receive attempt; keeps the loop responsive to shutdown
/// without busy-polling (§4.J).
const RECV_TIMEOUT: Duration = Duration::from_secs(1);
const MAX_DATAGRAM: usize = 2048;

/// One event emitted as the peer table changes, per §4.J. Delivered
/// outside the table's lock so a slow or panicking callback never blocks
/// the receive/sweep loops.
#[derive(Debug, Clone)]
pub enum PeerEvent {
    Added(PeerView),
    Updated(PeerView),
    Removed(PeerView),
}

/// The in-memory set of peers observed via beacon announcements, keyed by
/// `host:port`. All mutation happens under one mutex (§5).
pub struct PeerTable {
    inner: Mutex<HashMap<String, PeerService>>,
}

impl Default for PeerTable {
    fn default() -> Self {
        Self::new()
    }
}

impl PeerTable {
    pub fn new() -> Self {
        Self { inner: Mutex::new(HashMap::new()) }
    }

    /// Wire-facing snapshot of every live peer, for a future `discovery.list`
    /// RPC method or diagnostics; stable ordering isn't promised.
    pub fn services(&self) -> Vec<PeerView> {
        self.inner.lock().values().map(PeerView::from).collect()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}

#[derive(Debug, Deserialize)]
struct AnnouncementIn {
    #[serde(rename = "type")]
    kind: Option<String>,
    name: Option<SmolStr>,
    hostname: Option<SmolStr>,
    host: Option<SmolStr>,
    port: Option<u16>,
    version: Option<SmolStr>,
}

/// Runs the receive loop and sweep loop until `shutdown` is cancelled.
/// `on_event` is invoked for every table change, outside the table's lock.
pub async fn run_discovery(
    table: Arc<PeerTable>,
    on_event: Arc<dyn Fn(PeerEvent) + Send + Sync>,
    shutdown: CancellationToken,
) {
    let socket = match bind_discovery_socket() {
        Ok(socket) => socket,
        Err(err) => {
            warn!(error = %err, "failed to bind discovery listener socket, discovery disabled");
            return;
        }
    };

    let sweep_table = Arc::clone(&table);
    let sweep_events = Arc::clone(&on_event);
    let sweep_shutdown = shutdown.clone();
    tokio::spawn(run_sweep_loop(sweep_table, sweep_events, sweep_shutdown));

    run_receive_loop(socket, table, on_event, shutdown).await;
}

async fn run_receive_loop(
    socket: UdpSocket,
    table: Arc<PeerTable>,
    on_event: Arc<dyn Fn(PeerEvent) + Send + Sync>,
    shutdown: CancellationToken,
) {
    let mut buf = [0u8; MAX_DATAGRAM];
    loop {
        tokio::select! {
            _ = shutdown.cancelled() => {
                debug!("discovery receive loop stopping");
                return;
            }
            received = tokio::time::timeout(RECV_TIMEOUT, socket.recv_from(&mut buf)) => {
                let Ok(received) = received else {
                    continue; // 1-second timeout elapsed, just re-check shutdown
                };
                match received {
                    Ok((len, _peer_addr)) => {
                        if let Some(event) = ingest_announcement(&table, &buf[..len]) {
                            on_event(event);
                        }
                    }
                    Err(err) => warn!(error = %err, "error receiving discovery datagram"),
                }
            }
        }
    }
}

fn ingest_announcement(table: &PeerTable, datagram: &[u8]) -> Option<PeerEvent> {
    let announcement: AnnouncementIn = serde_json::from_slice(datagram).ok()?;
    if announcement.kind.as_deref() != Some("EXOSTREAM_ANNOUNCEMENT") {
        return None;
    }
    let name = announcement.name?;
    let hostname = announcement.hostname?;
    let host = announcement.host?;
    let port = announcement.port?;
    let version = announcement.version.unwrap_or_default();

    let peer = PeerService {
        name,
        hostname,
        host,
        port,
        version,
        last_seen: Instant::now(),
    };
    let key = peer.key();
    let view = PeerView::from(&peer);

    let mut peers = table.inner.lock();
    let is_new = !peers.contains_key(&key);
    peers.insert(key, peer);
    drop(peers);

    Some(if is_new { PeerEvent::Added(view) } else { PeerEvent::Updated(view) })
}

async fn run_sweep_loop(table: Arc<PeerTable>, on_event: Arc<dyn Fn(PeerEvent) + Send + Sync>, shutdown: CancellationToken) {
    let mut interval = tokio::time::interval(DISCOVERY_SWEEP_INTERVAL);
    loop {
        tokio::select! {
            _ = shutdown.cancelled() => {
                debug!("discovery sweep loop stopping");
                return;
            }
            _ = interval.tick() => {
                for removed in sweep_stale(&table) {
                    on_event(PeerEvent::Removed(removed));
                }
            }
        }
    }
}

fn sweep_stale(table: &PeerTable) -> Vec<PeerView> {
    let now = Instant::now();
    let mut peers = table.inner.lock();
    let stale_keys: Vec<String> = peers
        .iter()
        .filter(|(_, peer)| peer.is_stale(now, DISCOVERY_TIMEOUT))
        .map(|(key, _)| key.clone())
        .collect();

    stale_keys
        .into_iter()
        .filter_map(|key| peers.remove(&key))
        .map(|peer| PeerView::from(&peer))
        .collect()
}

fn bind_discovery_socket() -> std::io::Result<UdpSocket> {
    let socket = Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP))?;
    socket.set_reuse_address(true)?;
    socket.set_nonblocking(true)?;
    let bind_addr: SocketAddr = (Ipv4Addr::UNSPECIFIED, BEACON_PORT).into();
    socket.bind(&bind_addr.into())?;
    UdpSocket::from_std(socket.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_announcement(host: &str, port: u16) -> Vec<u8> {
        serde_json::to_vec(&serde_json::json!({
            "type": "EXOSTREAM_ANNOUNCEMENT",
            "name": "studio-1",
            "hostname": "studio-1.local",
            "host": host,
            "port": port,
            "version": "0.2.0",
            "timestamp": 0,
        }))
        .expect("serialize fixture")
    }

    #[test]
    fn ingest_adds_new_peer_then_updates_existing() {
        let table = PeerTable::new();
        let datagram = sample_announcement("192.168.1.50", 9023);

        let first = ingest_announcement(&table, &datagram).expect("first ingest");
        assert!(matches!(first, PeerEvent::Added(_)));
        assert_eq!(table.len(), 1);

        let second = ingest_announcement(&table, &datagram).expect("second ingest");
        assert!(matches!(second, PeerEvent::Updated(_)));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn non_announcement_json_is_dropped() {
        let table = PeerTable::new();
        let datagram = serde_json::to_vec(&serde_json::json!({"type": "something.else"})).unwrap();
        assert!(ingest_announcement(&table, &datagram).is_none());
        assert!(table.is_empty());
    }

    #[test]
    fn missing_required_field_is_dropped() {
        let table = PeerTable::new();
        let datagram = serde_json::to_vec(&serde_json::json!({
            "type": "EXOSTREAM_ANNOUNCEMENT",
            "name": "studio-1",
            "hostname": "studio-1.local",
            "host": "192.168.1.50",
        }))
        .unwrap();
        assert!(ingest_announcement(&table, &datagram).is_none());
        assert!(table.is_empty());
    }

    #[test]
    fn malformed_json_is_dropped() {
        let table = PeerTable::new();
        assert!(ingest_announcement(&table, b"not json").is_none());
    }

    #[test]
    fn sweep_removes_only_stale_entries() {
        let table = PeerTable::new();
        {
            let mut peers = table.inner.lock();
            peers.insert(
                "192.168.1.50:9023".into(),
                PeerService {
                    name: "old".into(),
                    hostname: "old.local".into(),
                    host: "192.168.1.50".into(),
                    port: 9023,
                    version: "0.2.0".into(),
                    last_seen: Instant::now() - Duration::from_secs(20),
                },
            );
            peers.insert(
                "192.168.1.51:9023".into(),
                PeerService {
                    name: "fresh".into(),
                    hostname: "fresh.local".into(),
                    host: "192.168.1.51".into(),
                    port: 9023,
                    version: "0.2.0".into(),
                    last_seen: Instant::now(),
                },
            );
        }

        let removed = sweep_stale(&table);
        assert_eq!(removed.len(), 1);
        assert_eq!(removed[0].host, "192.168.1.50");
        assert_eq!(table.len(), 1);
    }
}
