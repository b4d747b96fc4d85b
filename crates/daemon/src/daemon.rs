// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Exostream Contributors

//! Top-level orchestration: wires the State Store (A), Stream Supervisor
//! (D), RPC Router (F), both listeners (G/H), and the presence layer (I/J)
//! together, then drives the shutdown sequence from §5.
//!
//! Everything that can run independently — each listener, the beacon, the
//! discovery loops — is its own spawned task guarded by its own
//! [`CancellationToken`], so shutdown can stop them in the documented
//! order instead of all at once.

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use exostream_core::PeerView;
use exostream_storage::StateStore;

use crate::encoder;
use crate::env::Config;
use crate::error::DaemonError;
use crate::listener::{bind_local, bind_network, serve_local, serve_network};
use crate::presence::{run_beacon, run_discovery, PeerEvent, PeerTable};
use crate::router::RouterCtx;
use crate::supervisor::StreamSupervisor;

/// A background worker plus the token that cancels it. Stored so shutdown
/// can cancel and then join each one individually, in order.
struct Task {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl Task {
    async fn stop(self) {
        self.cancel.cancel();
        let _ = self.handle.await;
    }
}

/// The running daemon: everything `main` needs to wait on and tear down.
pub struct Daemon {
    config: Config,
    store: Arc<StateStore>,
    supervisor: Arc<StreamSupervisor>,
    peer_table: Arc<PeerTable>,
    shutdown_requested: Arc<Notify>,
    start_time: Instant,
    local: Task,
    network: Option<Task>,
    beacon: Task,
    discovery: Task,
}

/// A lightweight clone-free reference callers can use to trigger shutdown
/// out of band, e.g. from a signal handler, without holding the [`Daemon`]
/// itself.
#[derive(Clone)]
pub struct DaemonHandle {
    shutdown_requested: Arc<Notify>,
}

impl DaemonHandle {
    /// Requests an orderly shutdown, equivalent to a `daemon.shutdown` RPC.
    pub fn request_shutdown(&self) {
        self.shutdown_requested.notify_waiters();
    }
}

impl Daemon {
    /// Binds every transport and spawns every background worker. Returns
    /// as soon as both listeners are accepting; callers drive the daemon
    /// to completion with [`Daemon::run`].
    pub async fn start(config: Config) -> Result<(Self, DaemonHandle), DaemonError> {
        let store = Arc::new(StateStore::open(&config.state_dir));
        store.set_daemon_started(std::process::id());

        let encoder_binary = encoder::resolve_binary(None);
        let supervisor = Arc::new(StreamSupervisor::new(Arc::clone(&store), encoder_binary));

        let shutdown_requested = Arc::new(Notify::new());
        let router_ctx = Arc::new(RouterCtx {
            supervisor: Arc::clone(&supervisor),
            store: Arc::clone(&store),
            start_time: Instant::now(),
            version: crate::env::PROTOCOL_VERSION,
            shutdown: Arc::clone(&shutdown_requested),
        });

        let local = spawn_local_listener(&config, Arc::clone(&router_ctx))?;
        let network = match config.network_control {
            true => Some(spawn_network_listener(&config, Arc::clone(&router_ctx))?),
            false => None,
        };

        let peer_table = Arc::new(PeerTable::new());
        let beacon = spawn_beacon(config.network_port);
        let discovery = spawn_discovery(Arc::clone(&peer_table));

        info!(
            socket = %config.socket_path.display(),
            network_control = config.network_control,
            "exostream daemon started",
        );

        let handle = DaemonHandle { shutdown_requested: Arc::clone(&shutdown_requested) };
        let daemon = Self {
            config,
            store,
            supervisor,
            peer_table,
            shutdown_requested,
            start_time: Instant::now(),
            local,
            network,
            beacon,
            discovery,
        };
        Ok((daemon, handle))
    }

    /// Runs until either a `daemon.shutdown` RPC or `SIGINT`/`SIGTERM`
    /// arrives, then performs the ordered shutdown sequence from §5.
    pub async fn run(self) {
        tokio::select! {
            _ = self.shutdown_requested.notified() => {
                info!("shutdown requested via RPC");
            }
            _ = wait_for_termination() => {
                info!("shutdown requested via signal");
            }
        }
        self.shutdown().await;
    }

    pub fn uptime(&self) -> std::time::Duration {
        self.start_time.elapsed()
    }

    /// The resolved configuration this instance was started with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Stop accepting new connections, drain active streams, tear down
    /// every background worker, then flush the state store — in that
    /// exact order (§5).
    async fn shutdown(self) {
        info!("beginning shutdown sequence");

        self.local.stop().await;
        if let Some(network) = self.network {
            network.stop().await;
        }

        self.supervisor.shutdown().await;

        self.beacon.stop().await;
        self.discovery.stop().await;

        self.store.clear_daemon_started();
        info!(peers_seen = self.peer_table.len(), "exostream daemon stopped");
    }
}

/// Waits for either `SIGINT` (Ctrl-C) or `SIGTERM`. Only Unix targets are
/// supported by this daemon (it owns V4L2 device nodes), so no
/// Windows-specific fallback is needed.
async fn wait_for_termination() {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = match signal(SignalKind::terminate()) {
        Ok(sig) => sig,
        Err(err) => {
            warn!(error = %err, "failed to install SIGTERM handler");
            std::future::pending::<()>().await;
            unreachable!()
        }
    };
    tokio::select! {
        _ = tokio::signal::ctrl_c() => {}
        _ = sigterm.recv() => {}
    }
}

/// Binds the local socket synchronously so a bind failure surfaces as a
/// startup error (§6 exit code 1), then spawns the accept loop.
fn spawn_local_listener(config: &Config, ctx: Arc<RouterCtx>) -> Result<Task, DaemonError> {
    let path = config.socket_path.clone();
    let listener = bind_local(&path)?;
    let request_timeout = config.request_timeout;
    let cancel = CancellationToken::new();
    let task_cancel = cancel.clone();
    let handle = tokio::spawn(async move {
        serve_local(listener, &path, ctx, request_timeout, task_cancel).await;
    });
    Ok(Task { cancel, handle })
}

/// Binds the TCP socket synchronously for the same reason as
/// [`spawn_local_listener`], then spawns the accept loop.
fn spawn_network_listener(config: &Config, ctx: Arc<RouterCtx>) -> Result<Task, DaemonError> {
    let listener = bind_network(config.network_host, config.network_port)?;
    let request_timeout = config.request_timeout;
    let cancel = CancellationToken::new();
    let task_cancel = cancel.clone();
    let handle = tokio::spawn(async move {
        serve_network(listener, ctx, request_timeout, task_cancel).await;
    });
    Ok(Task { cancel, handle })
}

fn spawn_beacon(control_port: u16) -> Task {
    let cancel = CancellationToken::new();
    let name = crate::presence::beacon::resolve_hostname();
    let version = crate::env::PROTOCOL_VERSION;
    let task_cancel = cancel.clone();
    let handle = tokio::spawn(run_beacon(name, control_port, version, task_cancel));
    Task { cancel, handle }
}

fn spawn_discovery(table: Arc<PeerTable>) -> Task {
    let cancel = CancellationToken::new();
    let task_cancel = cancel.clone();
    let on_event: Arc<dyn Fn(PeerEvent) + Send + Sync> = Arc::new(|event| match event {
        PeerEvent::Added(peer) => info!(peer = ?PeerLog(&peer), "discovered peer"),
        PeerEvent::Updated(peer) => tracing::debug!(peer = ?PeerLog(&peer), "peer refreshed"),
        PeerEvent::Removed(peer) => info!(peer = ?PeerLog(&peer), "peer expired"),
    });
    let handle = tokio::spawn(run_discovery(table, on_event, task_cancel));
    Task { cancel, handle }
}

/// Thin `Debug` wrapper so the closure above can log a [`PeerView`]
/// without pulling a `Display` impl onto the wire type itself.
struct PeerLog<'a>(&'a PeerView);

impl std::fmt::Debug for PeerLog<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{} ({})", self.0.host, self.0.port, self.0.name)
    }
}
