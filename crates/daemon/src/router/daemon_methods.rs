// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Exostream Contributors

use serde::Serialize;
use serde_json::Value;

use super::RouterCtx;

#[derive(Serialize)]
struct PingResult {
    pong: bool,
}

pub(super) fn ping() -> Value {
    serde_json::to_value(PingResult { pong: true }).expect("PingResult always serializes")
}

#[derive(Serialize)]
struct DaemonStatus {
    running: bool,
    version: &'static str,
    uptime_seconds: u64,
    pid: u32,
    health: crate::supervisor::HealthView,
}

pub(super) async fn status(ctx: &RouterCtx) -> Value {
    let health = ctx.supervisor.health().await;
    let status = DaemonStatus {
        running: true,
        version: ctx.version,
        uptime_seconds: ctx.start_time.elapsed().as_secs(),
        pid: std::process::id(),
        health,
    };
    serde_json::to_value(status).expect("DaemonStatus always serializes")
}

#[derive(Serialize)]
struct ShutdownResult {
    status: &'static str,
}

/// Responds first, then notifies the shutdown waiter on a short delay so
/// the listener has time to flush this response before the daemon tears
/// its transports down (§4.F.1).
pub(super) fn shutdown(ctx: &RouterCtx) -> Value {
    let notify = ctx.shutdown.clone();
    tokio::spawn(async move {
        tokio::time::sleep(std::time::Duration::from_millis(200)).await;
        notify.notify_waiters();
    });
    serde_json::to_value(ShutdownResult { status: "shutting_down" }).expect("ShutdownResult always serializes")
}
