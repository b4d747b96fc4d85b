// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Exostream Contributors

//! Workspace-level scenario tests exercising exostream end to end, across
//! crate boundaries, the way a real control-plane client would: build a
//! request, dispatch it, read the response back off the wire.
//!
//! Device-dependent scenarios (stream actually running, restart rollback)
//! live inside `exostream-daemon`'s own `supervisor_tests.rs`, where the
//! device probe seam can be pointed at fixture devices; this suite has no
//! such seam and runs against whatever `/dev/video*` nodes the host
//! actually has, so it sticks to behavior that's deterministic either way.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use serial_test::serial;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::UnixStream;
use tokio_util::sync::CancellationToken;

use exostream_core::BEACON_PORT;
use exostream_daemon::presence::{run_discovery, PeerEvent, PeerTable};
use exostream_daemon::router::{dispatch, RouterCtx};
use exostream_daemon::supervisor::StreamSupervisor;
use exostream_daemon::{Config, Daemon};
use exostream_storage::StateStore;
use exostream_wire::{read_request, write_response, Request, Response};

fn test_ctx(dir: &tempfile::TempDir) -> RouterCtx {
    let store = Arc::new(StateStore::open(dir.path()));
    let supervisor = Arc::new(StreamSupervisor::new(store.clone(), "/nonexistent/exostream-test-encoder".into()));
    RouterCtx {
        supervisor,
        store,
        start_time: std::time::Instant::now(),
        version: "specs-test",
        shutdown: Arc::new(tokio::sync::Notify::new()),
    }
}

fn req(method: &str, params: serde_json::Value, id: i64) -> Request {
    Request::new(method, params, Some(id))
}

/// S1: `daemon.ping` always succeeds with `{"pong": true}`.
#[tokio::test]
async fn ping_replies_pong() {
    let dir = tempfile::tempdir().expect("tempdir");
    let ctx = test_ctx(&dir);

    let response = dispatch(&ctx, req("daemon.ping", serde_json::json!({}), 1)).await;
    assert!(!response.is_error());
    assert_eq!(response.result.unwrap()["pong"], serde_json::json!(true));
}

/// An unknown method is rejected with `-32601`, never dispatched to any
/// handler.
#[tokio::test]
async fn unknown_method_is_method_not_found() {
    let dir = tempfile::tempdir().expect("tempdir");
    let ctx = test_ctx(&dir);

    let response = dispatch(&ctx, req("daemon.levitate", serde_json::json!({}), 1)).await;
    assert!(response.is_error());
    assert_eq!(response.error.unwrap().code, -32601);
}

/// S4: malformed params (wrong shape, not just wrong values) surface as
/// `-32602`, distinct from a domain-level rejection.
#[tokio::test]
async fn malformed_params_is_invalid_params() {
    let dir = tempfile::tempdir().expect("tempdir");
    let ctx = test_ctx(&dir);

    let response = dispatch(&ctx, req("stream.start", serde_json::json!({"device": 42}), 1)).await;
    assert!(response.is_error());
    assert_eq!(response.error.unwrap().code, -32602);
}

/// S4/S2: starting a stream against a device the probe never reported is
/// rejected with the bit-exact `DeviceNotFound` code, and the table stays
/// empty — it never reaches the encoder spawn step. With no fixture seam,
/// this is also the behavior a real host with no capture hardware attached
/// observes for any `stream.start` call.
#[tokio::test]
async fn stream_start_on_unknown_device_is_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let ctx = test_ctx(&dir);

    let params = serde_json::json!({
        "device": "/dev/video0",
        "name": "Cam",
        "resolution": "1920x1080",
        "fps": 30,
    });
    let response = dispatch(&ctx, req("stream.start", params, 1)).await;
    assert!(response.is_error());
    assert_eq!(response.error.unwrap().code, -32002);
    assert_eq!(ctx.supervisor.stream_count(), 0);
}

/// S2 (stop half of the roundtrip): stopping a device with nothing active
/// on it is a `StreamNotRunning` domain error, not a silent no-op.
#[tokio::test]
async fn stream_stop_on_idle_device_is_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let ctx = test_ctx(&dir);

    let response = dispatch(&ctx, req("stream.stop", serde_json::json!({"device": "/dev/video0"}), 1)).await;
    assert!(response.is_error());
    assert_eq!(response.error.unwrap().code, -32001);
}

/// Stopping with no `device` named aggregates over an empty table instead
/// of erroring: `stream.stop{}` on an idle daemon is a no-op success.
#[tokio::test]
async fn stream_stop_all_on_idle_daemon_is_a_noop_success() {
    let dir = tempfile::tempdir().expect("tempdir");
    let ctx = test_ctx(&dir);

    let response = dispatch(&ctx, req("stream.stop", serde_json::json!({}), 1)).await;
    assert!(!response.is_error());
    let result = response.result.unwrap();
    assert_eq!(result["count"], serde_json::json!(0));
}

/// S3: `stream.status{}` with no active streams reports an empty
/// aggregate, not an error, and carries the configured stream-table bound.
#[tokio::test]
async fn stream_status_aggregate_on_idle_daemon() {
    let dir = tempfile::tempdir().expect("tempdir");
    let ctx = test_ctx(&dir);

    let response = dispatch(&ctx, req("stream.status", serde_json::json!({}), 1)).await;
    assert!(!response.is_error());
    let result = response.result.unwrap();
    assert_eq!(result["streaming"], serde_json::json!(false));
    assert_eq!(result["stream_count"], serde_json::json!(0));
    assert_eq!(result["max_streams"], serde_json::json!(3));
}

/// `stream.status{device}` for a device with no row reports untracked
/// rather than reusing the `StreamNotRunning` domain error — status is a
/// read, not a command, so an absent stream isn't a failure.
#[tokio::test]
async fn stream_status_for_untracked_device() {
    let dir = tempfile::tempdir().expect("tempdir");
    let ctx = test_ctx(&dir);

    let response = dispatch(&ctx, req("stream.status", serde_json::json!({"device": "/dev/video3"}), 1)).await;
    assert!(!response.is_error());
    let result = response.result.unwrap();
    assert_eq!(result["streaming"], serde_json::json!(false));
    assert_eq!(result["device"], serde_json::json!("/dev/video3"));
}

/// `settings.update` against a device the probe doesn't know about is
/// rejected before anything is persisted to the last-known-good config.
#[tokio::test]
async fn settings_update_unknown_device_is_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let ctx = test_ctx(&dir);

    let response = dispatch(
        &ctx,
        req("settings.update", serde_json::json!({"device": "/dev/video7", "fps": 30}), 1),
    )
    .await;
    assert!(response.is_error());
    assert_eq!(response.error.unwrap().code, -32002);
}

/// `settings.update` with an in-range fps and no device override is saved
/// to the last-known-good config and echoed straight back by
/// `settings.get` — no device probe involved at all.
#[tokio::test]
async fn settings_update_then_get_round_trips_through_the_store() {
    let dir = tempfile::tempdir().expect("tempdir");
    let ctx = test_ctx(&dir);

    let update = dispatch(&ctx, req("settings.update", serde_json::json!({"fps": 24, "resolution": "1280x720"}), 1)).await;
    assert!(!update.is_error(), "{:?}", update.error);
    assert_eq!(update.result.unwrap()["status"], serde_json::json!("updated"));

    let get = dispatch(&ctx, req("settings.get", serde_json::json!({}), 2)).await;
    assert!(!get.is_error());
    let settings = get.result.unwrap();
    assert_eq!(settings["fps"], serde_json::json!(24));
    assert_eq!(settings["resolution"], serde_json::json!("1280x720"));
    assert_eq!(settings["streaming"], serde_json::json!(false));
}

/// `settings.update` rejects an out-of-range fps before it ever touches
/// the store, so a bad request can't clobber a previously saved config.
#[tokio::test]
async fn settings_update_rejects_fps_out_of_range() {
    let dir = tempfile::tempdir().expect("tempdir");
    let ctx = test_ctx(&dir);

    let response = dispatch(&ctx, req("settings.update", serde_json::json!({"fps": 1000}), 1)).await;
    assert!(response.is_error());
    assert_eq!(response.error.unwrap().code, -32004);

    let get = dispatch(&ctx, req("settings.get", serde_json::json!({}), 2)).await;
    assert_ne!(get.result.unwrap()["fps"], serde_json::json!(1000));
}

/// `devices.list` never errors regardless of what hardware the host has;
/// an empty result is a valid answer, not a failure.
#[tokio::test]
async fn devices_list_always_succeeds() {
    let dir = tempfile::tempdir().expect("tempdir");
    let ctx = test_ctx(&dir);

    let response = dispatch(&ctx, req("devices.list", serde_json::json!({}), 1)).await;
    assert!(!response.is_error());
    assert!(response.result.unwrap()["devices"].is_array());
}

/// `settings.get_available` reports the fixed resolution/fps/input-format
/// catalogs from SPEC_FULL.md §10.E.2 alongside whatever devices are
/// present.
#[tokio::test]
async fn settings_get_available_reports_fixed_catalogs() {
    let dir = tempfile::tempdir().expect("tempdir");
    let ctx = test_ctx(&dir);

    let response = dispatch(&ctx, req("settings.get_available", serde_json::json!({}), 1)).await;
    assert!(!response.is_error());
    let result = response.result.unwrap();
    assert!(result["resolutions"].as_array().unwrap().contains(&serde_json::json!("1920x1080")));
    assert!(result["fps_options"].as_array().unwrap().contains(&serde_json::json!(30)));
}

/// `daemon.status` reports the running flag, version, and an empty health
/// snapshot before anything has ever streamed.
#[tokio::test]
async fn daemon_status_reports_idle_health() {
    let dir = tempfile::tempdir().expect("tempdir");
    let ctx = test_ctx(&dir);

    let response = dispatch(&ctx, req("daemon.status", serde_json::json!({}), 1)).await;
    assert!(!response.is_error());
    let result = response.result.unwrap();
    assert_eq!(result["running"], serde_json::json!(true));
    assert_eq!(result["version"], serde_json::json!("specs-test"));
}

/// Full stack, real transport: start a [`Daemon`] bound to a scratch Unix
/// socket, connect to it like any client would, and round-trip a
/// newline-delimited JSON-RPC frame over the actual socket rather than
/// dispatching in-process.
#[tokio::test]
#[serial]
async fn daemon_serves_ping_over_its_local_socket() {
    let state_dir = tempfile::tempdir().expect("tempdir");
    let socket_dir = tempfile::tempdir().expect("tempdir");
    let socket_path = socket_dir.path().join("exostream.sock");

    let config = Config {
        socket_path: socket_path.clone(),
        state_dir: state_dir.path().to_path_buf(),
        network_control: false,
        network_host: "127.0.0.1".parse().unwrap(),
        network_port: 0,
        request_timeout: Duration::from_secs(5),
        verbose: false,
    };

    let (daemon, handle) = Daemon::start(config).await.expect("daemon starts");

    let stream = UnixStream::connect(&socket_path).await.expect("connect to local socket");
    let (read_half, mut write_half) = stream.into_split();
    let mut reader = BufReader::new(read_half);

    let request = Request::new("daemon.ping", serde_json::json!({}), Some(1));
    let mut frame = serde_json::to_vec(&request).expect("serialize request");
    frame.push(b'\n');
    write_half.write_all(&frame).await.expect("write request");

    let mut line = String::new();
    reader.read_line(&mut line).await.expect("read response");
    let response: Response = serde_json::from_str(&line).expect("parse response");
    assert!(!response.is_error());
    assert_eq!(response.result.unwrap()["pong"], serde_json::json!(true));

    // `run()` must already be polling `Notify::notified()` before
    // `request_shutdown` fires `notify_waiters()` — that call doesn't
    // queue a permit for a waiter that shows up later, so the signal
    // would otherwise be lost and `run()` would hang on SIGINT/SIGTERM
    // instead.
    let run_handle = tokio::spawn(daemon.run());
    tokio::time::sleep(Duration::from_millis(50)).await;
    handle.request_shutdown();
    tokio::time::timeout(Duration::from_secs(5), run_handle)
        .await
        .expect("daemon shuts down promptly after a shutdown request")
        .expect("run task does not panic");

    assert!(!socket_path.exists(), "local socket is removed on shutdown");
}

/// S6: a presence announcement ingested by the discovery listener appears
/// in the peer table, and expires once it's older than the staleness
/// window. Binds the fixed discovery port, so runs `#[serial]` alongside
/// the other socket-bound test.
#[tokio::test]
#[serial]
async fn discovery_listener_ingests_and_then_expires_a_peer() {
    let table = Arc::new(PeerTable::new());
    let shutdown = CancellationToken::new();

    let seen: Arc<Mutex<Vec<PeerEvent>>> = Arc::new(Mutex::new(Vec::new()));
    let seen_for_callback = Arc::clone(&seen);
    let on_event: Arc<dyn Fn(PeerEvent) + Send + Sync> = Arc::new(move |event| {
        seen_for_callback.lock().expect("event log mutex").push(event);
    });

    let listener = tokio::spawn(run_discovery(Arc::clone(&table), on_event, shutdown.clone()));
    tokio::time::sleep(Duration::from_millis(150)).await;

    let sender = tokio::net::UdpSocket::bind("0.0.0.0:0").await.expect("bind sender socket");
    let announcement = serde_json::json!({
        "type": "EXOSTREAM_ANNOUNCEMENT",
        "name": "studio-1",
        "hostname": "studio-1.local",
        "host": "127.0.0.1",
        "port": 9023,
        "version": "0.2.0",
        "timestamp": 0,
    });
    sender
        .send_to(announcement.to_string().as_bytes(), ("127.0.0.1", BEACON_PORT))
        .await
        .expect("send announcement");

    tokio::time::sleep(Duration::from_millis(250)).await;
    assert_eq!(table.len(), 1, "discovery listener should have ingested the peer");
    assert_eq!(table.services()[0].host, "127.0.0.1");
    assert!(matches!(seen.lock().unwrap().first(), Some(PeerEvent::Added(_))));

    shutdown.cancel();
    let _ = listener.await;
}

/// The wire codec tolerates a request arriving in two separate writes
/// (a slow client, or a write split across TCP segments) the same way a
/// real connection would deliver it.
#[tokio::test]
async fn read_request_tolerates_a_split_write() {
    let (mut client, server) = tokio::io::duplex(256);
    let mut server = BufReader::new(server);

    let body = b"{\"jsonrpc\":\"2.0\",\"method\":\"daemon.ping\",\"params\":{},\"id\":7}";
    client.write_all(&body[..20]).await.expect("write first half");
    tokio::time::sleep(Duration::from_millis(20)).await;
    client.write_all(&body[20..]).await.expect("write second half");
    client.write_all(b"\n").await.expect("write newline");

    let request = read_request(&mut server, Duration::from_secs(1)).await.expect("read request");
    assert_eq!(request.method, "daemon.ping");
    assert_eq!(request.id, Some(7));
}

/// `write_response` always terminates the frame with exactly one
/// newline, so a reader driven by `read_until(b'\n')` never stalls.
#[tokio::test]
async fn write_response_frame_is_newline_terminated_once() {
    let mut buf = Vec::new();
    let response = Response::success(serde_json::json!({"pong": true}), Some(1));
    write_response(&mut buf, &response).await.expect("write response");

    assert_eq!(buf.iter().filter(|&&b| b == b'\n').count(), 1);
    assert_eq!(buf.last(), Some(&b'\n'));
}
