// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Exostream Contributors

//! RPC Router (§4.F): one `method -> handler` dispatch point shared
//! identically by the local and network listeners.
//!
//! The router owns no transport state; it is handed one already-decoded
//! [`Request`] and returns one [`Response`]. Domain errors raised by a
//! handler are mapped onto the bit-exact wire code table by
//! [`exostream_core::DomainError::code`]; anything else a handler can fail
//! with (bad params) is mapped here.

mod daemon_methods;
mod devices_methods;
mod settings_methods;
mod stream_methods;

use std::sync::Arc;
use std::time::Instant;

use exostream_core::DomainError;
use exostream_storage::StateStore;
use exostream_wire::{Request, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::Notify;
use tracing::{debug, info};

use crate::supervisor::StreamSupervisor;

/// Shared context handed to every handler. Cheap to clone: everything
/// inside is already an `Arc` or `Copy`.
pub struct RouterCtx {
    pub supervisor: Arc<StreamSupervisor>,
    pub store: Arc<StateStore>,
    pub start_time: Instant,
    pub version: &'static str,
    /// Signaled by `daemon.shutdown` after its response has been sent.
    pub shutdown: Arc<Notify>,
}

/// Failure modes internal to dispatch, distinct from [`DomainError`]:
/// these never reach a stream handler, they're decided by the router
/// itself before or instead of invoking one.
enum RouteError {
    MethodNotFound,
    InvalidParams(String),
    Domain(DomainError),
}

impl From<DomainError> for RouteError {
    fn from(err: DomainError) -> Self {
        RouteError::Domain(err)
    }
}

/// Parses `params` into `T`, mapping a shape mismatch onto `-32602`
/// (§4.E) instead of letting `serde_json` panic or the caller `unwrap`.
fn parse_params<T: DeserializeOwned>(params: Value) -> Result<T, RouteError> {
    serde_json::from_value(params).map_err(|err| RouteError::InvalidParams(err.to_string()))
}

/// Dispatches one decoded request and produces one response (§4.F).
/// Never panics on a bad method or bad params; a handler panic is the
/// listener's problem to isolate, not this function's.
pub async fn dispatch(ctx: &RouterCtx, request: Request) -> Response {
    let id = request.id;
    debug!(method = %request.method, id = ?id, "dispatching request");

    let outcome = route(ctx, &request.method, request.params).await;
    match outcome {
        Ok(result) => Response::success(result, id),
        Err(RouteError::Domain(err)) => {
            info!(method = %request.method, error = %err, "handler returned domain error");
            Response::from_domain_error(&err, id)
        }
        Err(RouteError::MethodNotFound) => {
            Response::error(-32601, format!("method not found: {}", request.method), None, id)
        }
        Err(RouteError::InvalidParams(detail)) => Response::error(-32602, detail, None, id),
    }
}

async fn route(ctx: &RouterCtx, method: &str, params: Value) -> Result<Value, RouteError> {
    let value = match method {
        "daemon.ping" => daemon_methods::ping(),
        "daemon.status" => daemon_methods::status(ctx).await,
        "daemon.shutdown" => daemon_methods::shutdown(ctx),
        "devices.list" => devices_methods::list(ctx),
        "stream.start" => stream_methods::start(ctx, parse_params(params)?).await?,
        "stream.stop" => stream_methods::stop(ctx, parse_params(params)?).await?,
        "stream.status" => stream_methods::status(ctx, parse_params(params)?),
        "settings.get" => settings_methods::get(ctx),
        "settings.update" => settings_methods::update(ctx, parse_params(params)?).await?,
        "settings.get_available" => settings_methods::get_available(ctx),
        _ => return Err(RouteError::MethodNotFound),
    };
    Ok(value)
}

#[cfg(test)]
#[path = "../router_tests.rs"]
mod router_tests;
