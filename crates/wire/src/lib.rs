// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Exostream Contributors

//! JSON-RPC 2.0 framing for the exostream control channel (§4.E).
//!
//! Newline-delimited request/response objects, shared identically by the
//! local stream-socket listener and the TCP listener in `exostream-daemon`.
//! This crate owns only the wire shapes and the codec; method dispatch and
//! domain-error mapping live in the daemon's router.

mod codec;
mod error;
mod request;
mod response;

pub use codec::{read_request, write_response, MAX_REQUEST_SIZE};
pub use error::ProtocolError;
pub use request::Request;
pub use response::{ErrorObject, Response};
