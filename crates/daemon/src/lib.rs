// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Exostream Contributors

//! The exostream camera broadcast daemon's control plane.
//!
//! Owns up to three V4L2 capture devices, drives one encoder subprocess per
//! active stream, and exposes a JSON-RPC surface over a Unix socket and,
//! optionally, a TCP socket. See [`daemon::Daemon`] for the orchestration
//! that ties the pieces below together.

pub mod daemon;
pub mod device;
pub mod encoder;
pub mod env;
pub mod error;
pub mod presence;
pub mod router;
pub mod supervisor;

mod listener;

pub use daemon::{Daemon, DaemonHandle};
pub use env::Config;
pub use error::DaemonError;
pub use listener::{bind_local, bind_network, serve_local, serve_network};
