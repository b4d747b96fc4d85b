// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Exostream Contributors

//! Centralized configuration: CLI flags layered over environment variables,
//! modeled on this workspace's usual `env.rs` (§10.C).
//!
//! Precedence is CLI flag > environment variable > built-in default, except
//! where noted; the environment variables exist so process supervisors
//! (systemd units, container entrypoints) can configure the daemon without
//! rewriting its invocation line.

use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::error::DaemonError;

/// Protocol/version string reported by `daemon.status` and the presence
/// beacon.
pub const PROTOCOL_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default local socket path.
pub const DEFAULT_SOCKET: &str = "/tmp/exostream.sock";

/// Default TCP control port.
pub const DEFAULT_NETWORK_PORT: u16 = 9023;

/// Default request read timeout (§5).
const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;

#[derive(Debug, Parser)]
#[command(name = "exostreamd", version = PROTOCOL_VERSION, about = "exostream camera broadcast daemon")]
struct Cli {
    /// Local stream socket path.
    #[arg(long, value_name = "PATH")]
    socket: Option<PathBuf>,

    /// Directory hosting state.json.
    #[arg(long, value_name = "PATH")]
    state_dir: Option<PathBuf>,

    /// Enable the TCP listener in addition to the local socket.
    #[arg(long)]
    network_control: bool,

    /// TCP bind address.
    #[arg(long, value_name = "ADDR", default_value = "0.0.0.0")]
    network_host: IpAddr,

    /// TCP bind port.
    #[arg(long, value_name = "PORT")]
    network_port: Option<u16>,

    /// Raise log verbosity to debug.
    #[arg(long)]
    verbose: bool,
}

/// Fully resolved daemon configuration: CLI flags merged with environment
/// overrides and defaults.
#[derive(Debug, Clone)]
pub struct Config {
    pub socket_path: PathBuf,
    pub state_dir: PathBuf,
    pub network_control: bool,
    pub network_host: IpAddr,
    pub network_port: u16,
    pub request_timeout: Duration,
    pub verbose: bool,
}

impl Config {
    /// Parses `std::env::args()` and layers in environment variables.
    pub fn from_args() -> Result<Self, DaemonError> {
        Self::from_cli(Cli::parse())
    }

    fn from_cli(cli: Cli) -> Result<Self, DaemonError> {
        let socket_path = cli
            .socket
            .or_else(|| std::env::var_os("EXOSTREAM_SOCKET").map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SOCKET));

        let state_dir = match cli.state_dir {
            Some(dir) => dir,
            None => state_dir_from_env()?,
        };

        let network_port = cli
            .network_port
            .or_else(|| {
                std::env::var("EXOSTREAM_NETWORK_PORT")
                    .ok()
                    .and_then(|s| s.parse().ok())
            })
            .unwrap_or(DEFAULT_NETWORK_PORT);

        let request_timeout = std::env::var("EXOSTREAM_REQUEST_TIMEOUT_MS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or(Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS));

        Ok(Self {
            socket_path,
            state_dir,
            network_control: cli.network_control,
            network_host: cli.network_host,
            network_port,
            request_timeout,
            verbose: cli.verbose,
        })
    }
}

/// Resolves the state directory: `EXOSTREAM_STATE_DIR` > `~/.exostream`.
fn state_dir_from_env() -> Result<PathBuf, DaemonError> {
    if let Ok(dir) = std::env::var("EXOSTREAM_STATE_DIR") {
        return Ok(PathBuf::from(dir));
    }
    dirs::home_dir().map(|home| home.join(".exostream")).ok_or(DaemonError::NoStateDir)
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod env_tests;
