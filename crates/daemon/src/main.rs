// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Exostream Contributors

//! `exostreamd`: the exostream camera broadcast daemon binary.
//!
//! Parses configuration, initializes structured logging, starts the
//! daemon, and runs it to completion. See [`exostream_daemon::Daemon`] for
//! the actual orchestration.

use exostream_daemon::{Config, Daemon};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let config = match Config::from_args() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("exostreamd: {err}");
            std::process::exit(1);
        }
    };

    init_logging(config.verbose);

    let (daemon, _handle) = match Daemon::start(config).await {
        Ok(started) => started,
        Err(err) => {
            tracing::error!(error = %err, "failed to start daemon");
            std::process::exit(1);
        }
    };

    daemon.run().await;
    std::process::exit(0);
}

/// Initializes `tracing-subscriber` from `EXOSTREAM_LOG`/`RUST_LOG`,
/// defaulting to `info` and raised to `debug` by `--verbose` (§10.A).
fn init_logging(verbose: bool) {
    let default_directive = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_env("EXOSTREAM_LOG")
        .or_else(|_| EnvFilter::try_from_env("RUST_LOG"))
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}
