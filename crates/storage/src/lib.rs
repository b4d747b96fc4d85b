// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Exostream Contributors

//! Crash-safe on-disk state store for the exostream control plane (§4.A).
//!
//! This crate has exactly one exported type, [`StateStore`]: a mutex-guarded
//! [`exostream_core::DaemonState`] backed by atomic temp-file-then-rename
//! writes to a configured directory. It owns the on-disk file exclusively —
//! nothing outside this crate ever opens `state.json` directly.

mod error;
mod store;

pub use error::StateStoreError;
pub use store::StateStore;
