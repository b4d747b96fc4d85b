// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Exostream Contributors

use std::time::Instant;

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// A daemon observed on the LAN via the presence beacon, kept in the
/// discovery listener's peer table. Keyed by `host:port`.
#[derive(Debug, Clone)]
pub struct PeerService {
    pub name: SmolStr,
    pub hostname: SmolStr,
    pub host: SmolStr,
    pub port: u16,
    pub version: SmolStr,
    pub last_seen: Instant,
}

impl PeerService {
    pub fn key(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn is_stale(&self, now: Instant, timeout: std::time::Duration) -> bool {
        now.saturating_duration_since(self.last_seen) > timeout
    }
}

/// Wire-facing view of a peer, returned by the discovery listener's
/// `GetServices` accessor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerView {
    pub name: SmolStr,
    pub hostname: SmolStr,
    pub host: SmolStr,
    pub port: u16,
    pub version: SmolStr,
}

impl From<&PeerService> for PeerView {
    fn from(peer: &PeerService) -> Self {
        Self {
            name: peer.name.clone(),
            hostname: peer.hostname.clone(),
            host: peer.host.clone(),
            port: peer.port,
            version: peer.version.clone(),
        }
    }
}
