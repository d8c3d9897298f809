/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Command-line configuration shared by the library and the TUI.
//!
//! Every flag can also be supplied through a `CRUSHMAP_*` environment
//! variable; the flag wins when both are set.

use std::time::Duration;

/// Default period of the topology (full health) refresh.
pub const DEFAULT_TOPOLOGY_REFRESH_MS: u64 = 5000;

/// Default period of the navigation bar (minimal health and summary)
/// refresh.
pub const DEFAULT_HEALTH_REFRESH_MS: u64 = 5000;

/// Where and how to reach the management API.
#[derive(Debug, Clone, clap::Args)]
pub struct ClientArgs {
    /// Management API address (e.g. 127.0.0.1:8443 or https://mgr:8443)
    #[arg(long, short, env = "CRUSHMAP_ADDR")]
    pub addr: String,

    /// Bearer token for the management API
    #[arg(long, env = "CRUSHMAP_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// PEM file with the CA that signed the API certificate
    #[arg(long, env = "CRUSHMAP_TLS_CA")]
    pub tls_ca: Option<String>,

    /// Skip TLS certificate verification
    #[arg(long, env = "CRUSHMAP_INSECURE")]
    pub insecure: bool,
}

/// Polling periods.
#[derive(Debug, Clone, clap::Args)]
pub struct PollArgs {
    /// Topology refresh interval in milliseconds
    #[arg(long, default_value_t = DEFAULT_TOPOLOGY_REFRESH_MS, env = "CRUSHMAP_REFRESH_MS")]
    pub refresh_ms: u64,

    /// Navigation bar health refresh interval in milliseconds
    #[arg(long, default_value_t = DEFAULT_HEALTH_REFRESH_MS, env = "CRUSHMAP_HEALTH_REFRESH_MS")]
    pub health_refresh_ms: u64,
}

impl PollArgs {
    pub fn topology_period(&self) -> Duration {
        Duration::from_millis(self.refresh_ms.max(1))
    }

    pub fn health_period(&self) -> Duration {
        Duration::from_millis(self.health_refresh_ms.max(1))
    }
}

/// Human-readable interval, e.g. `5s` or `750ms`.
pub fn interval_label(ms: u64) -> String {
    if ms >= 1000 && ms % 1000 == 0 {
        format!("{}s", ms / 1000)
    } else {
        format!("{}ms", ms)
    }
}
