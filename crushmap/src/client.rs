/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! HTTP access to the management API.
//!
//! This module builds a [`HealthClient`] from [`ClientArgs`], choosing
//! HTTP vs HTTPS and configuring certificate verification.
//!
//! Address handling:
//! - `--addr` may be `host:port` (no scheme) or an explicit
//!   `http://...` / `https://...`.
//! - If a scheme is provided, it is treated as authoritative.
//!
//! TLS configuration:
//! 1. `--tls-ca` installs a PEM root certificate and selects HTTPS when
//!    no scheme was given.
//! 2. `--insecure` disables certificate verification (self-signed
//!    dashboard certificates).
//! 3. Otherwise plain HTTP unless the address says `https://`.

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::header;
use serde::de::DeserializeOwned;

use crate::config::ClientArgs;
use crate::snapshot::FullHealth;
use crate::snapshot::MinimalHealth;
use crate::snapshot::Summary;

/// Media type of version 1.0 of the management REST API.
pub const API_V1_ACCEPT: &str = "application/vnd.ceph.api.v1.0+json";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("HTTP {status} from {url}")]
    Status { url: String, status: StatusCode },
    #[error("parse error: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Snapshot source backed by the management REST API.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct HealthClient {
    base_url: String,
    client: reqwest::Client,
    token: Option<String>,
}

impl HealthClient {
    /// `base_url` must include the scheme (`http://host:port`).
    pub fn new(base_url: impl Into<String>, client: reqwest::Client, token: Option<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
            token,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET /api/health/full`.
    pub async fn full_health(&self) -> Result<FullHealth, FetchError> {
        self.get_json("/api/health/full").await
    }

    /// `GET /api/health/minimal`.
    pub async fn minimal_health(&self) -> Result<MinimalHealth, FetchError> {
        self.get_json("/api/health/minimal").await
    }

    /// `GET /api/summary`.
    pub async fn summary(&self) -> Result<Summary, FetchError> {
        self.get_json("/api/summary").await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, FetchError> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self
            .client
            .get(&url)
            .header(header::ACCEPT, API_V1_ACCEPT);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        let resp = request.send().await?;
        let status = resp.status();
        if !status.is_success() {
            tracing::warn!(%url, %status, "management API request failed");
            return Err(FetchError::Status { url, status });
        }
        let body = resp.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

/// Split an address into an optional `http`/`https` scheme and the
/// remaining host part.
fn parse_addr(addr: &str) -> (Option<&str>, &str) {
    if let Some(host) = addr.strip_prefix("https://") {
        (Some("https"), host)
    } else if let Some(host) = addr.strip_prefix("http://") {
        (Some("http"), host)
    } else {
        (None, addr)
    }
}

/// Install the PEM CA at `ca_path` as a root certificate.
///
/// Returns `(updated_builder, ca_installed)`; an unreadable or invalid
/// file leaves the builder unchanged.
fn add_tls_from_path(
    builder: reqwest::ClientBuilder,
    ca_path: &str,
) -> (reqwest::ClientBuilder, bool) {
    let ca_bytes = match std::fs::read(ca_path) {
        Ok(b) => b,
        Err(e) => {
            tracing::warn!(ca_path, error = %e, "TLS: cannot read CA file");
            return (builder, false);
        }
    };
    match reqwest::Certificate::from_pem(&ca_bytes) {
        Ok(cert) => (builder.add_root_certificate(cert), true),
        Err(e) => {
            tracing::warn!(ca_path, error = %e, "TLS: invalid CA PEM");
            (builder, false)
        }
    }
}

/// Build a [`HealthClient`] from command-line arguments.
///
/// The returned base URL always carries the scheme selected.
pub fn build_client(args: &ClientArgs) -> HealthClient {
    let (explicit_scheme, host) = parse_addr(&args.addr);

    let mut builder = reqwest::Client::builder().timeout(REQUEST_TIMEOUT);
    let mut use_tls = explicit_scheme == Some("https");

    if let Some(ca_path) = &args.tls_ca {
        let (b, ok) = add_tls_from_path(builder, ca_path);
        builder = b;
        use_tls = use_tls || (ok && explicit_scheme.is_none());
    }
    if args.insecure {
        builder = builder.danger_accept_invalid_certs(true);
    }

    let scheme = if use_tls { "https" } else { "http" };
    let base_url = format!("{}://{}", scheme, host);
    let client = builder.build().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "falling back to default HTTP client");
        reqwest::Client::new()
    });

    HealthClient::new(base_url, client, args.token.clone())
}
