// src/http/connection_pool.rs
//! Connection pooling for HTTP clients.
//!
//! A reqwest `Client` owns a connection pool. Every client built here is
//! shared process-wide per [`PoolConfig`], so the generator and the platform
//! publisher lease connections from long-lived pools instead of opening a
//! fresh socket per request. Per-request timeouts are applied by the callers.

use crate::error::AppError;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use reqwest::{Client, ClientBuilder};
use std::collections::HashMap;
use std::time::Duration;

/// Global registry of pooled clients
static CONNECTION_POOL: Lazy<RwLock<HashMap<PoolConfig, Client>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// Connection pool configuration
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PoolConfig {
    /// Maximum idle connections kept per host
    pub max_idle_per_host: usize,
    pub connect_timeout: Duration,
    /// How long an idle connection stays in the pool
    pub pool_idle_timeout: Duration,
    pub tcp_keepalive: Option<Duration>,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_idle_per_host: 10,
            connect_timeout: Duration::from_secs(10),
            pool_idle_timeout: Duration::from_secs(90),
            tcp_keepalive: Some(Duration::from_secs(60)),
        }
    }
}

/// Build a client with the given configuration
fn build_client(config: &PoolConfig) -> Result<Client, reqwest::Error> {
    let mut builder = ClientBuilder::new()
        .user_agent(concat!("prompt2post/", env!("CARGO_PKG_VERSION")))
        .pool_max_idle_per_host(config.max_idle_per_host)
        .connect_timeout(config.connect_timeout)
        .pool_idle_timeout(config.pool_idle_timeout);

    if let Some(keepalive) = config.tcp_keepalive {
        builder = builder.tcp_keepalive(keepalive);
    }

    builder.build()
}

/// Returns the pooled client for `config`, building it on first use.
pub fn pooled_client(config: &PoolConfig) -> Result<Client, AppError> {
    if let Some(client) = CONNECTION_POOL.read().get(config) {
        return Ok(client.clone());
    }

    let mut clients = CONNECTION_POOL.write();
    if let Some(client) = clients.get(config) {
        return Ok(client.clone());
    }

    log::debug!("Building pooled HTTP client: {:?}", config);
    let client = build_client(config)?;
    clients.insert(config.clone(), client.clone());
    Ok(client)
}
