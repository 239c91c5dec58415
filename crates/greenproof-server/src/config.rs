//! Server configuration, read from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use greenproof::GreenProofConfig;

/// Value of `GREENPROOF_DB` selecting the in-memory store.
pub const MEMORY_DATABASE: &str = ":memory:";

/// Where records are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageConfig {
    Sqlite(PathBuf),
    Memory,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub storage: StorageConfig,
    /// Upper bound on handling one request.
    pub request_timeout: Duration,
    pub service: GreenProofConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8000)),
            storage: StorageConfig::Sqlite(PathBuf::from("greenproof.db")),
            request_timeout: Duration::from_secs(30),
            service: GreenProofConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Read configuration from the process environment.
    ///
    /// - `GREENPROOF_BIND`: full bind address, e.g. `0.0.0.0:8000`
    /// - `PORT`: port on all interfaces, when `GREENPROOF_BIND` is unset
    /// - `GREENPROOF_DB`: SQLite path, or `:memory:` for the in-memory store
    /// - `GREENPROOF_TIMEOUT_SECS`: request timeout
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(bind) = lookup("GREENPROOF_BIND") {
            config.bind_addr = bind
                .parse()
                .with_context(|| format!("invalid GREENPROOF_BIND: {bind}"))?;
        } else if let Some(port) = lookup("PORT") {
            let port: u16 = port
                .parse()
                .with_context(|| format!("invalid PORT: {port}"))?;
            config.bind_addr = SocketAddr::from(([0, 0, 0, 0], port));
        }

        if let Some(db) = lookup("GREENPROOF_DB") {
            config.storage = if db == MEMORY_DATABASE {
                StorageConfig::Memory
            } else {
                StorageConfig::Sqlite(PathBuf::from(db))
            };
        }

        if let Some(secs) = lookup("GREENPROOF_TIMEOUT_SECS") {
            let secs: u64 = secs
                .parse()
                .with_context(|| format!("invalid GREENPROOF_TIMEOUT_SECS: {secs}"))?;
            config.request_timeout = Duration::from_secs(secs.max(1));
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.bind_addr, "127.0.0.1:8000".parse().unwrap());
        assert_eq!(config.storage, StorageConfig::Sqlite("greenproof.db".into()));
        assert_eq!(config.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_port_and_bind() {
        let config = ServerConfig::from_lookup(lookup(&[("PORT", "9000")])).unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:9000".parse().unwrap());

        let config = ServerConfig::from_lookup(lookup(&[
            ("PORT", "9000"),
            ("GREENPROOF_BIND", "127.0.0.1:7000"),
        ]))
        .unwrap();
        assert_eq!(config.bind_addr, "127.0.0.1:7000".parse().unwrap());
    }

    #[test]
    fn test_memory_database() {
        let config = ServerConfig::from_lookup(lookup(&[("GREENPROOF_DB", ":memory:")])).unwrap();
        assert_eq!(config.storage, StorageConfig::Memory);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(ServerConfig::from_lookup(lookup(&[("PORT", "http")])).is_err());
        assert!(ServerConfig::from_lookup(lookup(&[("GREENPROOF_TIMEOUT_SECS", "-1")])).is_err());
    }
}
