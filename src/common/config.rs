//! Configuration for replog components
//!
//! Sources are layered lowest to highest: built-in defaults, an optional TOML
//! file, then `REPLOG_*` environment variables (nested keys use `__`, e.g.
//! `REPLOG_COORDINATOR__REPLICAS=replica-1:50051,replica-2:50051`). Command
//! line flags are applied on top by the binaries.

use crate::common::utils::normalize_replica_addr;
use crate::common::{Error, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable naming a config file
pub const CONFIG_ENV: &str = "REPLOG_CONFIG";

/// Global configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Coordinator-specific config
    pub coordinator: CoordinatorConfig,

    /// Replica-specific config
    pub replica: ReplicaConfig,

    /// Logging level
    pub log_level: Option<String>,
}

impl Config {
    /// Load configuration from `path` (or `$REPLOG_CONFIG`) and the environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path: Option<PathBuf> = path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));

        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }
        builder = builder.add_source(
            config::Environment::with_prefix("REPLOG")
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("coordinator.replicas")
                .try_parsing(true),
        );

        let config: Config = builder.build()?.try_deserialize()?;
        Ok(config)
    }
}

/// Coordinator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CoordinatorConfig {
    /// Bind address for HTTP API
    pub bind_addr: SocketAddr,

    /// gRPC addresses of every replica (all must ack a write)
    pub replicas: Vec<String>,

    /// Bounded wait for a broadcast to be fully acknowledged
    pub replication_timeout_ms: u64,

    /// TCP connect timeout for replica channels
    pub connect_timeout_ms: u64,

    /// Timeout for heartbeat probes issued by the health endpoint
    pub health_probe_timeout_ms: u64,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8000)),
            replicas: Vec::new(),
            replication_timeout_ms: 60_000,
            connect_timeout_ms: 1_000,
            health_probe_timeout_ms: 1_000,
        }
    }
}

impl CoordinatorConfig {
    pub fn replication_timeout(&self) -> Duration {
        Duration::from_millis(self.replication_timeout_ms)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn health_probe_timeout(&self) -> Duration {
        Duration::from_millis(self.health_probe_timeout_ms)
    }

    /// Check invariants and normalize replica addresses into dialable URIs.
    pub fn validate(mut self) -> Result<Self> {
        if self.replication_timeout_ms == 0 {
            return Err(Error::InvalidConfig(
                "replication timeout must be greater than zero".into(),
            ));
        }

        self.replicas = self
            .replicas
            .iter()
            .filter(|r| !r.trim().is_empty())
            .map(|r| normalize_replica_addr(r))
            .collect::<Result<Vec<_>>>()?;

        Ok(self)
    }
}

/// Replica configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplicaConfig {
    /// Identifier reported in heartbeats and health checks
    pub replica_id: String,

    /// Bind address for HTTP read API
    pub bind_addr: SocketAddr,

    /// Bind address for the replication gRPC service
    pub grpc_addr: SocketAddr,

    /// Artificial delay before applying each append
    pub delay_ms: u64,
}

impl Default for ReplicaConfig {
    fn default() -> Self {
        Self {
            replica_id: "replica-1".to_string(),
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8001)),
            grpc_addr: SocketAddr::from(([0, 0, 0, 0], 50051)),
            delay_ms: 0,
        }
    }
}

impl ReplicaConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}
