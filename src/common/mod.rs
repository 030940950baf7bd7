//! Common utilities and types shared across replog

pub mod config;
pub mod entry;
pub mod error;
pub mod metrics;
pub mod tracing_middleware;
pub mod utils;

pub use config::{Config, CoordinatorConfig, ReplicaConfig};
pub use entry::{Candidate, Entry};
pub use error::{Error, Result};
pub use metrics::METRICS;
pub use utils::{normalize_replica_addr, parse_duration, validate_content};
