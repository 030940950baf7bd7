//! Coordinator implementation
//!
//! The coordinator is responsible for:
//! - Ordering writes (one commit in flight at a time)
//! - Fanning each write out to every replica over gRPC
//! - Committing only after every replica acknowledged in time
//! - Serving the committed log

pub mod broadcaster;
pub mod http;
pub mod log;
pub mod replica_client;
pub mod server;
pub mod writer;

pub use broadcaster::{broadcast, Broadcaster};
pub use log::CoordinatorLog;
pub use replica_client::{GrpcReplicaClient, ReplicaClient};
pub use server::Coordinator;
pub use writer::{CommitResult, WriteCoordinator};
