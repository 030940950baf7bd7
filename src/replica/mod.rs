//! Replica implementation
//!
//! A replica keeps an in-memory copy of every entry the coordinator sends it:
//! - gRPC `AppendEntry` endpoint with optional artificial delay
//! - Append-only store guarded by a lock
//! - HTTP read API for external verification

pub mod grpc;
pub mod http;
pub mod server;
pub mod store;

pub use grpc::ReplicationEndpoint;
pub use server::ReplicaServer;
pub use store::ReplicaStore;
