//! # replog
//!
//! A single-coordinator replicated append-only log:
//! - One coordinator accepts writes and assigns their order
//! - Each write is sent to every replica in parallel over gRPC
//! - A write is committed (and acknowledged) only after all replicas ack
//!   within the configured timeout
//! - Replicas expose their copy of the log over HTTP
//!
//! All state lives in memory; restarting a node clears its log.
//!
//! ## Architecture
//!
//! ```text
//!        POST /api/messages
//!               │
//! ┌─────────────▼──────────────┐
//! │        Coordinator         │
//! │  commit lock → broadcast   │
//! │  → append on all-ack       │
//! └──────┬──────────────┬──────┘
//!        │ gRPC         │ gRPC
//!  ┌─────▼─────┐  ┌─────▼─────┐
//!  │ Replica 1 │  │ Replica 2 │
//!  │ (delay?)  │  │ (delay?)  │
//!  └───────────┘  └───────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! replog-replica serve --id replica-1 --bind 0.0.0.0:8001 --grpc 0.0.0.0:50051
//! replog-replica serve --id replica-2 --bind 0.0.0.0:8002 --grpc 0.0.0.0:50052 --delay 2s
//! replog-coord serve --bind 0.0.0.0:8000 \
//!   --replicas localhost:50051,localhost:50052 --timeout 5s
//!
//! replog submit "hello" --url http://localhost:8000
//! replog list --url http://localhost:8001
//! ```

#![allow(clippy::result_large_err)]

pub mod common;
pub mod coordinator;
pub mod replica;

pub use common::{Config, Entry, Error, Result};
pub use coordinator::Coordinator;
pub use replica::ReplicaServer;

// Generated protobuf code
pub mod proto {
    tonic::include_proto!("replog");
}

/// Current version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
