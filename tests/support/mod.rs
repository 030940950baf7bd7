//! Shared helpers for integration tests: in-process replicas and coordinators
//! listening on ephemeral localhost ports.

#![allow(dead_code)]

use replog::common::{CoordinatorConfig, ReplicaConfig};
use replog::coordinator::WriteCoordinator;
use replog::replica::ReplicaStore;
use replog::{Coordinator, ReplicaServer};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

pub struct TestReplica {
    pub grpc_url: String,
    pub http_url: String,
    pub store: ReplicaStore,
}

impl TestReplica {
    pub fn contents(&self) -> Vec<String> {
        self.store.list().into_iter().map(|e| e.content).collect()
    }
}

pub async fn spawn_replica(id: &str, delay: Duration) -> TestReplica {
    let http = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let grpc = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let http_url = format!("http://{}", http.local_addr().unwrap());
    let grpc_url = format!("http://{}", grpc.local_addr().unwrap());

    let server = ReplicaServer::new(ReplicaConfig {
        replica_id: id.to_string(),
        delay_ms: delay.as_millis() as u64,
        ..Default::default()
    });
    let store = server.store();
    tokio::spawn(server.serve_on(http, grpc));

    TestReplica {
        grpc_url,
        http_url,
        store,
    }
}

pub fn coordinator_config(replicas: &[&TestReplica], timeout: Duration) -> CoordinatorConfig {
    CoordinatorConfig {
        replicas: replicas.iter().map(|r| r.grpc_url.clone()).collect(),
        replication_timeout_ms: timeout.as_millis() as u64,
        ..Default::default()
    }
}

pub fn writer(replicas: &[&TestReplica], timeout: Duration) -> Arc<WriteCoordinator> {
    Coordinator::new(coordinator_config(replicas, timeout))
        .unwrap()
        .writer()
}

/// Start a coordinator HTTP server; returns its base URL and write path.
pub async fn spawn_coordinator(
    replicas: &[&TestReplica],
    timeout: Duration,
) -> (String, Arc<WriteCoordinator>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    let coord = Coordinator::new(coordinator_config(replicas, timeout)).unwrap();
    let writer = coord.writer();
    tokio::spawn(coord.serve_on(listener));
    (url, writer)
}

/// An address nothing listens on
pub fn dead_addr() -> String {
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    format!("http://127.0.0.1:{port}")
}
