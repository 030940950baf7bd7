//! Replica replication endpoint (internal gRPC)
//!
//! Accepts one entry per call from the coordinator, waits out the configured
//! processing delay, appends it to the local store and acknowledges. A call
//! that completes always acknowledges positively; the coordinator only sees
//! failure through transport errors or its own timeout.

use crate::common::{Candidate, METRICS};
use crate::proto::replication_service_server::{ReplicationService, ReplicationServiceServer};
use crate::proto::{Ack, AppendEntryRequest, HeartbeatRequest, HeartbeatResponse};
use crate::replica::store::ReplicaStore;
use std::time::Duration;
use tonic::{Request, Response, Status};

pub struct ReplicationEndpoint {
    store: ReplicaStore,
    replica_id: String,
    delay: Duration,
}

impl ReplicationEndpoint {
    pub fn new(store: ReplicaStore, replica_id: String, delay: Duration) -> Self {
        Self {
            store,
            replica_id,
            delay,
        }
    }

    /// Converts this service into a gRPC server instance.
    pub fn into_server(self) -> ReplicationServiceServer<Self> {
        ReplicationServiceServer::new(self)
    }
}

#[tonic::async_trait]
impl ReplicationService for ReplicationEndpoint {
    async fn append_entry(
        &self,
        req: Request<AppendEntryRequest>,
    ) -> Result<Response<Ack>, Status> {
        let candidate = Candidate::from(req.into_inner());
        tracing::info!(replica = %self.replica_id, content = %candidate.content, "Received append");

        if !self.delay.is_zero() {
            tracing::debug!(replica = %self.replica_id, delay_ms = self.delay.as_millis() as u64, "Delaying append");
            tokio::time::sleep(self.delay).await;
        }

        let entry = self.store.append(candidate);
        METRICS.replica_appends.inc();
        tracing::info!(
            replica = %self.replica_id,
            sequence_number = entry.sequence_number,
            "Entry appended"
        );

        Ok(Response::new(Ack { success: true }))
    }

    async fn heartbeat(
        &self,
        _req: Request<HeartbeatRequest>,
    ) -> Result<Response<HeartbeatResponse>, Status> {
        Ok(Response::new(HeartbeatResponse {
            replica_id: self.replica_id.clone(),
            entries: self.store.len() as u64,
        }))
    }
}
