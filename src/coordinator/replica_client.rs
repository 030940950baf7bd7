//! Client side of the replication RPC
//!
//! `ReplicaClient` is the seam the broadcaster talks through; the gRPC
//! implementation is used in deployment, tests can substitute their own.

use crate::common::{Candidate, Error, Result};
use crate::proto::replication_service_client::ReplicationServiceClient;
use crate::proto::{AppendEntryRequest, HeartbeatRequest, HeartbeatResponse};
use std::time::Duration;
use tonic::transport::{Channel, Endpoint};

#[tonic::async_trait]
pub trait ReplicaClient: Send + Sync {
    /// Address used to identify this replica in logs and errors
    fn addr(&self) -> &str;

    /// Deliver one candidate entry. `Ok(success)` mirrors the replica's ack.
    async fn append_entry(&self, candidate: &Candidate) -> Result<bool>;

    /// Liveness probe
    async fn heartbeat(&self) -> Result<HeartbeatResponse>;
}

/// gRPC replica client over a lazily connected channel
#[derive(Debug, Clone)]
pub struct GrpcReplicaClient {
    addr: String,
    client: ReplicationServiceClient<Channel>,
}

impl GrpcReplicaClient {
    /// Create a client for `addr`. No connection is made until the first call.
    pub fn new(addr: impl Into<String>, connect_timeout: Duration) -> Result<Self> {
        let addr = addr.into();
        let channel = Endpoint::from_shared(addr.clone())?
            .connect_timeout(connect_timeout)
            .connect_lazy();
        Ok(Self {
            addr,
            client: ReplicationServiceClient::new(channel),
        })
    }

    fn map_status(&self, status: tonic::Status) -> Error {
        Error::ReplicaUnreachable {
            replica: self.addr.clone(),
            reason: format!("{:?}: {}", status.code(), status.message()),
        }
    }
}

#[tonic::async_trait]
impl ReplicaClient for GrpcReplicaClient {
    fn addr(&self) -> &str {
        &self.addr
    }

    async fn append_entry(&self, candidate: &Candidate) -> Result<bool> {
        // Channel clones share one connection
        let mut client = self.client.clone();
        let request = tonic::Request::new(AppendEntryRequest::from(candidate));
        let ack = client
            .append_entry(request)
            .await
            .map_err(|s| self.map_status(s))?
            .into_inner();
        Ok(ack.success)
    }

    async fn heartbeat(&self) -> Result<HeartbeatResponse> {
        let mut client = self.client.clone();
        let response = client
            .heartbeat(HeartbeatRequest {})
            .await
            .map_err(|s| self.map_status(s))?;
        Ok(response.into_inner())
    }
}
