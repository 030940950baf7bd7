//! Replication broadcaster
//!
//! Fans a candidate entry out to every replica at once and reduces the
//! answers to one decision: success only if every replica acknowledges
//! before the deadline. The first failure, negative ack or timeout ends the
//! broadcast; calls still in flight are dropped and never retried.
//!
//! Nothing is undone on replicas that already acknowledged a failed
//! broadcast, and a replica whose call was abandoned may still apply the
//! entry. Both leave that replica holding an entry the coordinator never
//! committed.

use crate::common::{Candidate, Error, Result, METRICS};
use crate::coordinator::replica_client::ReplicaClient;
use futures_util::stream::{FuturesUnordered, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Send `candidate` to all of `replicas` concurrently and wait at most
/// `timeout` for every one of them to acknowledge.
///
/// Returns the number of acknowledgements on success. An empty replica set
/// succeeds immediately.
pub async fn broadcast(
    candidate: &Candidate,
    replicas: &[Arc<dyn ReplicaClient>],
    timeout: Duration,
) -> Result<usize> {
    if replicas.is_empty() {
        return Ok(0);
    }

    let start = Instant::now();
    let deadline = start + timeout;

    let mut pending: FuturesUnordered<_> = replicas
        .iter()
        .map(move |replica| async move {
            match tokio::time::timeout_at(deadline, replica.append_entry(candidate)).await {
                Ok(Ok(true)) => Ok(replica.addr()),
                Ok(Ok(false)) => Err(Error::ReplicaRejected {
                    replica: replica.addr().to_string(),
                }),
                Ok(Err(e)) => Err(e),
                Err(_) => Err(Error::ReplicaTimeout {
                    replica: replica.addr().to_string(),
                    timeout,
                }),
            }
        })
        .collect();

    let mut acks = 0;
    while let Some(outcome) = pending.next().await {
        match outcome {
            Ok(addr) => {
                acks += 1;
                METRICS.replica_acks.inc();
                tracing::debug!(
                    replica = %addr,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "ACK received"
                );
            }
            Err(e) => {
                if matches!(e, Error::ReplicaTimeout { .. }) {
                    METRICS.replica_timeouts.inc();
                } else {
                    METRICS.replica_failures.inc();
                }
                tracing::warn!(
                    acks,
                    outstanding = pending.len(),
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Broadcast aborted: {}",
                    e
                );
                return Err(e);
            }
        }
    }

    Ok(acks)
}

/// A fixed replica set and timeout bound together
pub struct Broadcaster {
    replicas: Vec<Arc<dyn ReplicaClient>>,
    timeout: Duration,
}

impl Broadcaster {
    pub fn new(replicas: Vec<Arc<dyn ReplicaClient>>, timeout: Duration) -> Self {
        Self { replicas, timeout }
    }

    pub fn replicas(&self) -> &[Arc<dyn ReplicaClient>] {
        &self.replicas
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub async fn broadcast(&self, candidate: &Candidate) -> Result<usize> {
        broadcast(candidate, &self.replicas, self.timeout).await
    }
}
