//! Write coordinator
//!
//! Orders incoming writes and decides commit. `submit` holds the commit lock
//! for the whole broadcast-then-append sequence, so at most one write is in
//! flight and every replica receives entries in the order the coordinator
//! commits them. The caller is blocked until the broadcast resolves.

use crate::common::{validate_content, Candidate, Entry, Error, Result, METRICS};
use crate::coordinator::broadcaster::Broadcaster;
use crate::coordinator::log::CoordinatorLog;
use std::time::Instant;
use tokio::sync::Mutex;

/// Outcome of a submission: the committed entry, or
/// `Error::InvalidInput` / `Error::ReplicationFailed`.
pub type CommitResult = Result<Entry>;

pub struct WriteCoordinator {
    log: CoordinatorLog,
    broadcaster: Broadcaster,
    commit_lock: Mutex<()>,
}

impl WriteCoordinator {
    pub fn new(broadcaster: Broadcaster) -> Self {
        Self {
            log: CoordinatorLog::new(),
            broadcaster,
            commit_lock: Mutex::new(()),
        }
    }

    /// Replicate `content` to every replica and commit it on full acknowledgement.
    ///
    /// On failure the coordinator log is left untouched and no sequence
    /// number is consumed. Replicas that acknowledged before the failure keep
    /// the entry.
    pub async fn submit(&self, content: impl Into<String>) -> CommitResult {
        let content = content.into();
        if let Err(e) = validate_content(&content) {
            METRICS.submissions_rejected.inc();
            return Err(e);
        }

        let candidate = Candidate::new(content);

        let _commit = self.commit_lock.lock().await;
        let start = Instant::now();

        match self.broadcaster.broadcast(&candidate).await {
            Ok(acks) => {
                let entry = self.log.append(candidate);
                let elapsed = start.elapsed();
                METRICS.submissions_committed.inc();
                METRICS.commit_latency.observe_duration(elapsed);
                tracing::info!(
                    sequence_number = entry.sequence_number,
                    acks,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "Entry committed"
                );
                Ok(entry)
            }
            Err(cause) => {
                METRICS.submissions_failed.inc();
                tracing::error!(
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Replication failed, entry not committed: {}",
                    cause
                );
                Err(Error::replication_failed(cause))
            }
        }
    }

    /// Snapshot of the committed log. Never waits for an in-flight submit.
    pub fn list(&self) -> Vec<Entry> {
        self.log.list()
    }

    pub fn log(&self) -> &CoordinatorLog {
        &self.log
    }

    pub fn broadcaster(&self) -> &Broadcaster {
        &self.broadcaster
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinator::broadcaster::tests::{as_clients, Behavior, MockReplica};
    use std::sync::Arc;
    use std::time::Duration;

    fn coordinator(mocks: &[Arc<MockReplica>], timeout: Duration) -> WriteCoordinator {
        WriteCoordinator::new(Broadcaster::new(as_clients(mocks), timeout))
    }

    #[tokio::test]
    async fn test_submit_commits_in_order() {
        let mocks = vec![MockReplica::healthy("r1"), MockReplica::healthy("r2")];
        let writer = coordinator(&mocks, Duration::from_secs(1));

        let a = writer.submit("a").await.unwrap();
        let b = writer.submit("b").await.unwrap();
        assert_eq!(a.sequence_number, 1);
        assert_eq!(b.sequence_number, 2);

        let contents: Vec<_> = writer.list().into_iter().map(|e| e.content).collect();
        assert_eq!(contents, vec!["a", "b"]);
        for m in &mocks {
            assert_eq!(m.contents(), vec!["a", "b"]);
        }
    }

    #[tokio::test]
    async fn test_invalid_input_has_no_side_effects() {
        let mocks = vec![MockReplica::healthy("r1")];
        let writer = coordinator(&mocks, Duration::from_secs(1));

        let err = writer.submit("").await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert!(writer.list().is_empty());
        assert!(mocks[0].contents().is_empty());
    }

    #[tokio::test]
    async fn test_whitespace_content_is_committed_verbatim() {
        let mocks = vec![MockReplica::healthy("r1")];
        let writer = coordinator(&mocks, Duration::from_secs(1));

        let entry = writer.submit("   ").await.unwrap();
        assert_eq!(entry.sequence_number, 1);
        assert_eq!(entry.content, "   ");
        assert_eq!(mocks[0].contents(), vec!["   "]);
    }

    #[tokio::test]
    async fn test_failed_replication_leaves_log_unchanged() {
        let mocks = vec![
            MockReplica::healthy("r1"),
            MockReplica::new("r2", Behavior::Nack, Duration::ZERO),
        ];
        let writer = coordinator(&mocks, Duration::from_secs(1));

        let before = writer.log().len();
        let err = writer.submit("x").await.unwrap_err();
        assert_eq!(writer.log().len(), before);

        match err {
            Error::ReplicationFailed { cause } => {
                assert!(matches!(*cause, Error::ReplicaRejected { .. }))
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_aborted_writes_leave_no_sequence_gap() {
        let mocks = vec![
            MockReplica::healthy("r1"),
            MockReplica::new("r2", Behavior::FailOnCall(2), Duration::ZERO),
        ];
        let writer = coordinator(&mocks, Duration::from_secs(1));

        assert_eq!(writer.submit("a").await.unwrap().sequence_number, 1);
        assert!(writer.submit("b").await.is_err());
        assert_eq!(writer.submit("c").await.unwrap().sequence_number, 2);

        let committed: Vec<_> = writer.list().into_iter().map(|e| e.content).collect();
        assert_eq!(committed, vec!["a", "c"]);
    }

    #[tokio::test]
    async fn test_concurrent_submits_are_serialized() {
        let mocks = vec![
            MockReplica::new("r1", Behavior::Ack, Duration::from_millis(5)),
            MockReplica::new("r2", Behavior::Ack, Duration::from_millis(1)),
        ];
        let writer = Arc::new(coordinator(&mocks, Duration::from_secs(5)));

        let handles: Vec<_> = (0..20)
            .map(|i| {
                let writer = writer.clone();
                tokio::spawn(async move { writer.submit(format!("msg-{i}")).await })
            })
            .collect();
        for h in handles {
            h.await.unwrap().unwrap();
        }

        let committed: Vec<_> = writer.list().into_iter().map(|e| e.content).collect();
        assert_eq!(committed.len(), 20);
        for (i, entry) in writer.list().iter().enumerate() {
            assert_eq!(entry.sequence_number, i as u64 + 1);
        }
        // Every replica saw exactly the coordinator's order
        for m in &mocks {
            assert_eq!(m.contents(), committed);
        }
    }

    #[tokio::test]
    async fn test_list_does_not_block_on_inflight_submit() {
        let mocks = vec![MockReplica::new("slow", Behavior::Ack, Duration::from_millis(500))];
        let writer = Arc::new(coordinator(&mocks, Duration::from_secs(5)));

        let w = writer.clone();
        let submit = tokio::spawn(async move { w.submit("pending").await });
        tokio::time::sleep(Duration::from_millis(50)).await;

        let start = std::time::Instant::now();
        assert!(writer.list().is_empty());
        assert!(start.elapsed() < Duration::from_millis(100));

        submit.await.unwrap().unwrap();
        assert_eq!(writer.list().len(), 1);
    }
}
