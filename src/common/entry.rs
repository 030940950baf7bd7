//! Log entry types shared by the coordinator and replicas

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A committed unit of the replicated log.
///
/// Entries are immutable once appended; the sequence number is the 1-based
/// position in the log that holds it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub sequence_number: u64,
    pub content: String,
    pub received_at: DateTime<Utc>,
}

/// A write that has been accepted but not yet committed.
///
/// Candidates carry no sequence number: one is assigned only when the
/// candidate is appended, so aborted writes leave no gaps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub content: String,
    pub received_at: DateTime<Utc>,
}

impl Candidate {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            received_at: Utc::now(),
        }
    }

    /// Promote to a committed entry at `sequence_number`.
    pub fn commit(self, sequence_number: u64) -> Entry {
        Entry {
            sequence_number,
            content: self.content,
            received_at: self.received_at,
        }
    }
}

impl From<&Candidate> for crate::proto::AppendEntryRequest {
    fn from(candidate: &Candidate) -> Self {
        crate::proto::AppendEntryRequest {
            content: candidate.content.clone(),
            received_at_ms: candidate.received_at.timestamp_millis(),
        }
    }
}

impl From<crate::proto::AppendEntryRequest> for Candidate {
    fn from(req: crate::proto::AppendEntryRequest) -> Self {
        // Fall back to local receive time if the coordinator sent garbage.
        let received_at =
            DateTime::<Utc>::from_timestamp_millis(req.received_at_ms).unwrap_or_else(Utc::now);
        Candidate {
            content: req.content,
            received_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commit_assigns_sequence_number() {
        let candidate = Candidate::new("hello");
        let received_at = candidate.received_at;

        let entry = candidate.commit(7);
        assert_eq!(entry.sequence_number, 7);
        assert_eq!(entry.content, "hello");
        assert_eq!(entry.received_at, received_at);
    }

    #[test]
    fn test_wire_conversion_keeps_millis() {
        let candidate = Candidate::new("x");
        let req: crate::proto::AppendEntryRequest = (&candidate).into();
        assert_eq!(req.content, "x");

        let back = Candidate::from(req);
        assert_eq!(back.content, "x");
        assert_eq!(
            back.received_at.timestamp_millis(),
            candidate.received_at.timestamp_millis()
        );
    }

    #[test]
    fn test_entry_serializes_flat() {
        let entry = Candidate::new("a").commit(1);
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["sequence_number"], 1);
        assert_eq!(json["content"], "a");
        assert!(json["received_at"].is_string());
    }
}
