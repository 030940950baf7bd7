//! Error types for replog

use std::time::Duration;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    // === I/O Errors ===
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // === Request Errors ===
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // === Replication Errors ===
    #[error("Replica {replica} unreachable: {reason}")]
    ReplicaUnreachable { replica: String, reason: String },

    #[error("Replica {replica} did not respond within {timeout:?}")]
    ReplicaTimeout { replica: String, timeout: Duration },

    #[error("Replica {replica} returned a negative acknowledgement")]
    ReplicaRejected { replica: String },

    #[error("Replication failed: {cause}")]
    ReplicationFailed {
        #[source]
        cause: Box<Error>,
    },

    // === Network Errors ===
    #[error("Transport error: {0}")]
    Transport(#[from] tonic::transport::Error),

    // === Config Errors ===
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl Error {
    /// Wrap a replica-level failure into the aggregate outcome the caller sees.
    pub fn replication_failed(cause: Error) -> Self {
        Error::ReplicationFailed {
            cause: Box::new(cause),
        }
    }

    /// Is this a failure attributable to a single replica?
    pub fn is_replica_failure(&self) -> bool {
        matches!(
            self,
            Error::ReplicaUnreachable { .. }
                | Error::ReplicaTimeout { .. }
                | Error::ReplicaRejected { .. }
        )
    }

    /// Convert to HTTP status code
    pub fn to_http_status(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            Error::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Error::InvalidConfig(_) | Error::Config(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replication_failed_keeps_cause() {
        let err = Error::replication_failed(Error::ReplicaTimeout {
            replica: "http://replica-1:50051".into(),
            timeout: Duration::from_millis(200),
        });

        let msg = err.to_string();
        assert!(msg.starts_with("Replication failed"));
        assert!(msg.contains("replica-1"));

        match err {
            Error::ReplicationFailed { cause } => assert!(cause.is_replica_failure()),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_http_status_mapping() {
        use axum::http::StatusCode;

        assert_eq!(
            Error::InvalidInput("empty".into()).to_http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            Error::replication_failed(Error::ReplicaRejected {
                replica: "r".into()
            })
            .to_http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            Error::from(std::io::Error::other("bind failed")).to_http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
