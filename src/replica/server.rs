//! Replica server

use crate::common::{ReplicaConfig, Result};
use crate::replica::grpc::ReplicationEndpoint;
use crate::replica::http::{create_router, ReplicaState};
use crate::replica::store::ReplicaStore;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;

pub struct ReplicaServer {
    config: ReplicaConfig,
    store: ReplicaStore,
}

impl ReplicaServer {
    pub fn new(config: ReplicaConfig) -> Self {
        Self {
            config,
            store: ReplicaStore::new(),
        }
    }

    /// Handle to the replica's log (state is shared with the running server)
    pub fn store(&self) -> ReplicaStore {
        self.store.clone()
    }

    /// Bind the configured addresses and serve until shutdown.
    pub async fn serve(self) -> Result<()> {
        let http_listener = TcpListener::bind(self.config.bind_addr).await?;
        let grpc_listener = TcpListener::bind(self.config.grpc_addr).await?;
        self.serve_on(http_listener, grpc_listener).await
    }

    /// Serve on already-bound listeners.
    pub async fn serve_on(self, http_listener: TcpListener, grpc_listener: TcpListener) -> Result<()> {
        tracing::info!("Starting replica: {}", self.config.replica_id);
        tracing::info!("  HTTP API: {}", http_listener.local_addr()?);
        tracing::info!("  gRPC API: {}", grpc_listener.local_addr()?);
        tracing::info!("  Processing delay: {:?}", self.config.delay());

        let http_state = ReplicaState {
            store: self.store.clone(),
            replica_id: self.config.replica_id.clone(),
            delay: self.config.delay(),
        };
        let http_server = axum::serve(
            http_listener,
            create_router(http_state).into_make_service_with_connect_info::<SocketAddr>(),
        );

        let endpoint = ReplicationEndpoint::new(
            self.store.clone(),
            self.config.replica_id.clone(),
            self.config.delay(),
        );
        let grpc_server = tonic::transport::Server::builder()
            .add_service(endpoint.into_server())
            .serve_with_incoming(TcpListenerStream::new(grpc_listener));

        tracing::info!("✓ Replica ready");

        tokio::select! {
            res = http_server => {
                if let Err(e) = res {
                    tracing::error!("HTTP server error: {}", e);
                }
            }
            res = grpc_server => {
                if let Err(e) = res {
                    tracing::error!("gRPC server error: {}", e);
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Shutdown signal received");
            }
        }

        Ok(())
    }
}
