//! Coordinator server

use crate::common::{CoordinatorConfig, Result};
use crate::coordinator::broadcaster::Broadcaster;
use crate::coordinator::http::{create_router, CoordState};
use crate::coordinator::replica_client::{GrpcReplicaClient, ReplicaClient};
use crate::coordinator::writer::WriteCoordinator;
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

pub struct Coordinator {
    config: CoordinatorConfig,
    writer: Arc<WriteCoordinator>,
}

impl Coordinator {
    /// Build a coordinator for the configured replica set.
    ///
    /// Replica channels connect lazily, so this succeeds even while replicas
    /// are still starting. Must be called within a Tokio runtime.
    pub fn new(config: CoordinatorConfig) -> Result<Self> {
        let config = config.validate()?;

        let replicas = config
            .replicas
            .iter()
            .map(|addr| {
                GrpcReplicaClient::new(addr.clone(), config.connect_timeout())
                    .map(|c| Arc::new(c) as Arc<dyn ReplicaClient>)
            })
            .collect::<Result<Vec<_>>>()?;

        let broadcaster = Broadcaster::new(replicas, config.replication_timeout());
        let writer = Arc::new(WriteCoordinator::new(broadcaster));

        Ok(Self { config, writer })
    }

    pub fn writer(&self) -> Arc<WriteCoordinator> {
        self.writer.clone()
    }

    pub fn router(&self) -> Router {
        create_router(CoordState {
            writer: self.writer.clone(),
            health_probe_timeout: self.config.health_probe_timeout(),
        })
    }

    /// Bind the configured address and serve until shutdown.
    pub async fn serve(self) -> Result<()> {
        let listener = TcpListener::bind(self.config.bind_addr).await?;
        self.serve_on(listener).await
    }

    /// Serve on an already-bound listener.
    pub async fn serve_on(self, listener: TcpListener) -> Result<()> {
        tracing::info!("Starting coordinator");
        tracing::info!("  HTTP API: {}", listener.local_addr()?);
        tracing::info!("  Replicas: {:?}", self.config.replicas);
        tracing::info!("  Replication timeout: {:?}", self.config.replication_timeout());

        let app = self
            .router()
            .into_make_service_with_connect_info::<SocketAddr>();
        let http_server = axum::serve(listener, app);

        tracing::info!("✓ Coordinator ready");

        tokio::select! {
            res = http_server => {
                if let Err(e) = res {
                    tracing::error!("HTTP server error: {}", e);
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Shutdown signal received");
            }
        }

        Ok(())
    }
}
