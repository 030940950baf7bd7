//! Replica binary

use clap::{Parser, Subcommand};
use replog::common::{parse_duration, Config};
use replog::ReplicaServer;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "replog-replica")]
#[command(about = "replog replica: stores replicated entries and serves reads")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start replica server
    Serve {
        /// TOML config file (also read from REPLOG_CONFIG)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Replica ID
        #[arg(long)]
        id: Option<String>,

        /// Bind address for HTTP
        #[arg(long)]
        bind: Option<SocketAddr>,

        /// Bind address for gRPC
        #[arg(long)]
        grpc: Option<SocketAddr>,

        /// Artificial delay applied before each append, e.g. "2s"
        #[arg(long, value_parser = duration_arg)]
        delay: Option<Duration>,

        /// Log level (trace, debug, info, warn, error); RUST_LOG wins if set
        #[arg(long)]
        log_level: Option<String>,
    },
}

fn duration_arg(s: &str) -> Result<Duration, String> {
    parse_duration(s).map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            config,
            id,
            bind,
            grpc,
            delay,
            log_level,
        } => {
            let file_config = Config::load(config.as_deref())?;

            let level = log_level
                .or(file_config.log_level)
                .unwrap_or_else(|| "info".to_string());
            tracing_subscriber::registry()
                .with(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| level.into()),
                )
                .with(tracing_subscriber::fmt::layer())
                .init();

            let mut replica_config = file_config.replica;
            if let Some(id) = id {
                replica_config.replica_id = id;
            }
            if let Some(bind) = bind {
                replica_config.bind_addr = bind;
            }
            if let Some(grpc) = grpc {
                replica_config.grpc_addr = grpc;
            }
            if let Some(delay) = delay {
                replica_config.delay_ms = delay.as_millis() as u64;
            }

            ReplicaServer::new(replica_config).serve().await?;
        }
    }

    Ok(())
}
