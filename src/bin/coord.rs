//! Coordinator binary

use clap::{Parser, Subcommand};
use replog::common::{parse_duration, Config};
use replog::Coordinator;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "replog-coord")]
#[command(about = "replog coordinator: orders writes and replicates them to every replica")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start coordinator server
    Serve {
        /// TOML config file (also read from REPLOG_CONFIG)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Bind address for HTTP
        #[arg(long)]
        bind: Option<SocketAddr>,

        /// Replica gRPC addresses (comma-separated)
        #[arg(long, value_delimiter = ',')]
        replicas: Vec<String>,

        /// Replication timeout, e.g. "5s" or "500ms"
        #[arg(long, value_parser = duration_arg)]
        timeout: Option<Duration>,

        /// Connect timeout for replica channels
        #[arg(long, value_parser = duration_arg)]
        connect_timeout: Option<Duration>,

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
            bind,
            replicas,
            timeout,
            connect_timeout,
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

            // CLI has priority over file and environment
            let mut coord_config = file_config.coordinator;
            if let Some(bind) = bind {
                coord_config.bind_addr = bind;
            }
            if !replicas.is_empty() {
                coord_config.replicas = replicas;
            }
            if let Some(timeout) = timeout {
                coord_config.replication_timeout_ms = timeout.as_millis() as u64;
            }
            if let Some(connect_timeout) = connect_timeout {
                coord_config.connect_timeout_ms = connect_timeout.as_millis() as u64;
            }

            if coord_config.replicas.is_empty() {
                tracing::warn!("No replicas configured; writes will commit locally only");
            }

            let coord = Coordinator::new(coord_config)?;
            coord.serve().await?;
        }
    }

    Ok(())
}
