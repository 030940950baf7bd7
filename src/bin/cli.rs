//! Command-line client for a replog cluster

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "replog")]
#[command(about = "replog replicated log client")]
#[command(version)]
struct Cli {
    /// Base URL of the node to talk to (coordinator for writes, any node for reads)
    #[arg(long, global = true, default_value = "http://localhost:8000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Submit a message to the coordinator
    Submit {
        /// Message content
        message: String,
    },

    /// List the log of a coordinator or replica
    List,

    /// Show node health
    Health,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let base = cli.url.trim_end_matches('/');
    let client = reqwest::Client::new();

    match cli.command {
        Commands::Submit { message } => {
            let resp = client
                .post(format!("{base}/api/messages"))
                .json(&json!({ "message": message }))
                .send()
                .await
                .with_context(|| format!("failed to reach {base}"))?;
            let status = resp.status();
            let body: Value = resp.json().await.context("invalid response body")?;
            if !status.is_success() {
                bail!(
                    "write not committed ({}): {}",
                    status,
                    body["error"].as_str().unwrap_or("unknown error")
                );
            }
            println!("committed #{}", body["sequence_number"]);
        }

        Commands::List => {
            let body: Value = client
                .get(format!("{base}/api/messages"))
                .send()
                .await
                .with_context(|| format!("failed to reach {base}"))?
                .error_for_status()?
                .json()
                .await?;
            let messages = body["messages"].as_array().cloned().unwrap_or_default();
            for m in messages {
                println!(
                    "{:>6}  {}  {}",
                    m["sequence_number"],
                    m["received_at"].as_str().unwrap_or("-"),
                    m["content"].as_str().unwrap_or_default()
                );
            }
        }

        Commands::Health => {
            let body: Value = client
                .get(format!("{base}/health"))
                .send()
                .await
                .with_context(|| format!("failed to reach {base}"))?
                .json()
                .await?;
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
    }

    Ok(())
}
