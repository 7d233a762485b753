//! CLI entry point for the staffgraph HTTP service.

use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use staffgraph_core::AppConfig;
use staffgraph_graph::{GraphClient, GraphConfig, StaffStore};

#[derive(Parser)]
#[command(name = "staffgraph")]
#[command(about = "Employee and department graph API backed by Neo4j")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Config file prefix (default: staffgraph).
    #[arg(short, long, default_value = "staffgraph", global = true)]
    config: String,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the HTTP API.
    Serve {
        /// Override the bind address from config.
        #[arg(long)]
        bind: Option<String>,
    },
    /// Load the demonstration dataset. Running it twice duplicates nodes.
    Seed,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).json().init();

    let cli = Cli::parse();
    let app_config = AppConfig::load(&cli.config)?;

    let graph = GraphClient::connect(&GraphConfig::from(&app_config.neo4j)).await?;

    match cli.command {
        Command::Serve { bind } => {
            let addr = bind.unwrap_or(app_config.server.bind);
            let store: Arc<dyn StaffStore> = Arc::new(graph);
            let app = staffgraph_api::router(store);

            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!(addr = %addr, "HTTP server listening");
            axum::serve(listener, app)
                .with_graceful_shutdown(shutdown_signal())
                .await?;
        }
        Command::Seed => {
            graph.seed().await?;
        }
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutting down");
}
