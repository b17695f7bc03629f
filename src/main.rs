//! Krishi advisory server entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use krishi::{
    create_router, ApiState, Authenticator, Config, MemoryStorage, PerplexityClient,
};

/// Krishi: AI agricultural advisory server
#[derive(Parser, Debug)]
#[command(name = "krishi")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the advisory server (default behavior)
    Serve {
        /// Listen port. If not specified, uses the config file value.
        #[arg(short, long)]
        port: Option<u16>,
        /// Enable JSON logging format
        #[arg(long)]
        json_logs: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let (port, json_logs) = match args.command {
        Some(Command::Serve { port, json_logs }) => (port, json_logs),
        None => (None, false),
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    let mut config = if let Some(path) = &args.config {
        Config::from_file(path)?
    } else {
        Config::load()?
    };
    if let Some(port) = port {
        config.server.port = port;
    }

    run_server(config).await
}

async fn run_server(config: Config) -> anyhow::Result<()> {
    let storage = Arc::new(MemoryStorage::new());
    let provider = Arc::new(PerplexityClient::from_config(&config.ai)?);
    let authenticator = Arc::new(Authenticator::new(config.auth.clone()));

    let state = Arc::new(ApiState::new(
        storage,
        provider,
        authenticator,
        config.ai.max_concurrent_requests,
    ));
    let app = create_router(state, &config.server);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    info!("Krishi advisory server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    info!("Krishi advisory server shutting down");
    Ok(())
}
