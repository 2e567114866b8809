//! Folio server binary
//!
//! Loads configuration (file, `.env`, environment, flags) and starts the
//! HTTP server.

use clap::Parser;
use folio_server::{config::ServerConfig, start_server, ServerError};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

/// Book metadata and character-graph analysis service
#[derive(Parser, Debug)]
#[command(name = "folio-server", version, about, long_about = None)]
struct Cli {
    /// Load configuration from a TOML file
    #[arg(short, long, env = "FOLIO_CONFIG")]
    config: Option<PathBuf>,

    /// Override the listening port
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=info")),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), ServerError> {
    let mut config = match &cli.config {
        Some(path) => ServerConfig::from_file(path)?,
        None => ServerConfig::default(),
    };
    config.apply_env(|key| std::env::var(key).ok())?;
    if let Some(port) = cli.port {
        config.port = port;
    }

    start_server(config).await
}
