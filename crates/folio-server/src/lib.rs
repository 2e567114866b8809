//! Folio Server
//!
//! HTTP façade over the metadata fetcher and the analysis pipeline, plus
//! the composition root that wires the concrete collaborators together.

#![warn(missing_docs)]

pub mod config;
pub mod handlers;

use config::{ConfigError, ServerConfig};
use folio_analyzer::Analyzer;
use folio_library::{ContentStore, LibraryError, MetadataFetcher};
use folio_llm::{GroqProvider, LlmError};
use handlers::{create_router, AppState};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::info;

/// Server error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Library client could not be built
    #[error("Library client error: {0}")]
    Library(#[from] LibraryError),

    /// LLM client could not be built
    #[error("LLM client error: {0}")]
    Llm(#[from] LlmError),

    /// Server binding error
    #[error("Failed to bind server: {0}")]
    Bind(#[from] std::io::Error),

    /// Server error
    #[error("Server error: {0}")]
    Server(String),
}

/// Build the application state from configuration
///
/// One content store is shared by the metadata route (background cache
/// warming) and the analyzer.
pub fn build_state(config: &ServerConfig) -> Result<AppState, ServerError> {
    config.validate()?;

    let library = config.library_config();
    let content = Arc::new(ContentStore::new(&library)?);
    let metadata = Arc::new(MetadataFetcher::new(&library)?);

    let api_key = config
        .groq_api_key
        .clone()
        .ok_or_else(|| ConfigError::MissingField("GROQ_API_KEY".to_string()))?;
    let provider = GroqProvider::new(&config.llm_base_url, &config.llm_model, api_key)?
        .with_timeout(Duration::from_secs(config.llm_timeout_secs))?;

    let analyzer = Analyzer::new(content.clone(), provider, config.analyzer.clone());

    Ok(AppState {
        metadata,
        content,
        analyzer: Arc::new(analyzer),
        environment: config.environment,
    })
}

/// Start the HTTP server
///
/// Wires the collaborators, binds the listener and serves until Ctrl-C or
/// SIGTERM.
pub async fn start_server(config: ServerConfig) -> Result<(), ServerError> {
    info!("Starting Folio server");
    info!("Environment: {}", config.environment);
    info!("Cache directory: {}", config.cache_dir.display());
    info!(
        "LLM model: {} ({:?} pipeline)",
        config.llm_model, config.analyzer.mode
    );

    let state = build_state(&config)?;
    let app = create_router(state, &config.api_prefix);

    let listener = TcpListener::bind(&config.bind_addr()).await?;
    info!(
        "Listening on {} (routes under '{}')",
        config.bind_addr(),
        config.api_prefix
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ServerError::Server(e.to_string()))?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received");
}
