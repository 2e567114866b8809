//! HTTP request handlers for the book service.
//!
//! Routes for metadata, analysis and health check using axum. Every
//! failure is answered with the `{status, error, message}` body.

use crate::config::Environment;
use axum::{
    extract::{OriginalUri, Path, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router as AxumRouter,
};
use folio_domain::traits::{BookAnalysis, ContentSource, MetadataSource};
use folio_domain::{AnalysisResult, ApiError, BookId, BookMetadata, LibraryError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{debug, error, warn, Level};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Metadata lookups
    pub metadata: Arc<dyn MetadataSource>,
    /// Content cache, warmed in the background by the metadata route
    pub content: Arc<dyn ContentSource>,
    /// The analysis pipeline
    pub analyzer: Arc<dyn BookAnalysis>,
    /// Reported by the health check
    pub environment: Environment,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always "ok" while the process serves requests
    pub status: String,
    /// Unix time in seconds
    pub timestamp: u64,
    /// Deployment environment name
    pub environment: String,
}

/// Application error type
#[derive(Debug)]
pub struct AppError(pub ApiError);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.0)).into_response()
    }
}

impl From<ApiError> for AppError {
    fn from(e: ApiError) -> Self {
        AppError(e)
    }
}

/// GET /health - Liveness check
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or_default();

    Json(HealthResponse {
        status: "ok".to_string(),
        timestamp,
        environment: state.environment.to_string(),
    })
}

/// GET /books/:book_id - Book metadata
///
/// On success the book's text is downloaded into the cache in the
/// background; the response does not wait for it.
async fn get_book(
    State(state): State<AppState>,
    Path(book_id): Path<String>,
) -> Result<Json<BookMetadata>, AppError> {
    let id = BookId::parse(&book_id)?;

    let metadata = state
        .metadata
        .fetch_metadata(&id)
        .await
        .map_err(|e| metadata_failure(&id, e))?;

    warm_cache(Arc::clone(&state.content), id);

    Ok(Json(metadata))
}

/// POST /books/:book_id/analyse - Character interaction graph
async fn analyse_book(
    State(state): State<AppState>,
    Path(book_id): Path<String>,
) -> Result<Json<AnalysisResult>, AppError> {
    let id = BookId::parse(&book_id)?;
    let result = state.analyzer.analyze_book(&id).await?;
    Ok(Json(result))
}

/// Fallback for unknown routes
async fn route_not_found(method: Method, OriginalUri(uri): OriginalUri) -> AppError {
    debug!("No route for {} {}", method, uri.path());
    AppError(ApiError::not_found(format!(
        "Route {} {} not found",
        method,
        uri.path()
    )))
}

fn warm_cache(content: Arc<dyn ContentSource>, id: BookId) {
    tokio::spawn(async move {
        match content.get_or_download(&id).await {
            Ok(text) => debug!(book = %id, "Content cached ({} bytes)", text.len()),
            Err(e) => error!(book = %id, "Background download failed: {}", e),
        }
    });
}

fn metadata_failure(id: &BookId, err: LibraryError) -> ApiError {
    match err {
        LibraryError::NotAvailable(_) => ApiError::not_found(format!("Book with ID {} not found", id)),
        LibraryError::TemporarilyUnavailable(_) => ApiError::service_unavailable(format!(
            "Request timeout while fetching book {}",
            id
        )),
        LibraryError::Internal(reason) => {
            warn!(book = %id, "Metadata fetch failed: {}", reason);
            ApiError::internal(format!("Error fetching book {}", id))
        }
    }
}

/// Create the axum router with all routes mounted under `prefix`
pub fn create_router(state: AppState, prefix: &str) -> AxumRouter {
    let api = AxumRouter::new()
        .route("/health", get(health_check))
        .route("/books/:book_id", get(get_book))
        .route("/books/:book_id/analyse", post(analyse_book));

    let prefix = prefix.trim_end_matches('/');
    let app = if prefix.is_empty() {
        api
    } else {
        AxumRouter::new().nest(prefix, api)
    };

    app.fallback(route_not_found)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}
