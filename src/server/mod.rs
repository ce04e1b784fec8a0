//! HTTP host for the rice disease predictor.
//!
//! Routes:
//!
//! * `GET /` - the upload page
//! * `POST /predict` - multipart upload, field `image`
//! * `GET /health` - liveness and model name

pub mod error;
pub mod page;

use crate::core::config::ServerConfig;
use crate::predictor::{Classification, DiseasePredictor};
use crate::utils::decode_image;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::response::Html;
use axum::routing::{get, post};
use axum::{Json, Router};
use error::ApiError;
use serde::Serialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Multipart field carrying the uploaded image.
pub const IMAGE_FIELD: &str = "image";

/// Shared server state.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The predictor shared by every request.
    pub predictor: Arc<DiseasePredictor>,
}

impl AppState {
    /// Wraps a predictor for sharing across handlers.
    pub fn new(predictor: DiseasePredictor) -> Self {
        Self {
            predictor: Arc::new(predictor),
        }
    }
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub model: String,
}

/// Construct the router with all endpoints
pub fn router(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/predict", post(predict))
        .route("/health", get(health_check))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

/// Binds `config.bind_address()` and serves until Ctrl-C.
pub async fn serve(config: &ServerConfig, state: AppState) -> std::io::Result<()> {
    let app = router(state, config.max_upload_bytes);
    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    tracing::info!("Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

async fn index() -> Html<&'static str> {
    Html(page::INDEX_HTML)
}

/// Health check endpoint
async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        model: state.predictor.model_name().to_string(),
    })
}

/// Classify an uploaded image
///
/// POST /predict
///
/// A missing or empty `image` field is not an error: the response carries
/// the upload prompt and no scores.
async fn predict(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<Classification>, ApiError> {
    let mut upload = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some(IMAGE_FIELD) {
            let bytes = field.bytes().await?;
            if !bytes.is_empty() {
                upload = Some(bytes);
            }
            break;
        }
    }

    let Some(bytes) = upload else {
        return Ok(Json(Classification::no_image()));
    };

    tracing::debug!(bytes = bytes.len(), "received upload");
    let predictor = Arc::clone(&state.predictor);
    let classification = tokio::task::spawn_blocking(move || {
        let image = decode_image(&bytes)?;
        predictor.classify(Some(&image))
    })
    .await??;

    if let Some(scores) = &classification.scores
        && let Some(top) = scores.top()
    {
        tracing::info!(label = %top.label, score = top.score, "classified upload");
    }
    Ok(Json(classification))
}
