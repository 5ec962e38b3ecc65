// Axum server: application state, router and the JSON error type
//
// The page itself is rendered in web::handlers; this module wires it up.

#[cfg(feature = "api")]
use axum::{
    extract::DefaultBodyLimit,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};

#[cfg(feature = "api")]
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

#[cfg(feature = "api")]
use std::sync::Arc;

#[cfg(feature = "api")]
use anyhow::Context;

#[cfg(feature = "api")]
use crate::config::AppConfig;

#[cfg(feature = "api")]
use crate::detector::{SpeciesDetector, StaticDetector, TractDetector};

#[cfg(feature = "api")]
use crate::web::handlers::{detect_page, home_page};

#[cfg(feature = "api")]
use crate::web::images::load_background;

// ============================================================================
// Application State
// ============================================================================

#[cfg(feature = "api")]
#[derive(Clone)]
pub struct AppState {
    pub detector: Arc<dyn SpeciesDetector>,
    pub config: Arc<AppConfig>,
    /// Background image as a `data:` URI, read once at startup
    pub background: Option<Arc<String>>,
}

#[cfg(feature = "api")]
impl AppState {
    pub fn new(config: AppConfig) -> anyhow::Result<Self> {
        let detector: Arc<dyn SpeciesDetector> = match &config.model_path {
            Some(path) => {
                tracing::info!("Loading detection model from {}...", path.display());
                let detector = TractDetector::load(path, config.model_input_size, config.class_names.clone())
                    .with_context(|| format!("Failed to initialize detector from {}", path.display()))?
                    .with_thresholds(config.confidence_threshold, config.iou_threshold);
                Arc::new(detector)
            }
            None => {
                tracing::warn!("MODEL_PATH not set; every upload will come back unidentified");
                Arc::new(StaticDetector::empty())
            }
        };

        Ok(Self::with_detector(config, detector))
    }

    /// State around an already-built detector.
    pub fn with_detector(config: AppConfig, detector: Arc<dyn SpeciesDetector>) -> Self {
        tracing::info!("Using {} detector", detector.name());
        let background = load_background(&config.background_image).map(Arc::new);

        Self {
            detector,
            config: Arc::new(config),
            background,
        }
    }
}

// ============================================================================
// Router
// ============================================================================

#[cfg(feature = "api")]
pub fn create_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        // Health check
        .route("/health", get(health_check))

        // Upload page: form on GET, results on POST
        .route("/", get(home_page).post(detect_page))

        // Middleware (applied in reverse order)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http()) // Request logging
        .with_state(state)
}

// ============================================================================
// Endpoint Handlers
// ============================================================================

#[cfg(feature = "api")]
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

// ============================================================================
// Error Handling
// ============================================================================

#[cfg(feature = "api")]
#[derive(Debug)]
pub enum AppError {
    Internal(String),
}

#[cfg(feature = "api")]
impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(serde_json::json!({
            "error": message
        }));

        (status, body).into_response()
    }
}
