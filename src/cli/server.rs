//! HTTP server mode for REST API access to the analyzer

use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, warn};

use crate::config::AnalyzerConfig;
use crate::engine::Analyzer;
use crate::error::{Error, Result};
use crate::exchange::CapturedExchange;
use crate::har::parse_har_bytes;
use crate::openapi::{generate_openapi, OpenApiOptions};
use crate::patterns::PatternFilter;

/// Largest HAR document accepted in a request body
pub const MAX_BODY_BYTES: usize = 64 * 1024 * 1024;

/// App state shared across handlers
#[derive(Clone)]
struct AppState {
    analyzer: Analyzer,
}

/// Query string for the patterns endpoint
#[derive(Debug, Default, Deserialize)]
struct PatternQuery {
    /// Comma-separated severities
    severity: Option<String>,
    /// Comma-separated pattern types
    #[serde(rename = "type")]
    pattern_type: Option<String>,
}

/// Query string for the OpenAPI endpoint
#[derive(Debug, Default, Deserialize)]
struct OpenApiQuery {
    title: Option<String>,
    version: Option<String>,
}

/// Response wrapper
#[derive(Debug, Serialize)]
struct ApiResponse<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    fn error(msg: impl Into<String>) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            error: Some(msg.into()),
        }
    }
}

fn ok<T: Serialize>(data: T) -> Response {
    (StatusCode::OK, Json(ApiResponse::success(data))).into_response()
}

fn fail(error: &Error) -> Response {
    let status = if error.is_input_error() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    warn!("Request failed ({}): {}", status, error);
    (status, Json(ApiResponse::<()>::error(error.to_string()))).into_response()
}

/// Build the API router
pub fn router(config: AnalyzerConfig) -> Router {
    let state = AppState {
        analyzer: Analyzer::new(config),
    };

    // Build CORS layer - allow all origins for development
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/analyze", post(analyze))
        .route("/endpoints", post(endpoints))
        .route("/patterns", post(patterns))
        .route("/openapi", post(openapi))
        .route("/summary", post(summary))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

/// Start the HTTP server
pub async fn serve(config: AnalyzerConfig, port: u16) -> Result<()> {
    config.validate()?;
    let app = router(config);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Starting HTTP server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| Error::server(format!("Failed to bind to port {port}: {e}")))?;

    axum::serve(listener, app)
        .await
        .map_err(|e| Error::server(format!("Server error: {e}")))?;

    Ok(())
}

fn exchanges_from_body(body: &Bytes) -> Result<Vec<CapturedExchange>> {
    let exchanges = parse_har_bytes(body)?;
    debug!("Request carried {} exchanges", exchanges.len());
    Ok(exchanges)
}

/// Health check endpoint
async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok", "version": env!("CARGO_PKG_VERSION") }))
}

/// Full analysis report
async fn analyze(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    match exchanges_from_body(&body) {
        Ok(exchanges) => ok(state.analyzer.analyze(&exchanges)),
        Err(e) => fail(&e),
    }
}

/// Endpoint aggregates
async fn endpoints(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    match exchanges_from_body(&body) {
        Ok(exchanges) => ok(state.analyzer.endpoints(&exchanges)),
        Err(e) => fail(&e),
    }
}

/// Ranked findings, optionally filtered by `?severity=` and `?type=`
async fn patterns(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PatternQuery>,
    body: Bytes,
) -> Response {
    let filter = match PatternFilter::parse(query.severity.as_deref(), query.pattern_type.as_deref())
    {
        Ok(filter) => filter,
        Err(e) => return fail(&e),
    };
    match exchanges_from_body(&body) {
        Ok(exchanges) => ok(state.analyzer.filtered_patterns(&exchanges, &filter)),
        Err(e) => fail(&e),
    }
}

/// OpenAPI document for the inferred endpoints
async fn openapi(
    State(state): State<Arc<AppState>>,
    Query(query): Query<OpenApiQuery>,
    body: Bytes,
) -> Response {
    let mut options = OpenApiOptions::default();
    if let Some(title) = query.title {
        options = options.with_title(title);
    }
    if let Some(version) = query.version {
        options = options.with_version(version);
    }
    match exchanges_from_body(&body) {
        Ok(exchanges) => ok(generate_openapi(&state.analyzer.endpoints(&exchanges), &options)),
        Err(e) => fail(&e),
    }
}

/// Batch statistics
async fn summary(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    match exchanges_from_body(&body) {
        Ok(exchanges) => ok(state.analyzer.summary(&exchanges)),
        Err(e) => fail(&e),
    }
}
