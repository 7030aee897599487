//! Web server module for pingsweep.
//!
//! Serves a live snapshot of the result store while the sweep runs.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, EnumString};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};

use crate::store::ResultStore;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub store: ResultStore,
}

/// Health check response.
#[derive(Serialize)]
struct HealthResponse {
    status: String,
}

/// Order of the `results` array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, EnumString, AsRefStr)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ResultOrder {
    /// Order in which results were collected.
    #[default]
    Arrival,
    /// Order of the targets in the input list.
    Target,
}

/// Query parameters for the results API.
#[derive(Debug, Deserialize)]
pub struct ResultsQueryParams {
    pub order: Option<String>,
}

/// Parse result order from string; unknown values fall back to arrival order.
fn parse_result_order(s: Option<String>) -> ResultOrder {
    s.and_then(|order| order.parse().ok()).unwrap_or_default()
}

/// Create the Axum router with all routes.
pub fn create_router(state: AppState) -> Router {
    let app_state = Arc::new(state);

    Router::new()
        .route("/healthz", get(healthz_handler))
        .route("/results", get(results_handler))
        .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::default()))
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}

/// Liveness probe.
async fn healthz_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// Results endpoint - full snapshot of the store as JSON.
async fn results_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ResultsQueryParams>,
) -> Response {
    let snapshot = match parse_result_order(params.order) {
        ResultOrder::Arrival => state.store.snapshot(),
        ResultOrder::Target => state.store.snapshot().sorted_by_target(),
    };

    match serde_json::to_vec(&snapshot) {
        Ok(body) => ([(header::CONTENT_TYPE, "application/json")], body).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Snapshot serialization failed");
            (StatusCode::INTERNAL_SERVER_ERROR, format!("Error: {}", e)).into_response()
        }
    }
}
