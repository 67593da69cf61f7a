use crate::{
    models::{Endpoints, HealthResponse, ServiceInfo},
    AppState,
};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use std::sync::Arc;

/// GET /
pub async fn index() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        status: "healthy",
        service: "URL Shortener API",
        version: env!("CARGO_PKG_VERSION"),
        endpoints: Endpoints {
            shorten: "POST /api/shorten",
            redirect: "GET /<short_code>",
            stats: "GET /api/stats/<short_code>",
        },
    })
}

/// GET /api/health
///
/// Liveness plus the store-wide counters, taken from one consistent snapshot.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        message: "URL Shortener API is running",
        statistics: state.store.stats(),
    })
}

/// Any unmatched route.
pub async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "Endpoint not found",
            "message": "The requested resource was not found on this server."
        })),
    )
}

/// A known path hit with a method it does not serve.
pub async fn method_not_allowed() -> impl IntoResponse {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(json!({
            "error": "Method not allowed",
            "message": "The method is not allowed for the requested URL."
        })),
    )
}
