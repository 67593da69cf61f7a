use crate::{
    error::{ApiError, ApiResult},
    models::{CodeStatsResponse, UrlRecord},
    shortcode::is_valid_short_code,
    AppState,
};
use axum::{
    extract::{rejection::PathRejection, Path, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

const INVALID_FORMAT: &str = "Invalid short code format. Must be 6 alphanumeric characters.";

/// GET /:code
///
/// Count the click and answer 302 with the original URL. Malformed codes are
/// reported as 404, same as unknown ones.
pub async fn redirect(
    State(state): State<Arc<AppState>>,
    code: Result<Path<String>, PathRejection>,
) -> ApiResult<Response> {
    let Path(code) = code.map_err(|_| ApiError::NotFound(INVALID_FORMAT))?;
    let record = resolve(&state, &code)?;

    let location = HeaderValue::try_from(record.original_url.as_str()).map_err(|e| {
        ApiError::Internal(format!("unusable redirect target for '{code}': {e}"))
    })?;

    if !state.store.increment_clicks(&code) {
        // Store was reset between the lookup and the increment.
        return Err(ApiError::NotFound("Short code not found"));
    }

    tracing::info!(
        "Redirecting '{}' to '{}' (click #{})",
        code,
        record.original_url,
        record.click_count + 1
    );

    Ok((StatusCode::FOUND, [(header::LOCATION, location)]).into_response())
}

/// GET /api/stats/:code
pub async fn code_stats(
    State(state): State<Arc<AppState>>,
    code: Result<Path<String>, PathRejection>,
) -> ApiResult<Json<CodeStatsResponse>> {
    let Path(code) = code.map_err(|_| ApiError::NotFound(INVALID_FORMAT))?;
    let record = resolve(&state, &code)?;

    Ok(Json(CodeStatsResponse {
        short_url: state.short_url(&record.code),
        short_code: record.code,
        original_url: record.original_url,
        click_count: record.click_count,
        created_at: record.created_at,
    }))
}

fn resolve(state: &AppState, code: &str) -> ApiResult<UrlRecord> {
    if !is_valid_short_code(code) {
        return Err(ApiError::NotFound(INVALID_FORMAT));
    }

    state
        .store
        .lookup(code)
        .ok_or(ApiError::NotFound("Short code not found"))
}
