use crate::{
    error::{ApiError, ApiResult},
    models::{ShortenRequest, ShortenResponse, UrlRecord},
    store::StoreError,
    validate::normalize_url,
    AppState,
};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

/// How many candidate codes to try before giving up with a 500.
pub const MAX_CODE_ATTEMPTS: usize = 10;

const ALREADY_SHORTENED: &str = "URL was already shortened";

/// POST /api/shorten
///
/// 1. Normalize the submitted URL.
/// 2. If the store already maps it to a code, return that record (200).
/// 3. Otherwise draw candidate codes, skipping ones the store already has,
///    and insert. A candidate that loses an insert race is simply replaced
///    by the next one.
/// 4. Return the new record (201), or 500 once every attempt is used up.
pub async fn shorten(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ShortenRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<ShortenResponse>)> {
    let Json(request) = payload.map_err(|rejection| match rejection {
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::InvalidRequest("Content-Type must be application/json")
        }
        _ => ApiError::InvalidRequest("Invalid JSON data"),
    })?;

    let raw = request
        .url
        .filter(|u| !u.is_empty())
        .ok_or(ApiError::InvalidRequest(
            "Missing 'url' field in request body",
        ))?;

    let normalized = normalize_url(&raw)?;

    if let Some(code) = state.store.find_by_url(&normalized) {
        return already_shortened(&state, &code);
    }

    for attempt in 1..=MAX_CODE_ATTEMPTS {
        let candidate = state.codes.next_code();
        if state.store.exists(&candidate) {
            tracing::debug!("Candidate '{}' taken (attempt {})", candidate, attempt);
            continue;
        }

        match state.store.insert(candidate, normalized.as_str()) {
            Ok(record) => {
                tracing::info!(
                    "Created short code '{}' for URL '{}'",
                    record.code,
                    record.original_url
                );
                return Ok((StatusCode::CREATED, Json(to_response(&state, record, None))));
            }
            Err(StoreError::CodeExists(code)) => {
                tracing::debug!("Lost insert race for '{}' (attempt {})", code, attempt);
            }
            // Another request shortened the same URL between our reverse
            // lookup and this insert.
            Err(StoreError::UrlExists(code)) => return already_shortened(&state, &code),
        }
    }

    Err(ApiError::CodeGenerationExhausted {
        attempts: MAX_CODE_ATTEMPTS,
    })
}

fn already_shortened(
    state: &AppState,
    code: &str,
) -> ApiResult<(StatusCode, Json<ShortenResponse>)> {
    let record = state
        .store
        .lookup(code)
        .ok_or_else(|| ApiError::Internal(format!("record for '{code}' vanished")))?;

    Ok((
        StatusCode::OK,
        Json(to_response(state, record, Some(ALREADY_SHORTENED))),
    ))
}

fn to_response(
    state: &AppState,
    record: UrlRecord,
    message: Option<&'static str>,
) -> ShortenResponse {
    ShortenResponse {
        short_url: state.short_url(&record.code),
        short_code: record.code,
        original_url: record.original_url,
        created_at: record.created_at,
        message,
    }
}
