use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A shortened URL as held by the in-memory store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlRecord {
    pub code: String,
    pub original_url: String,
    pub click_count: u64,
    pub created_at: DateTime<Utc>,
}

/// Aggregate counters over every record in the store.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StoreStats {
    pub total_urls: usize,
    pub total_clicks: u64,
    pub average_clicks: f64,
}

// ── Request / response bodies ──────────────────────────────────────────────

/// Body of `POST /api/shorten`. `url` is optional so a missing field can be
/// reported with its own message instead of a generic decode failure.
#[derive(Debug, Deserialize)]
pub struct ShortenRequest {
    pub url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ShortenResponse {
    pub short_code: String,
    pub short_url: String,
    pub original_url: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct CodeStatsResponse {
    pub short_code: String,
    pub original_url: String,
    pub click_count: u64,
    pub created_at: DateTime<Utc>,
    pub short_url: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub statistics: StoreStats,
}

#[derive(Debug, Serialize)]
pub struct ServiceInfo {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub endpoints: Endpoints,
}

#[derive(Debug, Serialize)]
pub struct Endpoints {
    pub shorten: &'static str,
    pub redirect: &'static str,
    pub stats: &'static str,
}
