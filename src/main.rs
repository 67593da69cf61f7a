use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod handlers;
mod models;
mod shortcode;
mod store;
mod validate;

use shortcode::{CodeSource, RandomCodes};
use store::UrlStore;

// ── Shared application state ───────────────────────────────────────────────

pub struct AppState {
    pub config: config::AppConfig,
    /// The one URL store for this process; handlers only ever borrow it.
    pub store: UrlStore,
    /// Where the shorten handler draws candidate codes from.
    pub codes: Box<dyn CodeSource>,
}

impl AppState {
    pub fn new(config: config::AppConfig, codes: impl CodeSource + 'static) -> Self {
        Self {
            config,
            store: UrlStore::new(),
            codes: Box::new(codes),
        }
    }

    /// Public URL for a short code.
    pub fn short_url(&self, code: &str) -> String {
        format!("{}/{}", self.config.base_url, code)
    }
}

// ── Router ─────────────────────────────────────────────────────────────────

pub fn router(state: Arc<AppState>) -> Router {
    use handlers::info::method_not_allowed;

    Router::new()
        .route(
            "/",
            get(handlers::info::index).fallback(method_not_allowed),
        )
        .route(
            "/api/health",
            get(handlers::info::health).fallback(method_not_allowed),
        )
        .route(
            "/api/shorten",
            post(handlers::shorten::shorten).fallback(method_not_allowed),
        )
        .route(
            "/api/stats/:code",
            get(handlers::redirect::code_stats).fallback(method_not_allowed),
        )
        // Short-link redirect; static /api/* routes take priority over the capture
        .route(
            "/:code",
            get(handlers::redirect::redirect).fallback(method_not_allowed),
        )
        .fallback(handlers::info::not_found)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

// ── Entry point ────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env (ignore error if file is absent; env vars may already be set)
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "shorty=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = config::AppConfig::from_env()?;
    tracing::info!("Starting shorty on {}:{}", config.host, config.port);
    tracing::info!("Base URL: {}", config.base_url);

    let bind_addr = config.bind_addr();
    let state = Arc::new(AppState::new(config, RandomCodes));
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
