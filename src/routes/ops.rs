//! Operational endpoints: reference-cache monitoring and reload.

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use tracing::info;

use crate::cache::CacheStats;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/cache/stats", get(cache_stats))
        .route("/cache/reload", post(cache_reload))
}

/// Current entry counts of the reference caches
async fn cache_stats(State(state): State<AppState>) -> Json<CacheStats> {
    Json(state.cache.stats())
}

/// Drop all cached reference data.
///
/// The next request (or the background warmer) re-reads the tables, so
/// this is the explicit reload hook after editing reference data.
async fn cache_reload(State(state): State<AppState>) -> &'static str {
    state.cache.invalidate_all();
    info!("Reference cache reload requested");
    "reference caches invalidated\n"
}
