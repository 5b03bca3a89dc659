//! Route handlers

pub mod ops;
pub mod pages;

use axum::{routing::get, Router};

use crate::pricing;
use crate::AppState;

/// Assemble the full application router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(pages::top))
        .merge(pricing::router())
        .nest("/ops", ops::router())
}
