//! MoveQuote web application.
//!
//! A moving-quote wizard: customers pick origin/destination regions, a
//! move date, package quantities and optional services; the pricing
//! engine derives an estimate from reference tables and submissions are
//! persisted as orders.

pub mod cache;
pub mod db;
pub mod error;
pub mod models;
pub mod pricing;
pub mod routes;

use sqlx::PgPool;

use crate::cache::AppCache;

/// Shared application state passed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub cache: AppCache,
}
