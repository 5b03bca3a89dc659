//! MoveQuote server entry point.

use std::net::SocketAddr;

use sqlx::postgres::PgPoolOptions;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, services::ServeDir, trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

use movequote_web::cache::{self, AppCache};
use movequote_web::routes;
use movequote_web::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("movequote_web=debug,tower_http=info")),
        )
        .init();

    let database_url = std::env::var("DATABASE_URL")?;
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&database_url)
        .await?;
    info!("Connected to PostgreSQL");

    sqlx::migrate!("./migrations").run(&pool).await?;
    info!("Database migrations complete");

    let app_cache = AppCache::new();

    // Reference tables change rarely; warm them up front and refresh
    // periodically in the background.
    tokio::spawn(cache::start_cache_warmer(app_cache.clone(), pool.clone()));

    let state = AppState {
        db: pool,
        cache: app_cache,
    };

    let app = routes::router()
        .nest_service("/static", ServeDir::new("static"))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new()),
        )
        .with_state(state);

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    let addr: SocketAddr = bind_addr.parse()?;
    info!(%addr, "Starting MoveQuote server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
