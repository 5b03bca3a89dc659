//! In-memory caching using moka
//!
//! Process-wide caches for the pricing reference tables. Reference data is
//! slowly-changing configuration: it is seeded by migration, read-only for
//! the duration of a request, and reloaded either by TTL expiry or through
//! the explicit ops reload endpoint.

use moka::future::Cache;
use serde::Serialize;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;
use tracing::{info, warn};

use crate::pricing::models::{Region, TruckTier};
use crate::pricing::queries;

/// Application cache holding the pricing reference tables
#[derive(Clone)]
pub struct AppCache {
    /// Full region list (singleton key "all")
    pub regions: Cache<String, Arc<Vec<Region>>>,
    /// Region-pair distances (normalized "lo:hi" key -> km)
    pub distances: Cache<String, f64>,
    /// Boxes per unit of a package kind (package id -> boxes)
    pub package_boxes: Cache<i32, i32>,
    /// Truck tiers ordered largest-capacity first (singleton key "all")
    pub truck_tiers: Cache<String, Arc<Vec<TruckTier>>>,
    /// Optional service prices (service id -> price)
    pub service_prices: Cache<i32, i64>,
}

impl AppCache {
    /// Create a new cache instance with configured TTLs
    pub fn new() -> Self {
        Self {
            // Regions: effectively static, 1 hour TTL
            regions: Cache::builder()
                .max_capacity(1)
                .time_to_live(Duration::from_secs(60 * 60))
                .build(),

            // Distances: one entry per queried pair, 1 hour TTL
            distances: Cache::builder()
                .max_capacity(2_000)
                .time_to_live(Duration::from_secs(60 * 60))
                .time_to_idle(Duration::from_secs(30 * 60))
                .build(),

            // Package box counts: a handful of rows, 1 hour TTL
            package_boxes: Cache::builder()
                .max_capacity(100)
                .time_to_live(Duration::from_secs(60 * 60))
                .build(),

            // Truck tiers: pricing-critical, refresh more often
            truck_tiers: Cache::builder()
                .max_capacity(1)
                .time_to_live(Duration::from_secs(30 * 60))
                .build(),

            // Optional service prices: pricing-critical, 30 min TTL
            service_prices: Cache::builder()
                .max_capacity(100)
                .time_to_live(Duration::from_secs(30 * 60))
                .build(),
        }
    }

    /// Get cache statistics for monitoring
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            regions_cached: self.regions.entry_count() > 0,
            distances_size: self.distances.entry_count(),
            package_boxes_size: self.package_boxes.entry_count(),
            truck_tiers_cached: self.truck_tiers.entry_count() > 0,
            service_prices_size: self.service_prices.entry_count(),
        }
    }

    /// Invalidate all caches.
    ///
    /// This is the reload-on-demand hook: the next lookup after an
    /// invalidation re-reads the reference tables from the database.
    pub fn invalidate_all(&self) {
        self.regions.invalidate_all();
        self.distances.invalidate_all();
        self.package_boxes.invalidate_all();
        self.truck_tiers.invalidate_all();
        self.service_prices.invalidate_all();
        info!("All reference caches invalidated");
    }

    /// Generate a cache key for a region pair.
    ///
    /// Distances are symmetric, so the key is orientation-insensitive.
    pub fn distance_key(from_region_id: i32, to_region_id: i32) -> String {
        let (lo, hi) = if from_region_id <= to_region_id {
            (from_region_id, to_region_id)
        } else {
            (to_region_id, from_region_id)
        };
        format!("{}:{}", lo, hi)
    }
}

impl Default for AppCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Cache statistics for monitoring endpoint
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub regions_cached: bool,
    pub distances_size: u64,
    pub package_boxes_size: u64,
    pub truck_tiers_cached: bool,
    pub service_prices_size: u64,
}

/// Start background cache warmer
///
/// Warms the reference caches on startup and refreshes every 10 minutes.
pub async fn start_cache_warmer(cache: AppCache, db: PgPool) {
    // Initial warm-up
    warm_cache(&cache, &db).await;

    // Periodic refresh every 10 minutes
    let mut interval = interval(Duration::from_secs(10 * 60));
    loop {
        interval.tick().await;
        warm_cache(&cache, &db).await;
    }
}

/// Warm the caches with the full reference tables
async fn warm_cache(cache: &AppCache, db: &PgPool) {
    info!("Starting reference cache warm-up...");

    match queries::list_regions(db).await {
        Ok(regions) => {
            cache
                .regions
                .insert("all".to_string(), Arc::new(regions))
                .await;
        }
        Err(e) => warn!("Failed to warm region cache: {}", e),
    }

    match queries::list_truck_tiers(db).await {
        Ok(tiers) => {
            cache
                .truck_tiers
                .insert("all".to_string(), Arc::new(tiers))
                .await;
        }
        Err(e) => warn!("Failed to warm truck tier cache: {}", e),
    }

    match queries::list_package_box_counts(db).await {
        Ok(packages) => {
            for package in packages {
                cache
                    .package_boxes
                    .insert(package.id, package.boxes_per_unit)
                    .await;
            }
        }
        Err(e) => warn!("Failed to warm package box cache: {}", e),
    }

    match queries::list_optional_services(db).await {
        Ok(services) => {
            for service in services {
                cache.service_prices.insert(service.id, service.price).await;
            }
        }
        Err(e) => warn!("Failed to warm service price cache: {}", e),
    }

    info!("Reference cache warm-up complete. Stats: {:?}", cache.stats());
}
