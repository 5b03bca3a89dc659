//! Database queries for the pricing reference tables.
//!
//! All queries are runtime-checked sqlx against the reference schema. The
//! tables are tiny and read-only per request; the cache layer in
//! `crate::cache` sits in front of these for the hot paths.

use sqlx::PgPool;

use crate::error::AppError;

use super::models::{OptionalService, PackageBoxCount, Region, TruckTier};

/// Get all regions usable as a move origin or destination
pub async fn list_regions(pool: &PgPool) -> Result<Vec<Region>, AppError> {
    let regions = sqlx::query_as::<_, Region>(
        r#"
        SELECT id, name
        FROM regions
        ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(regions)
}

/// Find the distance in km between two regions.
///
/// The distance table stores each pair once, in arbitrary orientation, so
/// the query unions the table with its reversed orientation before
/// filtering. Returns `None` when no row matches either way (including a
/// same-region lookup with no self-distance row).
pub async fn find_distance(
    pool: &PgPool,
    from_region_id: i32,
    to_region_id: i32,
) -> Result<Option<f64>, AppError> {
    let distance = sqlx::query_scalar::<_, f64>(
        r#"
        SELECT distance_km FROM (
            SELECT from_region_id, to_region_id, distance_km
            FROM region_distances
            UNION ALL
            SELECT to_region_id AS from_region_id,
                   from_region_id AS to_region_id,
                   distance_km
            FROM region_distances
        ) oriented
        WHERE from_region_id = $1
          AND to_region_id = $2
        "#,
    )
    .bind(from_region_id)
    .bind(to_region_id)
    .fetch_optional(pool)
    .await?;

    Ok(distance)
}

/// Find how many boxes one unit of a package kind requires
pub async fn find_boxes_per_package(
    pool: &PgPool,
    package_id: i32,
) -> Result<Option<i32>, AppError> {
    let boxes = sqlx::query_scalar::<_, i32>(
        r#"
        SELECT boxes_per_unit
        FROM package_box_counts
        WHERE id = $1
        "#,
    )
    .bind(package_id)
    .fetch_optional(pool)
    .await?;

    Ok(boxes)
}

/// Get all package kinds with their per-unit box counts (for cache warming)
pub async fn list_package_box_counts(pool: &PgPool) -> Result<Vec<PackageBoxCount>, AppError> {
    let packages = sqlx::query_as::<_, PackageBoxCount>(
        r#"
        SELECT id, name, boxes_per_unit
        FROM package_box_counts
        ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(packages)
}

/// Get all truck tiers, largest capacity first.
///
/// The ordering is load-bearing: the truck allocator treats index 0 as the
/// large tier and index 1 as the small tier.
pub async fn list_truck_tiers(pool: &PgPool) -> Result<Vec<TruckTier>, AppError> {
    let tiers = sqlx::query_as::<_, TruckTier>(
        r#"
        SELECT id, name, max_boxes, price
        FROM truck_tiers
        ORDER BY max_boxes DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(tiers)
}

/// Find the configured price of an optional service
pub async fn find_optional_service_price(
    pool: &PgPool,
    service_id: i32,
) -> Result<Option<i64>, AppError> {
    let price = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT price
        FROM optional_services
        WHERE id = $1
        "#,
    )
    .bind(service_id)
    .fetch_optional(pool)
    .await?;

    Ok(price)
}

/// Get all optional services (for cache warming and form rendering)
pub async fn list_optional_services(pool: &PgPool) -> Result<Vec<OptionalService>, AppError> {
    let services = sqlx::query_as::<_, OptionalService>(
        r#"
        SELECT id, name, price
        FROM optional_services
        ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(services)
}
