//! Reference-data models for pricing queries.
//!
//! These models use sqlx's FromRow derive for direct database deserialization.
//! All five tables are slowly-changing configuration: seeded by migration,
//! read-only for the duration of a request, reloadable via the ops endpoint.

use serde::Serialize;
use sqlx::FromRow;

/// Administrative area usable as move origin/destination, from `regions`
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Region {
    pub id: i32,
    pub name: String,
}

/// Distance between an unordered pair of regions, from `region_distances`.
///
/// One row per pair; lookups must treat (from, to) and (to, from) as the
/// same pair. A missing row means distance 0, not an error.
#[derive(Debug, Clone, FromRow)]
pub struct RegionDistance {
    pub from_region_id: i32,
    pub to_region_id: i32,
    pub distance_km: f64,
}

/// Boxes required per unit of a package kind, from `package_box_counts`
#[derive(Debug, Clone, FromRow)]
pub struct PackageBoxCount {
    pub id: i32,
    pub name: String,
    pub boxes_per_unit: i32,
}

/// One class of moving truck, from `truck_tiers`.
///
/// Always queried ordered descending by capacity, so index 0 is the
/// largest (and most expensive) tier.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TruckTier {
    pub id: i32,
    pub name: String,
    pub max_boxes: i32,
    pub price: i64,
}

/// Flat-priced add-on service, from `optional_services`
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct OptionalService {
    pub id: i32,
    pub name: String,
    pub price: i64,
}
