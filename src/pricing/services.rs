//! Pricing services: the orchestrating calls and their data-access seams.
//!
//! The pricing core only ever sees reference data through the narrow
//! read-only [`ReferenceData`] interface and persistence through
//! [`OrderStore`]. Production implementations combine the sqlx queries
//! with the moka cache; tests swap in in-memory fixtures.

use sqlx::PgPool;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::cache::AppCache;
use crate::db;
use crate::models::OrderRequest;

use super::calculators::{self, BoxLine};
use super::models::{Region, TruckTier};
use super::queries;
use super::responses::PriceBreakdown;

/// Pricing calculation error types
#[derive(Debug, Clone)]
pub enum PricingError {
    /// The truck tier table holds fewer than the two tiers the
    /// allocation rules need. Fatal for the request, not retried.
    InsufficientTruckTiers { found: usize },
    /// A requested package kind has no box-count row.
    UnknownPackage { package_id: i32 },
    /// A requested optional service has no price row.
    UnknownOptionalService { service_id: i32 },
    /// The data-access collaborator failed.
    Database { message: String },
}

impl std::fmt::Display for PricingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PricingError::InsufficientTruckTiers { found } => {
                write!(f, "Truck tier data has {} tiers, need at least 2", found)
            }
            PricingError::UnknownPackage { package_id } => {
                write!(f, "No box count configured for package {}", package_id)
            }
            PricingError::UnknownOptionalService { service_id } => {
                write!(f, "No price configured for optional service {}", service_id)
            }
            PricingError::Database { message } => {
                write!(f, "Reference data unavailable: {}", message)
            }
        }
    }
}

impl std::error::Error for PricingError {}

/// Narrow read-only interface over the pricing reference tables.
#[allow(async_fn_in_trait)]
pub trait ReferenceData {
    async fn list_regions(&self) -> Result<Vec<Region>, PricingError>;

    /// Distance in km between two regions. Symmetric; 0 when no row
    /// exists for the pair (same-region moves included).
    async fn distance_between(
        &self,
        from_region_id: i32,
        to_region_id: i32,
    ) -> Result<f64, PricingError>;

    async fn boxes_per_package(&self, package_id: i32) -> Result<i32, PricingError>;

    /// Truck tiers ordered descending by capacity.
    async fn truck_tiers(&self) -> Result<Vec<TruckTier>, PricingError>;

    async fn price_of_optional_service(&self, service_id: i32) -> Result<i64, PricingError>;
}

/// Persistence seam for registered orders.
#[allow(async_fn_in_trait)]
pub trait OrderStore {
    /// Whether an order with the same identifying fields already exists.
    async fn find_duplicate(&self, order: &OrderRequest) -> Result<bool, PricingError>;

    /// Persist the order and return its id.
    async fn insert(&self, order: &OrderRequest) -> Result<Uuid, PricingError>;
}

/// Compute the estimated price for an order.
///
/// Pure with respect to its inputs: the reference data supplies the
/// lookup tables, the request supplies the load, and the result carries
/// the full breakdown. Distance is resolved and reported but the current
/// formula does not scale the total by it - the total is the truck cost
/// plus the optional-service sum.
pub async fn compute_price<R: ReferenceData>(
    reference: &R,
    order: &OrderRequest,
) -> Result<PriceBreakdown, PricingError> {
    let distance_km = reference
        .distance_between(order.from_region_id, order.to_region_id)
        .await?;

    let mut lines = Vec::with_capacity(order.packages.len());
    for package in &order.packages {
        let boxes_per_unit = reference.boxes_per_package(package.package_id).await?;
        lines.push(BoxLine {
            quantity: package.quantity,
            boxes_per_unit,
        });
    }
    let box_count = calculators::total_box_count(&lines);

    let tiers = reference.truck_tiers().await?;
    let trucks = calculators::allocate_trucks(box_count, &tiers)?;

    // Each occurrence of a service id is charged; whether repeating one
    // is meaningful is the caller's call.
    let mut optional_service_price: i64 = 0;
    for &service_id in &order.service_ids {
        optional_service_price += reference.price_of_optional_service(service_id).await?;
    }

    let total_price = trucks.total_price + optional_service_price;
    debug!(
        box_count,
        truck_price = trucks.total_price,
        optional_service_price,
        total_price,
        "Computed estimate"
    );

    Ok(PriceBreakdown {
        distance_km,
        box_count,
        large_trucks: trucks.large_trucks,
        small_trucks: trucks.small_trucks,
        truck_price: trucks.total_price,
        optional_service_price,
        total_price,
    })
}

/// Register an order unless an identical submission already exists.
///
/// Returns `true` when the order was newly recorded, `false` when it is
/// a duplicate - a distinct outcome, not an error, so the caller can
/// message the customer accordingly.
pub async fn register_order<S: OrderStore>(
    store: &S,
    order: &OrderRequest,
) -> Result<bool, PricingError> {
    if store.find_duplicate(order).await? {
        info!("Duplicate order submission ignored");
        return Ok(false);
    }

    let order_id = store.insert(order).await?;
    info!(%order_id, "Order registered");
    Ok(true)
}

fn db_error(e: crate::error::AppError) -> PricingError {
    PricingError::Database {
        message: e.to_string(),
    }
}

/// Production [`ReferenceData`]: sqlx queries fronted by the moka cache.
pub struct DbReferenceData<'a> {
    pub pool: &'a PgPool,
    pub cache: &'a AppCache,
}

impl ReferenceData for DbReferenceData<'_> {
    async fn list_regions(&self) -> Result<Vec<Region>, PricingError> {
        if let Some(cached) = self.cache.regions.get("all").await {
            return Ok((*cached).clone());
        }

        let regions = queries::list_regions(self.pool).await.map_err(db_error)?;
        self.cache
            .regions
            .insert("all".to_string(), Arc::new(regions.clone()))
            .await;
        Ok(regions)
    }

    async fn distance_between(
        &self,
        from_region_id: i32,
        to_region_id: i32,
    ) -> Result<f64, PricingError> {
        let key = AppCache::distance_key(from_region_id, to_region_id);
        if let Some(distance) = self.cache.distances.get(&key).await {
            return Ok(distance);
        }

        // Absence is a valid "no distance charge" answer, cached like any
        // other value.
        let distance = queries::find_distance(self.pool, from_region_id, to_region_id)
            .await
            .map_err(db_error)?
            .unwrap_or(0.0);
        self.cache.distances.insert(key, distance).await;
        Ok(distance)
    }

    async fn boxes_per_package(&self, package_id: i32) -> Result<i32, PricingError> {
        if let Some(boxes) = self.cache.package_boxes.get(&package_id).await {
            return Ok(boxes);
        }

        let boxes = queries::find_boxes_per_package(self.pool, package_id)
            .await
            .map_err(db_error)?
            .ok_or(PricingError::UnknownPackage { package_id })?;
        self.cache.package_boxes.insert(package_id, boxes).await;
        Ok(boxes)
    }

    async fn truck_tiers(&self) -> Result<Vec<TruckTier>, PricingError> {
        if let Some(cached) = self.cache.truck_tiers.get("all").await {
            return Ok((*cached).clone());
        }

        let tiers = queries::list_truck_tiers(self.pool)
            .await
            .map_err(db_error)?;
        self.cache
            .truck_tiers
            .insert("all".to_string(), Arc::new(tiers.clone()))
            .await;
        Ok(tiers)
    }

    async fn price_of_optional_service(&self, service_id: i32) -> Result<i64, PricingError> {
        if let Some(price) = self.cache.service_prices.get(&service_id).await {
            return Ok(price);
        }

        let price = queries::find_optional_service_price(self.pool, service_id)
            .await
            .map_err(db_error)?
            .ok_or(PricingError::UnknownOptionalService { service_id })?;
        self.cache.service_prices.insert(service_id, price).await;
        Ok(price)
    }
}

/// Production [`OrderStore`]: transactional inserts over Postgres.
pub struct DbOrderStore<'a> {
    pub pool: &'a PgPool,
}

impl OrderStore for DbOrderStore<'_> {
    async fn find_duplicate(&self, order: &OrderRequest) -> Result<bool, PricingError> {
        let count = db::count_matching_orders(self.pool, order)
            .await
            .map_err(db_error)?;
        Ok(count > 0)
    }

    async fn insert(&self, order: &OrderRequest) -> Result<Uuid, PricingError> {
        let mut txn = self.pool.begin().await.map_err(|e| PricingError::Database {
            message: e.to_string(),
        })?;

        let order_id = db::insert_order(&mut *txn, order).await.map_err(db_error)?;
        for line in &order.packages {
            db::insert_order_package(&mut *txn, order_id, line)
                .await
                .map_err(db_error)?;
        }
        for &service_id in &order.service_ids {
            db::insert_order_service(&mut *txn, order_id, service_id)
                .await
                .map_err(db_error)?;
        }

        txn.commit().await.map_err(|e| PricingError::Database {
            message: e.to_string(),
        })?;
        Ok(order_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PackageLine;
    use crate::pricing::models::RegionDistance;
    use chrono::NaiveDate;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// In-memory reference tables mirroring the database semantics:
    /// orientation-insensitive distance lookup, absence-as-zero, errors
    /// for unknown package/service ids.
    struct FixtureData {
        regions: Vec<Region>,
        distances: Vec<RegionDistance>,
        package_boxes: HashMap<i32, i32>,
        tiers: Vec<TruckTier>,
        service_prices: HashMap<i32, i64>,
    }

    impl FixtureData {
        fn standard() -> Self {
            FixtureData {
                regions: vec![
                    Region { id: 1, name: "North".to_string() },
                    Region { id: 2, name: "South".to_string() },
                    Region { id: 3, name: "East".to_string() },
                ],
                distances: vec![RegionDistance {
                    from_region_id: 1,
                    to_region_id: 2,
                    distance_km: 120.5,
                }],
                package_boxes: HashMap::from([(1, 30), (2, 10)]),
                tiers: vec![
                    TruckTier {
                        id: 1,
                        name: "4t truck".to_string(),
                        max_boxes: 200,
                        price: 50_000,
                    },
                    TruckTier {
                        id: 2,
                        name: "2t truck".to_string(),
                        max_boxes: 80,
                        price: 20_000,
                    },
                ],
                service_prices: HashMap::from([(1, 1_000), (2, 2_000)]),
            }
        }
    }

    impl ReferenceData for FixtureData {
        async fn list_regions(&self) -> Result<Vec<Region>, PricingError> {
            Ok(self.regions.clone())
        }

        async fn distance_between(
            &self,
            from_region_id: i32,
            to_region_id: i32,
        ) -> Result<f64, PricingError> {
            let distance = self
                .distances
                .iter()
                .find(|d| {
                    (d.from_region_id == from_region_id && d.to_region_id == to_region_id)
                        || (d.from_region_id == to_region_id && d.to_region_id == from_region_id)
                })
                .map(|d| d.distance_km)
                .unwrap_or(0.0);
            Ok(distance)
        }

        async fn boxes_per_package(&self, package_id: i32) -> Result<i32, PricingError> {
            self.package_boxes
                .get(&package_id)
                .copied()
                .ok_or(PricingError::UnknownPackage { package_id })
        }

        async fn truck_tiers(&self) -> Result<Vec<TruckTier>, PricingError> {
            Ok(self.tiers.clone())
        }

        async fn price_of_optional_service(&self, service_id: i32) -> Result<i64, PricingError> {
            self.service_prices
                .get(&service_id)
                .copied()
                .ok_or(PricingError::UnknownOptionalService { service_id })
        }
    }

    struct InMemoryOrderStore {
        orders: Mutex<Vec<OrderRequest>>,
    }

    impl InMemoryOrderStore {
        fn new() -> Self {
            InMemoryOrderStore {
                orders: Mutex::new(Vec::new()),
            }
        }
    }

    impl OrderStore for InMemoryOrderStore {
        async fn find_duplicate(&self, order: &OrderRequest) -> Result<bool, PricingError> {
            let orders = self.orders.lock().unwrap();
            Ok(orders.iter().any(|existing| existing.matches_identity(order)))
        }

        async fn insert(&self, order: &OrderRequest) -> Result<Uuid, PricingError> {
            self.orders.lock().unwrap().push(order.clone());
            Ok(Uuid::new_v4())
        }
    }

    fn order(packages: Vec<PackageLine>, service_ids: Vec<i32>) -> OrderRequest {
        OrderRequest {
            from_region_id: 1,
            to_region_id: 2,
            customer_name: "Jordan Tanaka".to_string(),
            tel: "0312345678".to_string(),
            email: "jordan@example.com".to_string(),
            from_address: "1-2-3 Old Town".to_string(),
            to_address: "4-5-6 New Town".to_string(),
            scheduled_date: NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
            packages,
            service_ids,
        }
    }

    // ==================== distance tests ====================

    #[tokio::test]
    async fn test_distance_lookup_is_symmetric() {
        let data = FixtureData::standard();
        let forward = data.distance_between(1, 2).await.unwrap();
        let backward = data.distance_between(2, 1).await.unwrap();
        assert_eq!(forward, 120.5);
        assert_eq!(forward, backward);
    }

    #[tokio::test]
    async fn test_missing_distance_resolves_to_zero() {
        let data = FixtureData::standard();
        // Same-region move with no self-distance row.
        assert_eq!(data.distance_between(3, 3).await.unwrap(), 0.0);
        // Pair with no row at all.
        assert_eq!(data.distance_between(1, 3).await.unwrap(), 0.0);
    }

    // ==================== compute_price tests ====================

    #[tokio::test]
    async fn test_end_to_end_estimate_for_medium_load() {
        let data = FixtureData::standard();
        // 3 units x 30 boxes = 90 boxes: between the small and large
        // capacities, so one large truck and nothing else.
        let request = order(vec![PackageLine { package_id: 1, quantity: 3 }], vec![]);

        let breakdown = compute_price(&data, &request).await.unwrap();
        assert_eq!(breakdown.box_count, 90);
        assert_eq!(breakdown.large_trucks, 1);
        assert_eq!(breakdown.small_trucks, 0);
        assert_eq!(breakdown.truck_price, 50_000);
        assert_eq!(breakdown.optional_service_price, 0);
        assert_eq!(breakdown.total_price, 50_000);
    }

    #[tokio::test]
    async fn test_distance_is_reported_but_not_charged() {
        let data = FixtureData::standard();
        let request = order(vec![PackageLine { package_id: 2, quantity: 1 }], vec![]);

        let breakdown = compute_price(&data, &request).await.unwrap();
        assert_eq!(breakdown.distance_km, 120.5);
        // 10 boxes -> one small truck; the total is the truck cost alone.
        assert_eq!(breakdown.total_price, breakdown.truck_price);
        assert_eq!(breakdown.total_price, 20_000);
    }

    #[tokio::test]
    async fn test_optional_services_are_summed() {
        let data = FixtureData::standard();
        let request = order(vec![PackageLine { package_id: 2, quantity: 1 }], vec![1, 2]);

        let breakdown = compute_price(&data, &request).await.unwrap();
        assert_eq!(breakdown.optional_service_price, 3_000);
        assert_eq!(breakdown.total_price, 23_000);
    }

    #[tokio::test]
    async fn test_duplicate_service_ids_are_each_charged() {
        let data = FixtureData::standard();
        let request = order(vec![PackageLine { package_id: 2, quantity: 1 }], vec![1, 1]);

        let breakdown = compute_price(&data, &request).await.unwrap();
        assert_eq!(breakdown.optional_service_price, 2_000);
    }

    #[tokio::test]
    async fn test_unknown_service_id_is_an_error() {
        let data = FixtureData::standard();
        let request = order(vec![PackageLine { package_id: 2, quantity: 1 }], vec![99]);

        let err = compute_price(&data, &request).await.unwrap_err();
        assert!(matches!(
            err,
            PricingError::UnknownOptionalService { service_id: 99 }
        ));
    }

    #[tokio::test]
    async fn test_unknown_package_id_is_an_error() {
        let data = FixtureData::standard();
        let request = order(vec![PackageLine { package_id: 42, quantity: 1 }], vec![]);

        let err = compute_price(&data, &request).await.unwrap_err();
        assert!(matches!(err, PricingError::UnknownPackage { package_id: 42 }));
    }

    #[tokio::test]
    async fn test_empty_order_still_gets_a_small_truck() {
        let data = FixtureData::standard();
        let request = order(vec![], vec![]);

        let breakdown = compute_price(&data, &request).await.unwrap();
        assert_eq!(breakdown.box_count, 0);
        assert_eq!(breakdown.small_trucks, 1);
        assert_eq!(breakdown.total_price, 20_000);
    }

    // ==================== register_order tests ====================

    #[tokio::test]
    async fn test_identical_submission_is_recorded_once() {
        let store = InMemoryOrderStore::new();
        let request = order(vec![PackageLine { package_id: 1, quantity: 3 }], vec![1]);

        assert!(register_order(&store, &request).await.unwrap());
        assert!(!register_order(&store, &request).await.unwrap());
    }

    #[tokio::test]
    async fn test_different_move_date_is_a_new_order() {
        let store = InMemoryOrderStore::new();
        let first = order(vec![], vec![]);
        let mut second = first.clone();
        second.scheduled_date = NaiveDate::from_ymd_opt(2026, 9, 2).unwrap();

        assert!(register_order(&store, &first).await.unwrap());
        assert!(register_order(&store, &second).await.unwrap());
    }

    // ==================== error display tests ====================

    #[test]
    fn test_pricing_error_display() {
        let err = PricingError::InsufficientTruckTiers { found: 1 };
        assert!(err.to_string().contains("1 tiers"));

        let err = PricingError::UnknownOptionalService { service_id: 7 };
        assert!(err.to_string().contains("7"));

        let err = PricingError::UnknownPackage { package_id: 9 };
        assert!(err.to_string().contains("9"));

        let err = PricingError::Database {
            message: "connection refused".to_string(),
        };
        assert!(err.to_string().contains("connection refused"));
    }
}
