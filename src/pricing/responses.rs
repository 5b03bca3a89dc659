//! Response DTOs for pricing results.

use serde::Serialize;

/// Full estimate breakdown returned by the pricing orchestrator.
///
/// `distance_km` is informational: the current formula charges trucks
/// plus optional services only, so `total_price = truck_price +
/// optional_service_price`.
#[derive(Debug, Clone, Serialize)]
pub struct PriceBreakdown {
    pub distance_km: f64,
    pub box_count: i32,
    pub large_trucks: i32,
    pub small_trucks: i32,
    pub truck_price: i64,
    pub optional_service_price: i64,
    pub total_price: i64,
}

/// Generic pricing error response for the JSON API
#[derive(Debug, Serialize)]
pub struct PricingErrorResponse {
    pub error_type: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}
