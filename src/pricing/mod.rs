//! Pricing engine module for the moving-quote application.
//!
//! Computes move estimates from the reference tables: region distance,
//! truck allocation by total box count, and optional-service pricing.
//! The quote wizard and the JSON quote API both call into this module.

pub mod calculators;
pub mod models;
pub mod queries;
pub mod requests;
pub mod responses;
pub mod routes;
pub mod services;

// Re-export commonly used items
pub use calculators::{allocate_trucks, total_box_count};
pub use routes::router;
pub use services::{compute_price, register_order, PricingError, ReferenceData};
