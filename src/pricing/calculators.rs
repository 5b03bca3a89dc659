//! Core pricing calculation functions.
//!
//! Pure functions for pricing math - no database access. The truck
//! allocation reproduces the billing rules of the legacy estimate system,
//! including its boundary behavior (see `allocate_trucks`).

use crate::pricing::models::TruckTier;
use crate::pricing::services::PricingError;

/// One priced line of the customer's load: a package quantity together
/// with the boxes each unit of that package requires.
#[derive(Debug, Clone, Copy)]
pub struct BoxLine {
    pub quantity: i32,
    pub boxes_per_unit: i32,
}

/// Result of truck allocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TruckAllocation {
    pub large_trucks: i32,
    pub small_trucks: i32,
    pub total_price: i64,
}

/// Total number of boxes for a load.
///
/// # Examples
/// ```
/// use movequote_web::pricing::calculators::{total_box_count, BoxLine};
///
/// let lines = [BoxLine { quantity: 3, boxes_per_unit: 30 }];
/// assert_eq!(total_box_count(&lines), 90);
/// ```
pub fn total_box_count(lines: &[BoxLine]) -> i32 {
    lines
        .iter()
        .map(|line| line.quantity * line.boxes_per_unit)
        .sum()
}

/// Decide how many trucks a load needs and what they cost.
///
/// `tiers` must be ordered descending by capacity; only the two largest
/// tiers participate (in practice the table holds exactly a "large" and a
/// "small" tier). Fewer than two tiers is a configuration error.
///
/// Rules, with `C0`/`P0` the large tier's capacity/price and `C1`/`P1`
/// the small tier's:
///
/// - `box_count < C1`: one small truck.
/// - `C1 <= box_count < C0`: one large truck.
/// - otherwise: `box_count / C0` large trucks, plus one small truck when
///   the remainder fits a small truck, else one more large truck.
///
/// A load of exactly `C0` boxes lands in the last branch: remainder 0 is
/// below `C1`, so a small truck is billed alongside the full large one.
/// That overprovisions by one small truck, but it is what the estimate
/// system has always charged; characterized in the tests below, not fixed.
pub fn allocate_trucks(
    box_count: i32,
    tiers: &[TruckTier],
) -> Result<TruckAllocation, PricingError> {
    if tiers.len() < 2 {
        return Err(PricingError::InsufficientTruckTiers { found: tiers.len() });
    }
    let large = &tiers[0];
    let small = &tiers[1];

    let mut large_trucks = 0;
    let mut small_trucks = 0;

    if box_count < small.max_boxes {
        small_trucks = 1;
    } else if box_count < large.max_boxes {
        large_trucks = 1;
    } else {
        large_trucks = box_count / large.max_boxes;
        if box_count % large.max_boxes < small.max_boxes {
            small_trucks = 1;
        } else {
            large_trucks += 1;
        }
    }

    let total_price =
        i64::from(large_trucks) * large.price + i64::from(small_trucks) * small.price;

    Ok(TruckAllocation {
        large_trucks,
        small_trucks,
        total_price,
    })
}
