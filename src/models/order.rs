//! Order models
//!
//! `OrderRequest` is the validated, typed input the pricing core works
//! on. The wizard form maps into it explicitly (no reflective binding);
//! the JSON quote API deserializes into it directly.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One requested package line: a package kind and how many units of it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageLine {
    pub package_id: i32,
    pub quantity: i32,
}

/// A quote/order submission as the pricing core sees it.
///
/// Customer contact and address fields are opaque to pricing; they only
/// participate in duplicate detection and persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub from_region_id: i32,
    pub to_region_id: i32,
    pub customer_name: String,
    pub tel: String,
    pub email: String,
    pub from_address: String,
    pub to_address: String,
    pub scheduled_date: NaiveDate,
    pub packages: Vec<PackageLine>,
    pub service_ids: Vec<i32>,
}

impl OrderRequest {
    /// Whether `other` is a duplicate submission of this order.
    ///
    /// Duplicates are exact matches on the identifying fields only:
    /// origin/destination, name, contact details, addresses and move
    /// date. Package and service selections do not participate.
    pub fn matches_identity(&self, other: &OrderRequest) -> bool {
        self.from_region_id == other.from_region_id
            && self.to_region_id == other.to_region_id
            && self.customer_name == other.customer_name
            && self.tel == other.tel
            && self.email == other.email
            && self.from_address == other.from_address
            && self.to_address == other.to_address
            && self.scheduled_date == other.scheduled_date
    }
}

/// Package kinds offered by the quote form.
///
/// The codes are the `package_box_counts.id` values seeded by migration;
/// the form maps its named quantity fields through these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageKind {
    CardboardBox,
    Bed,
    Bicycle,
    WashingMachine,
}

impl PackageKind {
    pub fn code(self) -> i32 {
        match self {
            PackageKind::CardboardBox => 1,
            PackageKind::Bed => 2,
            PackageKind::Bicycle => 3,
            PackageKind::WashingMachine => 4,
        }
    }
}

/// Optional services offered by the quote form.
///
/// The codes are the `optional_services.id` values seeded by migration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionalServiceKind {
    PackingAssistance,
    WashingMachineInstallation,
}

impl OptionalServiceKind {
    pub fn code(self) -> i32 {
        match self {
            OptionalServiceKind::PackingAssistance => 1,
            OptionalServiceKind::WashingMachineInstallation => 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order() -> OrderRequest {
        OrderRequest {
            from_region_id: 1,
            to_region_id: 2,
            customer_name: "Jordan Tanaka".to_string(),
            tel: "0312345678".to_string(),
            email: "jordan@example.com".to_string(),
            from_address: "1-2-3 Old Town".to_string(),
            to_address: "4-5-6 New Town".to_string(),
            scheduled_date: NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
            packages: vec![PackageLine { package_id: 1, quantity: 10 }],
            service_ids: vec![1],
        }
    }

    #[test]
    fn test_identity_ignores_packages_and_services() {
        let a = order();
        let mut b = order();
        b.packages = vec![PackageLine { package_id: 2, quantity: 1 }];
        b.service_ids = vec![];
        assert!(a.matches_identity(&b));
    }

    #[test]
    fn test_identity_is_sensitive_to_each_identifying_field() {
        let a = order();

        let mut b = order();
        b.customer_name = "Someone Else".to_string();
        assert!(!a.matches_identity(&b));

        let mut b = order();
        b.scheduled_date = NaiveDate::from_ymd_opt(2026, 9, 2).unwrap();
        assert!(!a.matches_identity(&b));

        let mut b = order();
        b.to_region_id = 3;
        assert!(!a.matches_identity(&b));
    }
}
