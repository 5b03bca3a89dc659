//! Request DTOs for the quote wizard and the JSON quote API.

use chrono::NaiveDate;
use serde::Deserialize;

use crate::models::{OptionalServiceKind, OrderRequest, PackageKind, PackageLine};

/// The wizard form, carried in full through every step of the flow.
///
/// Fields are the raw form values; `to_order_request` is the explicit,
/// compile-time-checked mapping into the typed order. All fields default
/// so that back-navigation posts and the initial GET render share one
/// shape.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct QuoteForm {
    /// Which submit button was pressed ("confirm", "calculation", ...)
    pub action: String,
    pub customer_name: String,
    pub tel: String,
    pub email: String,
    pub from_region_id: i32,
    pub from_address: String,
    pub to_region_id: i32,
    pub to_address: String,
    /// ISO date string from the date input
    pub scheduled_date: String,
    pub cardboard_boxes: i32,
    pub beds: i32,
    pub bicycles: i32,
    pub washing_machines: i32,
    /// Checkbox: packing assistance requested
    pub packing: Option<String>,
    /// Checkbox: washing machine installation requested
    pub washing_machine_installation: Option<String>,
}

impl QuoteForm {
    pub fn wants_packing(&self) -> bool {
        self.packing.is_some()
    }

    pub fn wants_washing_machine_installation(&self) -> bool {
        self.washing_machine_installation.is_some()
    }

    /// Map the form into the typed order the pricing core consumes.
    ///
    /// Every field is mapped by name here - no reflective binding.
    /// Quantities are clamped to zero so a hand-crafted negative value
    /// cannot push the box total below zero; structural validation beyond
    /// the date parse stays with the form markup.
    pub fn to_order_request(&self) -> Result<OrderRequest, chrono::ParseError> {
        let scheduled_date = NaiveDate::parse_from_str(self.scheduled_date.trim(), "%Y-%m-%d")?;

        let packages = vec![
            PackageLine {
                package_id: PackageKind::CardboardBox.code(),
                quantity: self.cardboard_boxes.max(0),
            },
            PackageLine {
                package_id: PackageKind::Bed.code(),
                quantity: self.beds.max(0),
            },
            PackageLine {
                package_id: PackageKind::Bicycle.code(),
                quantity: self.bicycles.max(0),
            },
            PackageLine {
                package_id: PackageKind::WashingMachine.code(),
                quantity: self.washing_machines.max(0),
            },
        ];

        let mut service_ids = Vec::new();
        if self.wants_packing() {
            service_ids.push(OptionalServiceKind::PackingAssistance.code());
        }
        if self.wants_washing_machine_installation() {
            service_ids.push(OptionalServiceKind::WashingMachineInstallation.code());
        }

        Ok(OrderRequest {
            from_region_id: self.from_region_id,
            to_region_id: self.to_region_id,
            customer_name: self.customer_name.clone(),
            tel: self.tel.clone(),
            email: self.email.clone(),
            from_address: self.from_address.clone(),
            to_address: self.to_address.clone(),
            scheduled_date,
            packages,
            service_ids,
        })
    }
}

/// Request for the JSON quote API.
///
/// Unlike the wizard form this takes free-form package and service
/// lists, so callers are not bound to the form's fixed package kinds.
#[derive(Debug, Deserialize)]
pub struct QuoteRequest {
    pub from_region_id: i32,
    pub to_region_id: i32,
    #[serde(default)]
    pub packages: Vec<PackageLine>,
    #[serde(default)]
    pub service_ids: Vec<i32>,
}

impl QuoteRequest {
    /// Build a priceable order from the request.
    ///
    /// Pricing never reads the contact fields or the move date, so they
    /// are filled with neutral placeholders.
    pub fn into_order_request(self) -> OrderRequest {
        OrderRequest {
            from_region_id: self.from_region_id,
            to_region_id: self.to_region_id,
            customer_name: String::new(),
            tel: String::new(),
            email: String::new(),
            from_address: String::new(),
            to_address: String::new(),
            scheduled_date: NaiveDate::default(),
            packages: self.packages,
            service_ids: self.service_ids,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> QuoteForm {
        QuoteForm {
            action: "calculation".to_string(),
            customer_name: "Jordan Tanaka".to_string(),
            tel: "0312345678".to_string(),
            email: "jordan@example.com".to_string(),
            from_region_id: 1,
            from_address: "1-2-3 Old Town".to_string(),
            to_region_id: 2,
            to_address: "4-5-6 New Town".to_string(),
            scheduled_date: "2026-09-01".to_string(),
            cardboard_boxes: 20,
            beds: 1,
            bicycles: 0,
            washing_machines: 1,
            packing: None,
            washing_machine_installation: Some("on".to_string()),
        }
    }

    #[test]
    fn test_form_maps_every_package_kind() {
        let order = form().to_order_request().unwrap();
        assert_eq!(order.packages.len(), 4);
        assert_eq!(
            order.packages[0],
            PackageLine {
                package_id: PackageKind::CardboardBox.code(),
                quantity: 20
            }
        );
        assert_eq!(order.packages[3].quantity, 1);
    }

    #[test]
    fn test_checked_services_become_service_ids() {
        let order = form().to_order_request().unwrap();
        assert_eq!(
            order.service_ids,
            vec![OptionalServiceKind::WashingMachineInstallation.code()]
        );

        let mut both = form();
        both.packing = Some("on".to_string());
        let order = both.to_order_request().unwrap();
        assert_eq!(order.service_ids.len(), 2);
    }

    #[test]
    fn test_negative_quantities_are_clamped() {
        let mut negative = form();
        negative.beds = -3;
        let order = negative.to_order_request().unwrap();
        assert_eq!(order.packages[1].quantity, 0);
    }

    #[test]
    fn test_unparseable_date_is_rejected() {
        let mut bad = form();
        bad.scheduled_date = "next tuesday".to_string();
        assert!(bad.to_order_request().is_err());
    }
}
