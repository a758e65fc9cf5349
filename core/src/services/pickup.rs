//! Pickup ingestion and lifecycle service

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use shared::models::{Pickup, PickupItem, PickupStatus, StockTracking, WasteCategory};
use shared::types::line_amount;
use shared::validation::{validate_document_number, validate_quantity, validate_unit_price};

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::store::Registry;

/// Input for recording a pickup with its item ledger
#[derive(Debug, Deserialize)]
pub struct CreatePickupInput {
    pub pickup_number: String,
    pub pickup_date: DateTime<Utc>,
    pub destination_date: Option<DateTime<Utc>>,
    pub company_id: Uuid,
    pub site_id: Uuid,
    pub truck_id: Option<Uuid>,
    pub driver_name: Option<String>,
    pub destination_id: Option<Uuid>,
    pub items: Vec<PickupItemInput>,
}

/// Input for one item line.
///
/// The category arrives as the label external collaborators use on the
/// wire and is parsed against the closed category set.
#[derive(Debug, Deserialize)]
pub struct PickupItemInput {
    pub category: String,
    pub label: String,
    pub quantity_kg: Decimal,
    pub unit: Option<String>,
    pub client_sale_unit_price: Option<Decimal>,
    pub service_unit_price: Option<Decimal>,
    pub purchase_unit_price: Option<Decimal>,
    pub treatment_unit_price: Option<Decimal>,
}

/// Pickup service for ingesting and maintaining pickup records
#[derive(Clone)]
pub struct PickupService {
    registry: Arc<Registry>,
    config: Arc<Config>,
}

impl PickupService {
    pub fn new(registry: Arc<Registry>, config: Arc<Config>) -> Self {
        Self { registry, config }
    }

    /// Record a pickup with its item ledger
    pub fn create_pickup(
        &self,
        user_id: Option<Uuid>,
        input: CreatePickupInput,
    ) -> AppResult<Pickup> {
        if let Err(msg) = validate_document_number(
            &input.pickup_number,
            &self.config.operations.pickup_number_prefix,
        ) {
            return Err(AppError::Validation {
                field: "pickup_number".to_string(),
                message: msg.to_string(),
                message_fr: "Numéro d'enlèvement invalide".to_string(),
            });
        }

        let items = input
            .items
            .into_iter()
            .map(|i| self.build_item(i))
            .collect::<AppResult<Vec<_>>>()?;

        let now = Utc::now();
        let mut inner = self.registry.write();

        if inner
            .pickups
            .values()
            .any(|p| p.pickup_number == input.pickup_number)
        {
            return Err(AppError::DuplicateEntry("pickup_number".to_string()));
        }
        if !inner.companies.contains_key(&input.company_id) {
            return Err(AppError::NotFound("Company".to_string()));
        }
        match inner.sites.get(&input.site_id) {
            None => return Err(AppError::NotFound("Site".to_string())),
            Some(site) if site.company_id != input.company_id => {
                return Err(AppError::Validation {
                    field: "site_id".to_string(),
                    message: "Site does not belong to the company".to_string(),
                    message_fr: "Le site n'appartient pas à la société".to_string(),
                });
            }
            Some(_) => {}
        }
        if let Some(truck_id) = input.truck_id {
            if !inner.trucks.contains_key(&truck_id) {
                return Err(AppError::NotFound("Truck".to_string()));
            }
        }
        if let Some(destination_id) = input.destination_id {
            if !inner.destinations.contains_key(&destination_id) {
                return Err(AppError::NotFound("Destination".to_string()));
            }
        }

        let pickup = Pickup {
            id: Uuid::new_v4(),
            pickup_number: input.pickup_number,
            pickup_date: input.pickup_date,
            destination_date: input.destination_date,
            company_id: input.company_id,
            site_id: input.site_id,
            truck_id: input.truck_id,
            driver_name: input.driver_name,
            destination_id: input.destination_id,
            status: PickupStatus::Open,
            items,
            created_by: user_id,
            created_at: now,
            updated_at: now,
        };

        tracing::info!(
            pickup_number = %pickup.pickup_number,
            item_count = pickup.items.len(),
            "recorded pickup"
        );

        inner.pickups.insert(pickup.id, pickup.clone());
        Ok(pickup)
    }

    /// Add an item line to an open pickup
    pub fn add_item(&self, pickup_id: Uuid, input: PickupItemInput) -> AppResult<PickupItem> {
        let item = self.build_item(input)?;
        let mut inner = self.registry.write();
        let pickup = inner
            .pickups
            .get_mut(&pickup_id)
            .ok_or_else(|| AppError::NotFound("Pickup".to_string()))?;
        if pickup.is_locked() {
            return Err(AppError::PickupLocked(pickup.pickup_number.clone()));
        }
        pickup.items.push(item.clone());
        pickup.updated_at = Utc::now();
        Ok(item)
    }

    /// Replace an item line of an open pickup.
    ///
    /// A pickup locks on its first committed sale, so an editable item can
    /// never have sold stock; recyclable tracking restarts from the new
    /// quantity.
    pub fn update_item(
        &self,
        pickup_id: Uuid,
        item_id: Uuid,
        input: PickupItemInput,
    ) -> AppResult<PickupItem> {
        let mut item = self.build_item(input)?;
        item.id = item_id;
        let mut inner = self.registry.write();
        let pickup = inner
            .pickups
            .get_mut(&pickup_id)
            .ok_or_else(|| AppError::NotFound("Pickup".to_string()))?;
        if pickup.is_locked() {
            return Err(AppError::PickupLocked(pickup.pickup_number.clone()));
        }
        let existing = pickup
            .item_mut(item_id)
            .ok_or_else(|| AppError::NotFound("Pickup item".to_string()))?;
        *existing = item.clone();
        pickup.updated_at = Utc::now();
        Ok(item)
    }

    /// Get a pickup by id
    pub fn get_pickup(&self, pickup_id: Uuid) -> AppResult<Pickup> {
        self.registry
            .read()
            .pickups
            .get(&pickup_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound("Pickup".to_string()))
    }

    /// List all pickups, most recent first
    pub fn list_pickups(&self) -> Vec<Pickup> {
        let mut pickups: Vec<Pickup> = self.registry.read().pickups.values().cloned().collect();
        pickups.sort_by(|a, b| b.pickup_date.cmp(&a.pickup_date));
        pickups
    }

    /// Validate one item line and compute its monetary amounts
    fn build_item(&self, input: PickupItemInput) -> AppResult<PickupItem> {
        let category = WasteCategory::parse(&input.category).ok_or_else(|| {
            AppError::DataIntegrity(format!("unrecognized waste category '{}'", input.category))
        })?;

        if let Err(msg) = validate_quantity(input.quantity_kg) {
            return Err(AppError::Validation {
                field: "quantity_kg".to_string(),
                message: msg.to_string(),
                message_fr: "La quantité ne peut pas être négative".to_string(),
            });
        }
        for (field, price) in [
            ("client_sale_unit_price", input.client_sale_unit_price),
            ("service_unit_price", input.service_unit_price),
            ("purchase_unit_price", input.purchase_unit_price),
            ("treatment_unit_price", input.treatment_unit_price),
        ] {
            if let Some(price) = price {
                if let Err(msg) = validate_unit_price(price) {
                    return Err(AppError::Validation {
                        field: field.to_string(),
                        message: msg.to_string(),
                        message_fr: "Le prix unitaire ne peut pas être négatif".to_string(),
                    });
                }
            }
        }

        let quantity_kg = input.quantity_kg;
        let amount = |unit_price: Option<Decimal>| unit_price.map(|p| line_amount(quantity_kg, p));

        Ok(PickupItem {
            id: Uuid::new_v4(),
            category,
            label: input.label,
            quantity_kg,
            unit: input
                .unit
                .unwrap_or_else(|| self.config.operations.default_unit.clone()),
            client_sale_unit_price: input.client_sale_unit_price,
            client_sale_amount: amount(input.client_sale_unit_price),
            service_unit_price: input.service_unit_price,
            service_amount: amount(input.service_unit_price),
            purchase_unit_price: input.purchase_unit_price,
            purchase_amount: amount(input.purchase_unit_price),
            treatment_unit_price: input.treatment_unit_price,
            treatment_amount: amount(input.treatment_unit_price),
            stock: category
                .is_recyclable()
                .then(|| StockTracking::new(quantity_kg)),
        })
    }
}
