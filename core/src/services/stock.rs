//! Stock reconciliation ledger for recyclable pickup items
//!
//! Tracks, per pickup item, the running quantity sold and quantity
//! remaining as sale transactions are recorded against it. Every
//! check-then-update runs under the registry write lock, so concurrent
//! sales against the same item can never jointly oversell.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use shared::models::{PickupItem, PickupStatus, StockTracking, WasteCategory};
use shared::validation::validate_sale_quantity;

use crate::error::{AppError, AppResult};
use crate::store::{Registry, RegistryInner};

/// Sold/remaining position of one pickup item, for listing collaborators
#[derive(Debug, Clone, Serialize)]
pub struct StockPosition {
    pub pickup_item_id: Uuid,
    pub category: WasteCategory,
    pub label: String,
    pub quantity_kg: Decimal,
    /// `None` when the item's category does not participate in resale
    pub tracking: Option<StockTracking>,
}

/// Stock reconciliation service
#[derive(Clone)]
pub struct StockService {
    registry: Arc<Registry>,
}

impl StockService {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self { registry }
    }

    /// Record a committed sale of `quantity_kg` against a pickup item.
    ///
    /// Fails with `InsufficientStock` when the quantity exceeds what
    /// remains (including zero remaining), leaving the figures untouched.
    /// On success the running totals move and the owning pickup locks,
    /// atomically with respect to concurrent callers.
    pub fn record_sale(
        &self,
        pickup_item_id: Uuid,
        quantity_kg: Decimal,
    ) -> AppResult<StockTracking> {
        let mut inner = self.registry.write();
        record_sale_on(&mut inner, pickup_item_id, quantity_kg)
    }

    /// Current remaining quantity of a recyclable pickup item.
    ///
    /// Reflects every committed sale, never a stale snapshot.
    pub fn current_remaining(&self, pickup_item_id: Uuid) -> AppResult<Decimal> {
        let inner = self.registry.read();
        let item = find_item(&inner, pickup_item_id)?;
        let tracking = item.stock.as_ref().ok_or_else(|| {
            AppError::DataIntegrity(format!(
                "stock tracking does not apply to {} item {}",
                item.category, pickup_item_id
            ))
        })?;
        Ok(tracking.quantity_remaining_kg)
    }

    /// Stock position of one pickup item
    pub fn stock_position(&self, pickup_item_id: Uuid) -> AppResult<StockPosition> {
        let inner = self.registry.read();
        let item = find_item(&inner, pickup_item_id)?;
        Ok(position_of(item))
    }

    /// Stock positions of every item of a pickup
    pub fn pickup_stock(&self, pickup_id: Uuid) -> AppResult<Vec<StockPosition>> {
        let inner = self.registry.read();
        let pickup = inner
            .pickups
            .get(&pickup_id)
            .ok_or_else(|| AppError::NotFound("Pickup".to_string()))?;
        Ok(pickup.items.iter().map(position_of).collect())
    }
}

fn position_of(item: &PickupItem) -> StockPosition {
    StockPosition {
        pickup_item_id: item.id,
        category: item.category,
        label: item.label.clone(),
        quantity_kg: item.quantity_kg,
        tracking: item.stock.clone(),
    }
}

/// Locate a pickup item across all pickups
pub(crate) fn find_item(inner: &RegistryInner, pickup_item_id: Uuid) -> AppResult<&PickupItem> {
    inner
        .pickups
        .values()
        .find_map(|p| p.item(pickup_item_id))
        .ok_or_else(|| AppError::NotFound("Pickup item".to_string()))
}

/// Apply a sale to a pickup item under an already-held write guard.
///
/// Shared by [`StockService::record_sale`] and the whole-sale commit in
/// the sale service, so the stock check and update always happen as one
/// step with the caller's sale-item creation.
pub(crate) fn record_sale_on(
    inner: &mut RegistryInner,
    pickup_item_id: Uuid,
    quantity_kg: Decimal,
) -> AppResult<StockTracking> {
    if let Err(msg) = validate_sale_quantity(quantity_kg) {
        return Err(AppError::Validation {
            field: "quantity_kg".to_string(),
            message: msg.to_string(),
            message_fr: "La quantité vendue doit être positive".to_string(),
        });
    }

    let pickup = inner
        .pickups
        .values_mut()
        .find(|p| p.item(pickup_item_id).is_some())
        .ok_or_else(|| AppError::NotFound("Pickup item".to_string()))?;
    let pickup_number = pickup.pickup_number.clone();
    let item = match pickup.item_mut(pickup_item_id) {
        Some(item) => item,
        None => return Err(AppError::NotFound("Pickup item".to_string())),
    };

    let category = item.category;
    let tracking = item.stock.as_mut().ok_or_else(|| {
        AppError::DataIntegrity(format!(
            "stock tracking does not apply to {} item {}",
            category, pickup_item_id
        ))
    })?;

    if quantity_kg > tracking.quantity_remaining_kg {
        return Err(AppError::InsufficientStock {
            item_id: pickup_item_id,
            requested: quantity_kg,
            remaining: tracking.quantity_remaining_kg,
        });
    }

    tracking.apply_sale(quantity_kg);
    let updated = tracking.clone();

    pickup.status = PickupStatus::Locked;
    pickup.updated_at = chrono::Utc::now();

    tracing::info!(
        pickup_number = %pickup_number,
        item_id = %pickup_item_id,
        sold_kg = %quantity_kg,
        remaining_kg = %updated.quantity_remaining_kg,
        "recorded stock deduction"
    );

    Ok(updated)
}
