//! Reporting service for pickup and sale summaries
//!
//! Aggregation is read-only and side-effect-free: summaries are a pure
//! function of the item ledger plus static fields copied through, safe
//! to compute concurrently from multiple callers.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use shared::models::{PickupItem, SaleStatus, WasteCategory};
use shared::types::{percentage, round_money, round_weight};

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::store::Registry;

/// Financial and environmental totals derived from a pickup's item ledger
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PickupTotals {
    pub total_weight_kg: Decimal,
    pub recycling_revenue_mad: Decimal,
    pub treatment_cost_mad: Decimal,
    pub net_balance_mad: Decimal,
    pub recycling_rate_percent: Decimal,
}

/// Summary payload consumed by reporting collaborators
#[derive(Debug, Clone, Serialize)]
pub struct PickupSummary {
    pub pickup_id: Uuid,
    pub pickup_number: String,
    pub pickup_date: DateTime<Utc>,
    pub destination_date: Option<DateTime<Utc>>,
    pub company_id: Uuid,
    pub company_name: String,
    pub site_id: Uuid,
    pub site_name: String,
    pub truck_id: Option<Uuid>,
    pub destination_id: Option<Uuid>,
    pub destination_name: Option<String>,
    pub item_count: i64,
    pub currency: String,
    pub totals: PickupTotals,
}

/// Per-item amount line of a sale summary
#[derive(Debug, Clone, Serialize)]
pub struct SaleItemAmount {
    pub sale_item_id: Uuid,
    pub pickup_item_id: Option<Uuid>,
    pub label: String,
    pub quantity_kg: Decimal,
    pub amount: Decimal,
}

/// Summary payload of one sale
#[derive(Debug, Clone, Serialize)]
pub struct SaleSummary {
    pub sale_id: Uuid,
    pub sale_number: String,
    pub buyer_name: String,
    pub sale_date: DateTime<Utc>,
    pub status: SaleStatus,
    pub item_count: i64,
    pub items: Vec<SaleItemAmount>,
    pub total_amount: Decimal,
    pub currency: String,
}

/// Compute the derived totals of an item ledger.
///
/// Accumulation starts from zero and is order-independent; an empty
/// ledger yields all-zero totals, and a zero total weight yields a
/// recycling rate of exactly zero.
pub fn summarize_items(items: &[PickupItem]) -> PickupTotals {
    let mut total_weight = Decimal::ZERO;
    let mut recyclable_weight = Decimal::ZERO;
    let mut recycling_revenue = Decimal::ZERO;
    let mut treatment_cost = Decimal::ZERO;

    for item in items {
        total_weight += item.quantity_kg;
        match item.category {
            WasteCategory::Recyclable => {
                recyclable_weight += item.quantity_kg;
                recycling_revenue += item.billed_amount();
            }
            WasteCategory::Banal | WasteCategory::ToDestroy => {
                treatment_cost += item.billed_amount();
            }
        }
    }

    PickupTotals {
        total_weight_kg: round_weight(total_weight),
        recycling_revenue_mad: round_money(recycling_revenue),
        treatment_cost_mad: round_money(treatment_cost),
        net_balance_mad: round_money(recycling_revenue - treatment_cost),
        recycling_rate_percent: percentage(recyclable_weight, total_weight),
    }
}

/// Reporting service
#[derive(Clone)]
pub struct ReportingService {
    registry: Arc<Registry>,
    config: Arc<Config>,
}

impl ReportingService {
    pub fn new(registry: Arc<Registry>, config: Arc<Config>) -> Self {
        Self { registry, config }
    }

    /// Financial and environmental summary of a pickup
    pub fn pickup_summary(&self, pickup_id: Uuid) -> AppResult<PickupSummary> {
        let inner = self.registry.read();
        let pickup = inner
            .pickups
            .get(&pickup_id)
            .ok_or_else(|| AppError::NotFound("Pickup".to_string()))?;
        let company = inner
            .companies
            .get(&pickup.company_id)
            .ok_or_else(|| AppError::NotFound("Company".to_string()))?;
        let site = inner
            .sites
            .get(&pickup.site_id)
            .ok_or_else(|| AppError::NotFound("Site".to_string()))?;
        let destination_name = pickup
            .destination_id
            .and_then(|id| inner.destinations.get(&id))
            .map(|d| d.name.clone());

        Ok(PickupSummary {
            pickup_id: pickup.id,
            pickup_number: pickup.pickup_number.clone(),
            pickup_date: pickup.pickup_date,
            destination_date: pickup.destination_date,
            company_id: company.id,
            company_name: company.name.clone(),
            site_id: site.id,
            site_name: site.name.clone(),
            truck_id: pickup.truck_id,
            destination_id: pickup.destination_id,
            destination_name,
            item_count: pickup.items.len() as i64,
            currency: self.config.operations.currency.clone(),
            totals: summarize_items(&pickup.items),
        })
    }

    /// Per-item amounts and total of a sale
    pub fn sale_summary(&self, sale_id: Uuid) -> AppResult<SaleSummary> {
        let inner = self.registry.read();
        let sale = inner
            .sales
            .get(&sale_id)
            .ok_or_else(|| AppError::NotFound("Sale".to_string()))?;

        let items = sale
            .items
            .iter()
            .map(|i| SaleItemAmount {
                sale_item_id: i.id,
                pickup_item_id: i.pickup_item_id,
                label: i.label.clone(),
                quantity_kg: i.quantity_kg,
                amount: i.amount,
            })
            .collect();

        Ok(SaleSummary {
            sale_id: sale.id,
            sale_number: sale.sale_number.clone(),
            buyer_name: sale.buyer_name.clone(),
            sale_date: sale.sale_date,
            status: sale.status,
            item_count: sale.items.len() as i64,
            items,
            total_amount: round_money(sale.total_amount()),
            currency: self.config.operations.currency.clone(),
        })
    }
}
