//! Sale (vente) models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::WasteCategory;

/// Settlement state of a sale
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SaleStatus {
    /// Committed; stock deductions applied
    Confirmed,
    /// Buyer payment received
    Paid,
}

/// One line of a sale
///
/// `pickup_item_id` is a weak back-reference to the originating pickup
/// item; a sale line may exist without one (stock bought in from outside
/// the pickup ledger, or a source item later archived).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleItem {
    pub id: Uuid,
    pub pickup_item_id: Option<Uuid>,
    pub category: WasteCategory,
    pub label: String,
    pub quantity_kg: Decimal,
    pub unit_price: Decimal,
    pub amount: Decimal,
    pub created_at: DateTime<Utc>,
}

/// A resale transaction of collected recyclable stock
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sale {
    pub id: Uuid,
    /// Unique sale number (e.g. "VTE-2024-0001")
    pub sale_number: String,
    pub buyer_id: Option<Uuid>,
    pub buyer_name: String,
    pub sale_date: DateTime<Utc>,
    pub status: SaleStatus,
    pub items: Vec<SaleItem>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Sale {
    /// Sum of the item amounts, computed per item regardless of category
    pub fn total_amount(&self) -> Decimal {
        self.items.iter().map(|i| i.amount).sum()
    }
}

/// Generate a sale number
pub fn generate_sale_number(prefix: &str, year: i32, sequence: i32) -> String {
    format!("{}-{}-{:04}", prefix, year, sequence)
}
