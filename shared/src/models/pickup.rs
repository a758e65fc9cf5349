//! Pickup (enlevement) models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Waste category of a pickup item line
///
/// The set is closed: external collaborators supply one of the three
/// labels, anything else is rejected at ingestion as a data-integrity
/// error.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WasteCategory {
    Recyclable,
    Banal,
    ToDestroy,
}

impl WasteCategory {
    /// Parse a category label supplied by an external collaborator
    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "recyclable" => Some(WasteCategory::Recyclable),
            "banal" => Some(WasteCategory::Banal),
            "to_destroy" => Some(WasteCategory::ToDestroy),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WasteCategory::Recyclable => "recyclable",
            WasteCategory::Banal => "banal",
            WasteCategory::ToDestroy => "to_destroy",
        }
    }

    /// Only recyclable stock participates in the resale ledger
    pub fn is_recyclable(&self) -> bool {
        matches!(self, WasteCategory::Recyclable)
    }
}

impl std::fmt::Display for WasteCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WasteCategory::Recyclable => write!(f, "recyclable"),
            WasteCategory::Banal => write!(f, "banal"),
            WasteCategory::ToDestroy => write!(f, "à détruire"),
        }
    }
}

/// Resale status of a recyclable item's stock
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    Available,
    PartiallySold,
    SoldOut,
}

/// Running resale figures for a recyclable pickup item
///
/// Invariant: `quantity_sold_kg + quantity_remaining_kg` equals the item's
/// original quantity, both non-negative, and `quantity_sold_kg` only grows.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StockTracking {
    pub quantity_sold_kg: Decimal,
    pub quantity_remaining_kg: Decimal,
    pub status: StockStatus,
}

impl StockTracking {
    /// Fresh tracking for a quantity nothing has been sold against
    pub fn new(quantity_kg: Decimal) -> Self {
        Self {
            quantity_sold_kg: Decimal::ZERO,
            quantity_remaining_kg: quantity_kg,
            status: StockStatus::Available,
        }
    }

    /// Derive the status from running sold/remaining figures
    pub fn status_for(sold: Decimal, remaining: Decimal) -> StockStatus {
        if sold.is_zero() {
            StockStatus::Available
        } else if remaining.is_zero() {
            StockStatus::SoldOut
        } else {
            StockStatus::PartiallySold
        }
    }

    /// Apply a committed sale of `quantity_kg`.
    ///
    /// The caller must already have checked `quantity_kg` against
    /// `quantity_remaining_kg`; this only moves the figures.
    pub fn apply_sale(&mut self, quantity_kg: Decimal) {
        self.quantity_sold_kg += quantity_kg;
        self.quantity_remaining_kg -= quantity_kg;
        self.status = Self::status_for(self.quantity_sold_kg, self.quantity_remaining_kg);
    }
}

/// One waste-type line within a pickup
///
/// Carries up to four monetary roles; each amount is computed at ingestion
/// as `round_money(quantity × unit price)`. `stock` is `Some` only for
/// recyclable lines; `None` means resale tracking does not apply, which is
/// distinct from a tracked quantity of zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PickupItem {
    pub id: Uuid,
    pub category: WasteCategory,
    /// Sub-type label (e.g. "carton", "plastique", "DIB")
    pub label: String,
    pub quantity_kg: Decimal,
    pub unit: String,
    pub client_sale_unit_price: Option<Decimal>,
    pub client_sale_amount: Option<Decimal>,
    pub service_unit_price: Option<Decimal>,
    pub service_amount: Option<Decimal>,
    pub purchase_unit_price: Option<Decimal>,
    pub purchase_amount: Option<Decimal>,
    pub treatment_unit_price: Option<Decimal>,
    pub treatment_amount: Option<Decimal>,
    pub stock: Option<StockTracking>,
}

impl PickupItem {
    /// Amount this line contributes to the pickup summary.
    ///
    /// Recyclable lines are credited to the client at the purchase price;
    /// banal and to-destroy lines are billed at the treatment price. A
    /// missing amount counts as zero.
    pub fn billed_amount(&self) -> Decimal {
        match self.category {
            WasteCategory::Recyclable => self.purchase_amount.unwrap_or(Decimal::ZERO),
            WasteCategory::Banal | WasteCategory::ToDestroy => {
                self.treatment_amount.unwrap_or(Decimal::ZERO)
            }
        }
    }
}

/// Lifecycle state of a pickup
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PickupStatus {
    /// Items may still be added or edited
    Open,
    /// At least one item has been sold against; the ledger is read-only
    Locked,
}

/// A waste-collection event (enlevement) with its item lines
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pickup {
    pub id: Uuid,
    /// Unique pickup number (e.g. "ENL-2024-0001")
    pub pickup_number: String,
    pub pickup_date: DateTime<Utc>,
    pub destination_date: Option<DateTime<Utc>>,
    pub company_id: Uuid,
    pub site_id: Uuid,
    pub truck_id: Option<Uuid>,
    pub driver_name: Option<String>,
    pub destination_id: Option<Uuid>,
    pub status: PickupStatus,
    pub items: Vec<PickupItem>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Pickup {
    pub fn item(&self, item_id: Uuid) -> Option<&PickupItem> {
        self.items.iter().find(|i| i.id == item_id)
    }

    pub fn item_mut(&mut self, item_id: Uuid) -> Option<&mut PickupItem> {
        self.items.iter_mut().find(|i| i.id == item_id)
    }

    pub fn is_locked(&self) -> bool {
        self.status == PickupStatus::Locked
    }
}

/// Generate a pickup number
pub fn generate_pickup_number(prefix: &str, year: i32, sequence: i32) -> String {
    format!("{}-{}-{:04}", prefix, year, sequence)
}
