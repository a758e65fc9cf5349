//! Fleet models

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A collection truck
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Truck {
    pub id: Uuid,
    pub registration_number: String,
    pub capacity_kg: Option<Decimal>,
}
