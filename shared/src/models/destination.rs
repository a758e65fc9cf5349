//! Destination facility models

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of facility waste is routed to
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FacilityType {
    RecyclingCenter,
    SortingCenter,
    Landfill,
    Incinerator,
}

impl std::fmt::Display for FacilityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FacilityType::RecyclingCenter => write!(f, "Recycling Center"),
            FacilityType::SortingCenter => write!(f, "Sorting Center"),
            FacilityType::Landfill => write!(f, "Landfill"),
            FacilityType::Incinerator => write!(f, "Incinerator"),
        }
    }
}

/// A treatment or recycling facility pickups are delivered to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Destination {
    pub id: Uuid,
    pub name: String,
    pub facility_type: FacilityType,
    pub city: String,
}
