//! Business logic services for the recycling operations platform

pub mod pickup;
pub mod reporting;
pub mod sale;
pub mod stock;

pub use pickup::PickupService;
pub use reporting::ReportingService;
pub use sale::SaleService;
pub use stock::StockService;
