//! Waste Collection & Recycling Operations Platform - computation core
//!
//! Aggregates pickup item ledgers into financial and environmental
//! summaries, and reconciles recyclable stock against resale
//! transactions. Persistence and API shaping are left to the embedding
//! application; the [`store::Registry`] is the in-process collaborator
//! the services operate against.

pub mod config;
pub mod error;
pub mod services;
pub mod store;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use store::Registry;
