//! Configuration management for the Waste Collection & Recycling Operations Platform
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with WRO_ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Operations configuration
    pub operations: OperationsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct OperationsConfig {
    /// Currency code applied to monetary amounts
    pub currency: String,

    /// Measurement unit applied when an item line gives none
    pub default_unit: String,

    /// Prefix of pickup numbers (e.g. "ENL" for "ENL-2024-0001")
    pub pickup_number_prefix: String,

    /// Prefix of sale numbers (e.g. "VTE" for "VTE-2024-0001")
    pub sale_number_prefix: String,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("WRO_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("operations.currency", shared::types::DEFAULT_CURRENCY)?
            .set_default("operations.default_unit", shared::types::DEFAULT_UNIT)?
            .set_default("operations.pickup_number_prefix", "ENL")?
            .set_default("operations.sale_number_prefix", "VTE")?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (WRO_ prefix)
            .add_source(
                Environment::with_prefix("WRO")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
