//! Error handling for the Waste Collection & Recycling Operations Platform
//!
//! Provides consistent error payloads in French and English

use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Validation errors
    #[error("Validation error: {message}")]
    Validation {
        field: String,
        message: String,
        message_fr: String,
    },

    #[error("Data integrity error: {0}")]
    DataIntegrity(String),

    #[error("Duplicate entry: {0}")]
    DuplicateEntry(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    // Business logic errors
    #[error("Insufficient stock on item {item_id}: requested {requested} kg, {remaining} kg remaining")]
    InsufficientStock {
        item_id: Uuid,
        requested: Decimal,
        remaining: Decimal,
    },

    #[error("Pickup {0} is locked")]
    PickupLocked(String),

    #[error("Invalid state transition: {0}")]
    InvalidStateTransition(String),

    // Internal errors
    #[error("Internal error")]
    Internal(#[from] anyhow::Error),
}

/// Error payload structure for embedding API layers
#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message_en: String,
    pub message_fr: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl AppError {
    /// Stable machine-readable code for this error
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation { .. } => "VALIDATION_ERROR",
            AppError::DataIntegrity(_) => "DATA_INTEGRITY_ERROR",
            AppError::DuplicateEntry(_) => "DUPLICATE_ENTRY",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::InsufficientStock { .. } => "INSUFFICIENT_STOCK",
            AppError::PickupLocked(_) => "PICKUP_LOCKED",
            AppError::InvalidStateTransition(_) => "INVALID_STATE_TRANSITION",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Serializable detail payload with bilingual messages
    pub fn detail(&self) -> ErrorDetail {
        let (message_en, message_fr, field) = match self {
            AppError::Validation {
                field,
                message,
                message_fr,
            } => (message.clone(), message_fr.clone(), Some(field.clone())),
            AppError::DataIntegrity(msg) => (
                msg.clone(),
                format!("Données incohérentes : {}", msg),
                None,
            ),
            AppError::DuplicateEntry(field) => (
                format!("A record with this {} already exists", field),
                format!("Un enregistrement avec ce {} existe déjà", field),
                Some(field.clone()),
            ),
            AppError::NotFound(resource) => (
                format!("{} not found", resource),
                format!("{} introuvable", resource),
                None,
            ),
            AppError::InsufficientStock {
                item_id,
                requested,
                remaining,
            } => (
                format!(
                    "Insufficient stock on item {}: requested {} kg, {} kg remaining",
                    item_id, requested, remaining
                ),
                format!(
                    "Stock insuffisant sur l'article {} : {} kg demandés, {} kg restants",
                    item_id, requested, remaining
                ),
                None,
            ),
            AppError::PickupLocked(number) => (
                format!("Pickup {} has been sold against and is read-only", number),
                format!("L'enlèvement {} a fait l'objet d'une vente et est verrouillé", number),
                None,
            ),
            AppError::InvalidStateTransition(msg) => (
                msg.clone(),
                format!("Transition d'état invalide : {}", msg),
                None,
            ),
            AppError::Internal(_) => (
                "An internal error occurred".to_string(),
                "Une erreur interne est survenue".to_string(),
                None,
            ),
        };

        ErrorDetail {
            code: self.code().to_string(),
            message_en,
            message_fr,
            field,
        }
    }
}

/// Result type alias for the services
pub type AppResult<T> = Result<T, AppError>;
