//! Validation utilities for the Waste Collection & Recycling Operations Platform
//!
//! Includes Morocco-specific validations for compliance with local
//! business-identifier formats.

use rust_decimal::Decimal;

// ============================================================================
// Quantity and Price Validations
// ============================================================================

/// Validate a pickup item quantity (non-negative)
pub fn validate_quantity(quantity_kg: Decimal) -> Result<(), &'static str> {
    if quantity_kg < Decimal::ZERO {
        return Err("Quantity cannot be negative");
    }
    Ok(())
}

/// Validate a sale quantity (strictly positive)
pub fn validate_sale_quantity(quantity_kg: Decimal) -> Result<(), &'static str> {
    if quantity_kg <= Decimal::ZERO {
        return Err("Sale quantity must be positive");
    }
    Ok(())
}

/// Validate a unit price (non-negative)
pub fn validate_unit_price(unit_price: Decimal) -> Result<(), &'static str> {
    if unit_price < Decimal::ZERO {
        return Err("Unit price cannot be negative");
    }
    Ok(())
}

// ============================================================================
// Document Number Validations
// ============================================================================

/// Validate a document number of the form PREFIX-YYYY-NNNN
/// (e.g. "ENL-2024-0001", "VTE-2024-0042")
pub fn validate_document_number(number: &str, prefix: &str) -> Result<(), &'static str> {
    let parts: Vec<&str> = number.split('-').collect();

    if parts.len() != 3 {
        return Err("Document number must be in format PREFIX-YYYY-NNNN");
    }

    if parts[0] != prefix {
        return Err("Document number has the wrong prefix");
    }

    // Validate year
    if parts[1].len() != 4 || !parts[1].chars().all(|c| c.is_ascii_digit()) {
        return Err("Invalid year in document number");
    }

    // Validate sequence number
    if parts[2].len() != 4 || !parts[2].chars().all(|c| c.is_ascii_digit()) {
        return Err("Invalid sequence number in document number");
    }

    Ok(())
}

// ============================================================================
// General Validations
// ============================================================================

/// Validate email format (basic check)
pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if email.contains('@') && email.contains('.') && email.len() >= 5 {
        Ok(())
    } else {
        Err("Invalid email format")
    }
}

// ============================================================================
// Morocco-Specific Validations
// ============================================================================

/// Validate a Moroccan ICE (Identifiant Commun de l'Entreprise)
/// 15-digit company identifier
pub fn validate_ice(ice: &str) -> Result<(), &'static str> {
    let digits: String = ice.chars().filter(|c| c.is_ascii_digit()).collect();

    if digits.len() != 15 {
        return Err("ICE must be 15 digits");
    }
    if digits.len() != ice.len() {
        return Err("ICE must contain digits only");
    }

    Ok(())
}

/// Validate a Moroccan phone number
/// Accepts: 0612345678, 06-12-34-56-78, +212612345678
pub fn validate_moroccan_phone(phone: &str) -> Result<(), &'static str> {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();

    // National format: 10 digits starting with 0 (e.g. 0612345678)
    if digits.len() == 10 && digits.starts_with('0') {
        return Ok(());
    }
    // International format without leading 0: 9 digits
    if digits.len() == 9 && !digits.starts_with('0') {
        return Ok(());
    }
    // International format with country code: 12 digits starting with 212
    if digits.len() == 12 && digits.starts_with("212") {
        return Ok(());
    }

    Err("Invalid Moroccan phone number format")
}
