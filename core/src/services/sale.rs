//! Sale submission service
//!
//! A sale is one atomic unit of work: every line is validated and every
//! referenced pickup item's stock checked before any deduction is
//! applied, all under a single registry write guard. One failing line
//! aborts the whole submission with nothing committed.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use shared::models::{Sale, SaleItem, SaleStatus, WasteCategory};
use shared::types::line_amount;
use shared::validation::{validate_document_number, validate_sale_quantity, validate_unit_price};

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::services::stock;
use crate::store::Registry;

/// Input for submitting a sale
#[derive(Debug, Deserialize)]
pub struct CreateSaleInput {
    pub sale_number: String,
    pub buyer_id: Option<Uuid>,
    pub buyer_name: String,
    pub sale_date: DateTime<Utc>,
    pub items: Vec<SaleItemInput>,
}

/// Input for one sale line.
///
/// Either `pickup_item_id` or `category` + `label` must be provided: a
/// referenced line takes its category and label from the pickup item, an
/// unreferenced line describes stock sold outside the pickup ledger.
#[derive(Debug, Deserialize)]
pub struct SaleItemInput {
    pub pickup_item_id: Option<Uuid>,
    pub category: Option<String>,
    pub label: Option<String>,
    pub quantity_kg: Decimal,
    pub unit_price: Decimal,
}

/// Sale service for committing resale transactions
#[derive(Clone)]
pub struct SaleService {
    registry: Arc<Registry>,
    config: Arc<Config>,
}

impl SaleService {
    pub fn new(registry: Arc<Registry>, config: Arc<Config>) -> Self {
        Self { registry, config }
    }

    /// Submit a sale as a single atomic unit of work
    pub fn submit(&self, user_id: Option<Uuid>, input: CreateSaleInput) -> AppResult<Sale> {
        if let Err(msg) = validate_document_number(
            &input.sale_number,
            &self.config.operations.sale_number_prefix,
        ) {
            return Err(AppError::Validation {
                field: "sale_number".to_string(),
                message: msg.to_string(),
                message_fr: "Numéro de vente invalide".to_string(),
            });
        }
        if input.items.is_empty() {
            return Err(AppError::Validation {
                field: "items".to_string(),
                message: "A sale needs at least one item line".to_string(),
                message_fr: "Une vente nécessite au moins une ligne".to_string(),
            });
        }
        for (idx, line) in input.items.iter().enumerate() {
            if let Err(msg) = validate_sale_quantity(line.quantity_kg) {
                return Err(AppError::Validation {
                    field: format!("items[{}].quantity_kg", idx),
                    message: msg.to_string(),
                    message_fr: "La quantité vendue doit être positive".to_string(),
                });
            }
            if let Err(msg) = validate_unit_price(line.unit_price) {
                return Err(AppError::Validation {
                    field: format!("items[{}].unit_price", idx),
                    message: msg.to_string(),
                    message_fr: "Le prix unitaire ne peut pas être négatif".to_string(),
                });
            }
        }

        let now = Utc::now();
        let mut inner = self.registry.write();

        if inner
            .sales
            .values()
            .any(|s| s.sale_number == input.sale_number)
        {
            return Err(AppError::DuplicateEntry("sale_number".to_string()));
        }

        // Resolve every line's category and label without touching stock.
        let mut resolved: Vec<(WasteCategory, String)> = Vec::with_capacity(input.items.len());
        for (idx, line) in input.items.iter().enumerate() {
            match line.pickup_item_id {
                Some(item_id) => {
                    let item = stock::find_item(&inner, item_id)?;
                    resolved.push((item.category, item.label.clone()));
                }
                None => {
                    let category = match line.category.as_deref() {
                        Some(label) => WasteCategory::parse(label).ok_or_else(|| {
                            AppError::DataIntegrity(format!(
                                "unrecognized waste category '{}'",
                                label
                            ))
                        })?,
                        None => {
                            return Err(AppError::Validation {
                                field: format!("items[{}]", idx),
                                message: "Either pickup_item_id or category and label must be provided".to_string(),
                                message_fr: "pickup_item_id ou category et label doivent être renseignés".to_string(),
                            });
                        }
                    };
                    let label = match line.label.clone() {
                        Some(label) => label,
                        None => {
                            return Err(AppError::Validation {
                                field: format!("items[{}]", idx),
                                message: "Either pickup_item_id or category and label must be provided".to_string(),
                                message_fr: "pickup_item_id ou category et label doivent être renseignés".to_string(),
                            });
                        }
                    };
                    resolved.push((category, label));
                }
            }
        }

        // Lines referencing the same pickup item must fit the remaining
        // stock together, not just individually.
        let mut requested: HashMap<Uuid, Decimal> = HashMap::new();
        for line in &input.items {
            if let Some(item_id) = line.pickup_item_id {
                *requested.entry(item_id).or_insert(Decimal::ZERO) += line.quantity_kg;
            }
        }
        for (item_id, quantity_kg) in &requested {
            let item = stock::find_item(&inner, *item_id)?;
            let tracking = item.stock.as_ref().ok_or_else(|| {
                AppError::DataIntegrity(format!(
                    "stock tracking does not apply to {} item {}",
                    item.category, item_id
                ))
            })?;
            if *quantity_kg > tracking.quantity_remaining_kg {
                return Err(AppError::InsufficientStock {
                    item_id: *item_id,
                    requested: *quantity_kg,
                    remaining: tracking.quantity_remaining_kg,
                });
            }
        }

        // Every check passed: apply the deductions and build the lines.
        let mut items = Vec::with_capacity(input.items.len());
        for (line, (category, label)) in input.items.into_iter().zip(resolved) {
            if let Some(item_id) = line.pickup_item_id {
                stock::record_sale_on(&mut inner, item_id, line.quantity_kg)?;
            }
            items.push(SaleItem {
                id: Uuid::new_v4(),
                pickup_item_id: line.pickup_item_id,
                category,
                label,
                quantity_kg: line.quantity_kg,
                unit_price: line.unit_price,
                amount: line_amount(line.quantity_kg, line.unit_price),
                created_at: now,
            });
        }

        let sale = Sale {
            id: Uuid::new_v4(),
            sale_number: input.sale_number,
            buyer_id: input.buyer_id,
            buyer_name: input.buyer_name,
            sale_date: input.sale_date,
            status: SaleStatus::Confirmed,
            items,
            created_by: user_id,
            created_at: now,
            updated_at: now,
        };

        tracing::info!(
            sale_number = %sale.sale_number,
            item_count = sale.items.len(),
            total_amount = %sale.total_amount(),
            "committed sale"
        );

        inner.sales.insert(sale.id, sale.clone());
        Ok(sale)
    }

    /// Mark a confirmed sale as paid
    pub fn mark_paid(&self, sale_id: Uuid) -> AppResult<Sale> {
        let mut inner = self.registry.write();
        let sale = inner
            .sales
            .get_mut(&sale_id)
            .ok_or_else(|| AppError::NotFound("Sale".to_string()))?;
        if sale.status == SaleStatus::Paid {
            return Err(AppError::InvalidStateTransition(format!(
                "sale {} is already paid",
                sale.sale_number
            )));
        }
        sale.status = SaleStatus::Paid;
        sale.updated_at = Utc::now();
        Ok(sale.clone())
    }

    /// Get a sale by id
    pub fn get_sale(&self, sale_id: Uuid) -> AppResult<Sale> {
        self.registry
            .read()
            .sales
            .get(&sale_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound("Sale".to_string()))
    }

    /// List all sales, most recent first
    pub fn list_sales(&self) -> Vec<Sale> {
        let mut sales: Vec<Sale> = self.registry.read().sales.values().cloned().collect();
        sales.sort_by(|a, b| b.sale_date.cmp(&a.sale_date));
        sales
    }
}
