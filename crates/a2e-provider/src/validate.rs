//! Order request validation
//!
//! Checks run in a fixed order and short-circuit on the first violation,
//! so the reported error always matches the first rule a request breaks:
//! availability window, then referential integrity, then quantity, then
//! option compatibility, then the minimum-order threshold.
//!
//! On success the caller gets a [`ValidatedOrder`] carrying exact totals
//! and normalized items; partially-validated data is never returned.

use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::catalog::Catalog;
use crate::config::OrderPolicy;
use crate::error::ProviderError;
use a2e_core::Money;

/// One requested line item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: i64,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    /// Selected option values, e.g. `sugar` -> `半糖`.
    #[serde(default)]
    pub options: BTreeMap<String, String>,
}

fn default_quantity() -> u32 {
    1
}

/// An agent-issued order request, pre-validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderRequest {
    pub items: Vec<OrderItem>,
    pub address: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// A line item after validation, with computed prices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricedItem {
    pub product_id: i64,
    pub product_name: String,
    pub quantity: u32,
    pub options: BTreeMap<String, String>,
    pub unit_price: Money,
    pub total_price: Money,
}

/// The validated form of a request: normalized items plus exact totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidatedOrder {
    pub items: Vec<PricedItem>,
    pub total_amount: Money,
    pub address: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Validate a request against the catalog and policy at time `now`.
pub fn validate(
    request: &OrderRequest,
    catalog: &Catalog,
    policy: &OrderPolicy,
    now: DateTime<Utc>,
) -> Result<ValidatedOrder, ProviderError> {
    if !policy.is_open_at(now.hour()) {
        return Err(ProviderError::ServiceUnavailable {
            open_hour: policy.open_hour,
            close_hour: policy.close_hour,
        });
    }

    let mut items = Vec::with_capacity(request.items.len());
    let mut total_amount = Money::ZERO;

    for item in &request.items {
        let product = catalog
            .get(item.product_id)
            .ok_or(ProviderError::UnknownProduct(item.product_id))?;

        if item.quantity == 0 {
            return Err(ProviderError::InvalidQuantity(item.product_id));
        }

        for (option, value) in &item.options {
            if !product.allows_option(option, value) {
                return Err(ProviderError::IncompatibleOption {
                    product: product.name.clone(),
                    option: option.clone(),
                    value: value.clone(),
                });
            }
        }

        let total_price = product.price.times(item.quantity);
        total_amount += total_price;
        items.push(PricedItem {
            product_id: product.id,
            product_name: product.name.clone(),
            quantity: item.quantity,
            options: item.options.clone(),
            unit_price: product.price,
            total_price,
        });
    }

    if total_amount < policy.minimum_order {
        return Err(ProviderError::BelowMinimum {
            total: total_amount,
            minimum: policy.minimum_order,
        });
    }

    Ok(ValidatedOrder {
        items,
        total_amount,
        address: request.address.clone(),
        phone: request.phone.clone(),
        note: request.note.clone(),
    })
}
