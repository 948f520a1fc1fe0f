//! Read-only product catalog
//!
//! Products are reference data supplied by the provider; validation reads
//! them, nothing in the engine ever mutates them. The options schema maps
//! an option name (e.g. `sugar`) to the set of permitted string values.

use a2e_core::Money;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A purchasable product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub price: Money,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    /// Option name to permitted values, e.g. `sugar` -> `["全糖", "半糖"]`.
    #[serde(default)]
    pub options: BTreeMap<String, Vec<String>>,
}

impl Product {
    /// Whether `value` is a permitted choice for option `name`.
    pub fn allows_option(&self, name: &str, value: &str) -> bool {
        self.options
            .get(name)
            .is_some_and(|values| values.iter().any(|v| v == value))
    }
}

/// Ordered, immutable product list with id lookup.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// Look up a product by id.
    pub fn get(&self, id: i64) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// All products, in catalog order.
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Products in one category, preserving catalog order.
    pub fn by_category(&self, category: &str) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|p| p.category == category)
            .collect()
    }

    /// Categories grouped for menu rendering, first-seen order.
    pub fn categories(&self) -> Vec<(String, Vec<&Product>)> {
        let mut grouped: Vec<(String, Vec<&Product>)> = Vec::new();
        for product in &self.products {
            match grouped.iter_mut().find(|(name, _)| *name == product.category) {
                Some((_, items)) => items.push(product),
                None => grouped.push((product.category.clone(), vec![product])),
            }
        }
        grouped
    }
}
