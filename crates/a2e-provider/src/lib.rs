//! # A2E Provider
//!
//! Provider-side engine for the A2E protocol. Everything that decides
//! whether an agent-issued request may run, and what running it does:
//! - [`TokenVerifier`] — resolves opaque consumer tokens to user identities
//! - [`validate`] — ordered business-rule validation of order requests
//! - [`ExecutionEngine`] — applies validated requests to the order ledger
//! - [`OrderStore`] — injectable persistence seam for the ledger

pub mod catalog;
pub mod config;
pub mod error;
pub mod execute;
pub mod token;
pub mod validate;

pub use catalog::{Catalog, Product};
pub use config::OrderPolicy;
pub use error::ProviderError;
pub use execute::{ExecutionEngine, MemoryOrderStore, Order, OrderStatus, OrderStore};
pub use token::{StaticVerifier, TokenIssuer, TokenVerifier};
pub use validate::{validate, OrderItem, OrderRequest, PricedItem, ValidatedOrder};
