//! # A2E API
//!
//! The HTTP surface over the provider engine, two routers on one state:
//! - the platform **open API** agents call (discovery, search, protocol,
//!   consumer tokens, execute), `{code, message, data}`-enveloped;
//! - the provider **service API** the protocol document describes (menu,
//!   orders, order status), with raw `{code, message}` errors.

pub mod error;
pub mod platform;
pub mod routes;
pub mod server;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use server::serve;
pub use state::AppState;
