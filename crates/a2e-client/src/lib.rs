//! # A2E Client
//!
//! Agent-side SDK for the A2E protocol:
//! - [`A2eClient`] — typed HTTP client over the platform open API
//! - [`Orchestrator`] — the discover → search → protocol → auth → execute
//!   session, with each phase as a typed result

pub mod client;
pub mod error;
pub mod orchestrator;

pub use client::{A2eClient, DiscoverySummary, SearchParams, TokenRequest};
pub use error::ClientError;
pub use orchestrator::{Orchestrator, PhaseOutcome, SessionConfig, SessionOutcome, SessionReport};
