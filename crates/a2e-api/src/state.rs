//! Application state
//!
//! One state serves both routers: the product catalog, the order policy,
//! the execution engine over an injectable ledger, the token issuer, and
//! the registry of published services with their protocol documents.

use std::sync::Arc;

use a2e_core::{Protocol, Service};
use a2e_provider::{Catalog, ExecutionEngine, OrderPolicy, OrderStore, TokenIssuer};

/// A published service together with its protocol document.
#[derive(Debug, Clone)]
pub struct ServiceEntry {
    pub service: Service,
    pub protocol: Protocol,
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    catalog: Arc<Catalog>,
    policy: OrderPolicy,
    engine: Arc<ExecutionEngine<Arc<dyn OrderStore>>>,
    issuer: Arc<TokenIssuer>,
    services: Arc<Vec<ServiceEntry>>,
}

impl AppState {
    /// Assemble state from its parts. Protocol documents are expected to
    /// have been validated at publication time.
    pub fn new(
        catalog: Catalog,
        policy: OrderPolicy,
        store: Arc<dyn OrderStore>,
        issuer: TokenIssuer,
        services: Vec<ServiceEntry>,
    ) -> Self {
        Self {
            catalog: Arc::new(catalog),
            engine: Arc::new(ExecutionEngine::new(store, policy.clone())),
            policy,
            issuer: Arc::new(issuer),
            services: Arc::new(services),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn policy(&self) -> &OrderPolicy {
        &self.policy
    }

    pub fn engine(&self) -> &ExecutionEngine<Arc<dyn OrderStore>> {
        &self.engine
    }

    pub fn issuer(&self) -> &TokenIssuer {
        &self.issuer
    }

    pub fn services(&self) -> &[ServiceEntry] {
        &self.services
    }

    /// Look up a published service by id.
    pub fn service(&self, id: &str) -> Option<&ServiceEntry> {
        self.services.iter().find(|entry| entry.service.id == id)
    }

    /// The protocol document of the first published service, if any.
    /// Serves the provider's own `/api/a2e/protocol` endpoint.
    pub fn own_protocol(&self) -> Option<&Protocol> {
        self.services.first().map(|entry| &entry.protocol)
    }
}
