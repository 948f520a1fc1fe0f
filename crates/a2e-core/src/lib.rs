//! # A2E Core
//!
//! Core types for the A2E (Agent-to-EveryThing) protocol:
//! - [`Protocol`] — machine-readable capability/permission contract for a service
//! - [`Service`] — published service identity, searchable by agents
//! - [`Money`] — exact currency-scale amounts (minor units)
//! - [`Envelope`] — the `{code, message, data}` platform wire wrapper

pub mod auth;
pub mod envelope;
pub mod money;
pub mod protocol;
pub mod service;

pub use auth::{AuthGrant, ExecuteFault, ExecuteOutcome, UserIdentity, UserInfo};
pub use envelope::Envelope;
pub use money::Money;
pub use protocol::{
    AuthInfo, AuthMethod, Endpoint, ErrorCode, ErrorHandling, Permission, PermissionInfo,
    Protocol, ProtocolError, SemanticInfo, ServiceInfo,
};
pub use service::{ProviderRef, SearchPage, Service};
