//! A2E Protocol document
//!
//! The Protocol document is the machine-readable contract a service
//! publishes for agents: what it does (semantic layer), how to call it
//! (endpoints), what authorization it needs (authentication, permissions),
//! and how it fails (error catalog). Agents fetch it once per service and
//! drive every subsequent call from it.
//!
//! Documents are validated at load time: a permission or payment flag that
//! references an endpoint absent from the endpoint list is a contract
//! violation and fails with [`ProtocolError::Malformed`] before the
//! document is ever used.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Errors raised by protocol document handling.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// The document is self-inconsistent (dangling endpoint reference).
    #[error("malformed protocol: {0}")]
    Malformed(String),

    /// The document could not be parsed at all.
    #[error("unparseable protocol: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A2E Protocol document, bound 1:1 to a published service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Protocol {
    /// Protocol document version.
    #[serde(default = "default_version")]
    pub version: String,
    /// Identity of the service this document describes.
    #[serde(default)]
    pub service: ServiceInfo,
    /// Free-text capability advertisement (not machine-enforced).
    #[serde(default)]
    pub semantic: SemanticInfo,
    /// Authentication requirements.
    #[serde(default)]
    pub authentication: AuthInfo,
    /// Permissions gating individual endpoints.
    #[serde(default)]
    pub permissions: PermissionInfo,
    /// Invocable operations, in declaration order.
    #[serde(default)]
    pub endpoints: Vec<Endpoint>,
    /// Catalog of error codes the service may return.
    #[serde(default)]
    pub error_handling: ErrorHandling,
}

fn default_version() -> String {
    "1.0.0".to_string()
}

/// Service identity embedded in a protocol document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ServiceInfo {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub service_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<crate::service::ProviderRef>,
}

/// Semantic description of what the service does.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SemanticInfo {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub capabilities: Vec<String>,
    #[serde(default)]
    pub constraints: Vec<String>,
}

/// Authentication configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AuthInfo {
    /// Whether calls require a consumer token.
    #[serde(default)]
    pub required: bool,
    /// Supported methods, in preference order.
    #[serde(default)]
    pub methods: Vec<AuthMethod>,
}

/// One supported authentication method.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthMethod {
    #[serde(rename = "type")]
    pub auth_type: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub endpoint: String,
}

/// Required and optional permissions, disjoint lists.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PermissionInfo {
    #[serde(default)]
    pub required: Vec<Permission>,
    #[serde(default)]
    pub optional: Vec<Permission>,
}

/// A permission the user must grant, gating one endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Permission {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Name of the endpoint this permission gates.
    #[serde(default)]
    pub endpoint: String,
}

/// A single invocable operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Endpoint {
    /// Endpoint name, unique within the document.
    pub name: String,
    /// URL path, relative to the service base.
    pub path: String,
    /// HTTP verb.
    #[serde(default = "default_method")]
    pub method: String,
    #[serde(default)]
    pub description: String,
    /// Whether invoking this endpoint creates a payable obligation.
    #[serde(default)]
    pub requires_payment: bool,
    /// JSON Schema for the input payload.
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub input_schema: serde_json::Value,
    /// JSON Schema for the output payload.
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub output_schema: serde_json::Value,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub output_description: String,
}

fn default_method() -> String {
    "POST".to_string()
}

/// One entry in the service's error catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorCode {
    /// Stable machine-readable code.
    pub code: String,
    #[serde(default)]
    pub description: String,
    /// Remediation hint for the caller.
    #[serde(default)]
    pub suggestion: String,
}

/// Error catalog.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ErrorHandling {
    #[serde(default)]
    pub codes: Vec<ErrorCode>,
}

impl Protocol {
    /// Create an empty document for a service, builder-style.
    pub fn new(service: ServiceInfo) -> Self {
        Self {
            version: default_version(),
            service,
            semantic: SemanticInfo::default(),
            authentication: AuthInfo::default(),
            permissions: PermissionInfo::default(),
            endpoints: Vec::new(),
            error_handling: ErrorHandling::default(),
        }
    }

    /// Set the semantic description.
    pub fn with_semantic(mut self, semantic: SemanticInfo) -> Self {
        self.semantic = semantic;
        self
    }

    /// Set the authentication configuration.
    pub fn with_auth(mut self, auth: AuthInfo) -> Self {
        self.authentication = auth;
        self
    }

    /// Declare an endpoint.
    pub fn with_endpoint(mut self, endpoint: Endpoint) -> Self {
        self.endpoints.push(endpoint);
        self
    }

    /// Declare a required permission gating `endpoint`.
    pub fn with_required_permission(
        mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        endpoint: impl Into<String>,
    ) -> Self {
        self.permissions.required.push(Permission {
            name: name.into(),
            description: description.into(),
            endpoint: endpoint.into(),
        });
        self
    }

    /// Declare an error code in the catalog.
    pub fn with_error_code(
        mut self,
        code: impl Into<String>,
        description: impl Into<String>,
        suggestion: impl Into<String>,
    ) -> Self {
        self.error_handling.codes.push(ErrorCode {
            code: code.into(),
            description: description.into(),
            suggestion: suggestion.into(),
        });
        self
    }

    /// Parse a document from JSON and validate it.
    pub fn from_json(json: &str) -> Result<Self, ProtocolError> {
        let protocol: Protocol = serde_json::from_str(json)?;
        protocol.validate()?;
        Ok(protocol)
    }

    /// Parse a document from a JSON value and validate it.
    pub fn from_value(value: serde_json::Value) -> Result<Self, ProtocolError> {
        let protocol: Protocol = serde_json::from_value(value)?;
        protocol.validate()?;
        Ok(protocol)
    }

    /// Look up an endpoint by name.
    pub fn resolve(&self, name: &str) -> Option<&Endpoint> {
        self.endpoints.iter().find(|e| e.name == name)
    }

    /// Permissions the user must grant before any gated call.
    pub fn required_permissions(&self) -> &[Permission] {
        &self.permissions.required
    }

    /// Names of required permissions, deduplicated.
    pub fn required_permission_names(&self) -> BTreeSet<&str> {
        self.permissions
            .required
            .iter()
            .map(|p| p.name.as_str())
            .collect()
    }

    /// Whether the named endpoint creates a payable obligation.
    ///
    /// Fails with [`ProtocolError::Malformed`] if the endpoint is absent,
    /// so a caller can never silently treat an unknown operation as free.
    pub fn requires_payment(&self, name: &str) -> Result<bool, ProtocolError> {
        self.resolve(name)
            .map(|e| e.requires_payment)
            .ok_or_else(|| ProtocolError::Malformed(format!("unknown endpoint '{name}'")))
    }

    /// Check the document's internal referential integrity.
    ///
    /// Every permission (required or optional) that names an endpoint must
    /// reference one present in `endpoints`.
    pub fn validate(&self) -> Result<(), ProtocolError> {
        let names: BTreeSet<&str> = self.endpoints.iter().map(|e| e.name.as_str()).collect();
        for permission in self
            .permissions
            .required
            .iter()
            .chain(self.permissions.optional.iter())
        {
            if !permission.endpoint.is_empty() && !names.contains(permission.endpoint.as_str()) {
                return Err(ProtocolError::Malformed(format!(
                    "permission '{}' references unknown endpoint '{}'",
                    permission.name, permission.endpoint
                )));
            }
        }
        Ok(())
    }
}

impl Endpoint {
    /// Create an endpoint with the given name, path, and verb.
    pub fn new(
        name: impl Into<String>,
        path: impl Into<String>,
        method: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            method: method.into(),
            description: String::new(),
            requires_payment: false,
            input_schema: serde_json::Value::Null,
            output_schema: serde_json::Value::Null,
            output_description: String::new(),
        }
    }

    /// Set the human-readable description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Mark the endpoint as payment-bearing.
    pub fn with_payment(mut self) -> Self {
        self.requires_payment = true;
        self
    }

    /// Attach an input schema.
    pub fn with_input_schema(mut self, schema: serde_json::Value) -> Self {
        self.input_schema = schema;
        self
    }

    /// Attach an output schema.
    pub fn with_output_schema(mut self, schema: serde_json::Value) -> Self {
        self.output_schema = schema;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Protocol {
        Protocol::new(ServiceInfo {
            id: "tea_shop".into(),
            name: "Tea Shop".into(),
            service_type: "food_delivery".into(),
            provider: None,
        })
        .with_endpoint(Endpoint::new("get_menu", "/api/menu", "GET"))
        .with_endpoint(Endpoint::new("create_order", "/api/orders", "POST").with_payment())
        .with_required_permission("user_phone", "contact number for delivery", "create_order")
    }

    #[test]
    fn test_resolve() {
        let protocol = sample();
        assert!(protocol.resolve("get_menu").is_some());
        assert!(protocol.resolve("refund").is_none());
    }

    #[test]
    fn test_requires_payment() {
        let protocol = sample();
        assert!(!protocol.requires_payment("get_menu").unwrap());
        assert!(protocol.requires_payment("create_order").unwrap());
        assert!(protocol.requires_payment("refund").is_err());
    }

    #[test]
    fn test_validate_accepts_consistent_document() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn test_dangling_permission_rejected_at_load() {
        let mut value = serde_json::to_value(sample()).unwrap();
        value["permissions"]["required"][0]["endpoint"] = json!("no_such_endpoint");
        let err = Protocol::from_value(value).unwrap_err();
        assert!(matches!(err, ProtocolError::Malformed(_)));
    }

    #[test]
    fn test_unknown_fields_default_rather_than_fail() {
        let value = json!({
            "version": "1.0.0",
            "endpoints": [{"name": "ping", "path": "/ping", "future_field": true}],
            "unknown_top_level": {"x": 1}
        });
        let protocol = Protocol::from_value(value).unwrap();
        assert_eq!(protocol.endpoints[0].method, "POST");
        assert!(!protocol.authentication.required);
    }

    #[test]
    fn test_round_trip_is_lossless() {
        let protocol = sample();
        let json = serde_json::to_string(&protocol).unwrap();
        let back = Protocol::from_json(&json).unwrap();
        assert_eq!(back, protocol);
    }
}
