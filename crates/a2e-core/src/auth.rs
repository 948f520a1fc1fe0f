//! Delegated-authorization wire models
//!
//! A consumer token is an opaque string bound to one (user, agent) pair at
//! issuance. The provider resolves it to a [`UserIdentity`] on every
//! protected request; the agent only ever sees the opaque string.

use serde::{Deserialize, Serialize};

/// Cached display info for the user behind a token.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UserInfo {
    #[serde(default)]
    pub nickname: String,
    #[serde(default)]
    pub avatar: String,
}

/// Result of creating a consumer token on the platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthGrant {
    /// The opaque token string.
    pub consumer_token: String,
    /// Seconds until expiry.
    pub expires_in: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_info: Option<UserInfo>,
}

/// Stable identity a provider resolves a token to.
///
/// Used downstream for ownership checks; never constructed partially.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub user_id: String,
    #[serde(default)]
    pub nickname: String,
}

/// Typed success payload of a service execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecuteOutcome {
    /// Platform-assigned id for this execution.
    #[serde(default)]
    pub execution_id: String,
    /// Execution status, e.g. `completed`.
    #[serde(default)]
    pub status: String,
    /// Endpoint output payload.
    #[serde(default)]
    pub output: serde_json::Value,
    /// Business-rule failure, when the provider rejected the request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ExecuteFault>,
}

impl ExecuteOutcome {
    /// Successful outcome with an output payload.
    pub fn completed(execution_id: impl Into<String>, output: serde_json::Value) -> Self {
        Self {
            execution_id: execution_id.into(),
            status: "completed".to_string(),
            output,
            error: None,
        }
    }

    /// Failed outcome carrying the provider's code verbatim.
    pub fn failed(execution_id: impl Into<String>, fault: ExecuteFault) -> Self {
        Self {
            execution_id: execution_id.into(),
            status: "failed".to_string(),
            output: serde_json::Value::Null,
            error: Some(fault),
        }
    }
}

/// Typed failure payload of a service execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecuteFault {
    /// Stable provider error code, preserved verbatim.
    pub code: String,
    #[serde(default)]
    pub message: String,
    /// Remediation hint, when the provider has one.
    #[serde(default)]
    pub suggestion: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grant_round_trip() {
        let grant = AuthGrant {
            consumer_token: "token_abc123".into(),
            expires_in: 3600,
            user_info: Some(UserInfo {
                nickname: "张三".into(),
                avatar: String::new(),
            }),
        };
        let json = serde_json::to_string(&grant).unwrap();
        let back: AuthGrant = serde_json::from_str(&json).unwrap();
        assert_eq!(back.consumer_token, "token_abc123");
        assert_eq!(back.user_info.unwrap().nickname, "张三");
    }

    #[test]
    fn test_fault_defaults() {
        let fault: ExecuteFault = serde_json::from_str(r#"{"code":"SHOP_CLOSED"}"#).unwrap();
        assert_eq!(fault.code, "SHOP_CLOSED");
        assert!(fault.suggestion.is_empty());
    }
}
