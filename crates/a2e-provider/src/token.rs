//! Consumer token verification and issuance
//!
//! A consumer token is an opaque `token_`-prefixed string the platform
//! issues for one (user, agent) pair. Verification is stateless per call
//! and safe to run concurrently with itself.
//!
//! Unknown and expired tokens both fail with
//! [`ProviderError::InvalidToken`]: callers cannot tell whether a guessed
//! token was ever real.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::error::ProviderError;
use a2e_core::{AuthGrant, UserIdentity, UserInfo};

/// Expected token prefix; anything else fails the syntactic check.
pub const TOKEN_PREFIX: &str = "token_";

/// Resolves an opaque bearer credential to a user identity.
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    /// Verify a token, returning the bound identity or `InvalidToken`.
    async fn verify(&self, token: &str) -> Result<UserIdentity, ProviderError>;
}

/// Syntactic shape check shared by all verifiers.
fn check_shape(token: &str) -> Result<(), ProviderError> {
    if token.is_empty() || !token.starts_with(TOKEN_PREFIX) {
        return Err(ProviderError::InvalidToken);
    }
    Ok(())
}

/// Shape-only verifier with a fixed identity.
///
/// Mirrors a provider that delegates real verification to the platform;
/// used by demos and tests.
#[derive(Debug, Clone)]
pub struct StaticVerifier {
    identity: UserIdentity,
}

impl StaticVerifier {
    pub fn new(identity: UserIdentity) -> Self {
        Self { identity }
    }
}

impl Default for StaticVerifier {
    fn default() -> Self {
        Self::new(UserIdentity {
            user_id: "user_12345".to_string(),
            nickname: "张三".to_string(),
        })
    }
}

#[async_trait]
impl TokenVerifier for StaticVerifier {
    async fn verify(&self, token: &str) -> Result<UserIdentity, ProviderError> {
        check_shape(token)?;
        Ok(self.identity.clone())
    }
}

struct IssuedToken {
    identity: UserIdentity,
    expires_at: DateTime<Utc>,
}

/// In-memory token issuer backing the platform's consumer-token endpoint.
///
/// Issues `token_<32 hex>` strings with an expiry and verifies them by
/// registry lookup. Tokens are never mutated after issuance; they lapse by
/// expiry only.
pub struct TokenIssuer {
    tokens: RwLock<HashMap<String, IssuedToken>>,
    ttl: Duration,
}

impl TokenIssuer {
    /// Issuer with the given token lifetime.
    pub fn new(ttl: Duration) -> Self {
        Self {
            tokens: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Issue a token for a user acting through an agent.
    pub async fn issue(&self, phone: &str, nickname: &str) -> AuthGrant {
        let suffix: [u8; 16] = rand::rng().random();
        let token = format!("{}{}", TOKEN_PREFIX, hex::encode(suffix));

        // Stable per-phone identity so repeated grants map to one user.
        // Last five characters, not bytes; phones are caller input and may
        // be non-ASCII.
        let tail = phone
            .char_indices()
            .rev()
            .nth(4)
            .map_or(phone, |(start, _)| &phone[start..]);
        let identity = UserIdentity {
            user_id: format!("user_{tail}"),
            nickname: nickname.to_string(),
        };

        self.tokens.write().await.insert(
            token.clone(),
            IssuedToken {
                identity: identity.clone(),
                expires_at: Utc::now() + self.ttl,
            },
        );
        tracing::debug!(user_id = %identity.user_id, "issued consumer token");

        AuthGrant {
            consumer_token: token,
            expires_in: self.ttl.num_seconds(),
            user_info: Some(UserInfo {
                nickname: nickname.to_string(),
                avatar: String::new(),
            }),
        }
    }
}

impl Default for TokenIssuer {
    fn default() -> Self {
        Self::new(Duration::hours(2))
    }
}

#[async_trait]
impl TokenVerifier for TokenIssuer {
    async fn verify(&self, token: &str) -> Result<UserIdentity, ProviderError> {
        check_shape(token)?;
        let tokens = self.tokens.read().await;
        match tokens.get(token) {
            Some(issued) if issued.expires_at > Utc::now() => Ok(issued.identity.clone()),
            // Unknown and expired are deliberately the same outcome.
            _ => Err(ProviderError::InvalidToken),
        }
    }
}
