//! Typed platform client
//!
//! Thin HTTP wrapper over the platform open API. Every response is a
//! `{code, message, data}` envelope; a non-zero code becomes
//! [`ClientError::Remote`] with the pair preserved, never a silent default.

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::error::ClientError;
use a2e_core::{AuthGrant, Envelope, ExecuteOutcome, Protocol, SearchPage};

/// Platform capability summary returned by discovery.
#[derive(Debug, Clone, Deserialize)]
pub struct DiscoverySummary {
    #[serde(default)]
    pub platform: PlatformSummary,
    #[serde(default)]
    pub endpoints: serde_json::Value,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlatformSummary {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub version: String,
}

/// Service search parameters.
#[derive(Debug, Clone, Default)]
pub struct SearchParams {
    pub keyword: String,
    pub service_type: Option<String>,
    pub page: usize,
    pub size: usize,
}

impl SearchParams {
    /// Search by keyword with default pagination.
    pub fn keyword(keyword: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            service_type: None,
            page: 1,
            size: 10,
        }
    }
}

/// Consumer-token creation request.
#[derive(Debug, Clone, Serialize)]
pub struct TokenRequest {
    pub phone: String,
    pub nickname: String,
    pub agent_name: String,
    pub agent_platform: String,
}

/// Synchronous-feeling async client for the A2E platform API.
#[derive(Debug, Clone)]
pub struct A2eClient {
    client: reqwest::Client,
    base_url: String,
}

impl A2eClient {
    /// Client against a platform base URL (no trailing slash needed).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/v1/open{path}", self.base_url)
    }

    /// Unwrap a platform response into its payload.
    async fn handle<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            // Error bodies still carry {code, message} where possible.
            let (code, message) = match serde_json::from_str::<Envelope<serde_json::Value>>(&text)
            {
                Ok(envelope) if envelope.code != 0 => {
                    (envelope.code.to_string(), envelope.message)
                }
                _ => (status.as_u16().to_string(), text),
            };
            return Err(ClientError::Remote { code, message });
        }

        let envelope: Envelope<T> = serde_json::from_str(&text)
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))?;
        envelope
            .into_result()
            .map_err(|(code, message)| ClientError::Remote {
                code: code.to_string(),
                message,
            })
    }

    /// Fetch the platform capability summary.
    pub async fn discovery(&self) -> Result<DiscoverySummary, ClientError> {
        let response = self.client.get(self.url("/discovery")).send().await?;
        Self::handle(response).await
    }

    /// Search published services.
    pub async fn search_services(&self, params: &SearchParams) -> Result<SearchPage, ClientError> {
        let mut query: Vec<(&str, String)> = vec![
            ("keyword", params.keyword.clone()),
            ("page", params.page.max(1).to_string()),
            ("size", params.size.max(1).to_string()),
        ];
        if let Some(service_type) = &params.service_type {
            query.push(("type", service_type.clone()));
        }

        let response = self
            .client
            .get(self.url("/services"))
            .query(&query)
            .send()
            .await?;
        Self::handle(response).await
    }

    /// Fetch and validate a service's protocol document.
    ///
    /// A document whose permissions reference missing endpoints fails here,
    /// at load time, with [`ClientError::Protocol`].
    pub async fn get_protocol(&self, service_id: &str) -> Result<Protocol, ClientError> {
        let response = self
            .client
            .get(self.url(&format!("/services/{service_id}/protocol")))
            .send()
            .await?;
        let value: serde_json::Value = Self::handle(response).await?;
        Ok(Protocol::from_value(value)?)
    }

    /// Create a consumer token on the user's behalf.
    pub async fn create_consumer_token(
        &self,
        request: &TokenRequest,
    ) -> Result<AuthGrant, ClientError> {
        let response = self
            .client
            .post(self.url("/consumer-tokens"))
            .json(request)
            .send()
            .await?;
        Self::handle(response).await
    }

    /// Execute a service endpoint with a consumer token.
    pub async fn execute(
        &self,
        service_id: &str,
        consumer_token: &str,
        input: serde_json::Value,
    ) -> Result<ExecuteOutcome, ClientError> {
        let response = self
            .client
            .post(self.url(&format!("/services/{service_id}/execute")))
            .json(&serde_json::json!({
                "consumer_token": consumer_token,
                "input": input,
            }))
            .send()
            .await?;
        Self::handle(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_stripped() {
        let client = A2eClient::new("http://localhost:8080/");
        assert_eq!(
            client.url("/discovery"),
            "http://localhost:8080/api/v1/open/discovery"
        );
    }

    #[test]
    fn test_search_params_defaults() {
        let params = SearchParams::keyword("奶茶");
        assert_eq!(params.page, 1);
        assert_eq!(params.size, 10);
        assert!(params.service_type.is_none());
    }
}
