//! Session orchestration
//!
//! Sequences the five protocol phases — discover, search, protocol, auth,
//! execute — as an explicit series of typed phase results rather than
//! scripted control flow. Partial failures stay representable: a failed
//! discovery is recorded and the session proceeds; an empty search ends
//! the session normally; protocol and (outside demo mode) auth failures
//! abort it.

use crate::client::{A2eClient, SearchParams, TokenRequest};
use crate::error::ClientError;
use a2e_core::{ExecuteOutcome, Service};

/// How a session should run.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Search keyword for the service to use.
    pub keyword: String,
    /// Optional exact service-type filter.
    pub service_type: Option<String>,
    /// User the agent acts for.
    pub user_phone: String,
    pub user_nickname: String,
    /// Agent identity reported at token creation.
    pub agent_name: String,
    pub agent_platform: String,
    /// Input payload for the execute phase.
    pub input: serde_json::Value,
    /// Proceed with a placeholder credential if auth fails.
    ///
    /// Demonstration contexts only; production integrations must leave
    /// this off so an auth failure aborts the session.
    pub allow_placeholder_token: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            keyword: String::new(),
            service_type: None,
            user_phone: "13800138000".to_string(),
            user_nickname: "Demo User".to_string(),
            agent_name: "a2e-agent".to_string(),
            agent_platform: "a2e".to_string(),
            input: serde_json::json!({"action": "get_menu"}),
            allow_placeholder_token: false,
        }
    }
}

/// One completed phase, with what it established.
#[derive(Debug)]
pub enum PhaseOutcome {
    /// Discovery succeeded.
    Discovered { platform: String, version: String },
    /// Discovery failed; the session proceeds regardless.
    DiscoverySkipped { reason: String },
    /// Search matched; the first result is selected.
    ServicesFound { total: usize, selected: Service },
    /// Search matched nothing; the session ends normally.
    NoServices,
    /// Protocol document fetched and validated.
    ProtocolLoaded { endpoints: usize, payment_endpoints: usize },
    /// Consumer token obtained.
    Authenticated { expires_in: i64 },
    /// Auth failed but demo mode substituted a placeholder credential.
    PlaceholderToken { reason: String },
    /// The target endpoint was invoked.
    Executed { status: String },
}

/// How the session ended.
#[derive(Debug)]
pub enum SessionOutcome {
    /// Execution completed; the typed result is attached.
    Completed(ExecuteOutcome),
    /// Nothing matched the search; nothing to execute.
    NoServices,
    /// A fatal phase failure ended the session.
    Aborted(ClientError),
}

/// The full trace of a session: every phase plus the terminal outcome.
#[derive(Debug)]
pub struct SessionReport {
    pub phases: Vec<PhaseOutcome>,
    pub outcome: SessionOutcome,
}

/// Drives a full A2E session against one platform.
pub struct Orchestrator {
    client: A2eClient,
    config: SessionConfig,
}

impl Orchestrator {
    pub fn new(client: A2eClient, config: SessionConfig) -> Self {
        Self { client, config }
    }

    /// Run the five phases, collecting a typed report.
    pub async fn run(&self) -> SessionReport {
        let mut phases = Vec::new();

        // Phase 1: discovery. Non-fatal by contract.
        match self.client.discovery().await {
            Ok(summary) => {
                tracing::info!(platform = %summary.platform.name, "platform discovered");
                phases.push(PhaseOutcome::Discovered {
                    platform: summary.platform.name,
                    version: summary.platform.version,
                });
            }
            Err(err) => {
                tracing::warn!(error = %err, "discovery failed, continuing");
                phases.push(PhaseOutcome::DiscoverySkipped {
                    reason: err.to_string(),
                });
            }
        }

        // Phase 2: search. Empty result ends the session normally.
        let mut params = SearchParams::keyword(&self.config.keyword);
        params.service_type = self.config.service_type.clone();
        let page = match self.client.search_services(&params).await {
            Ok(page) => page,
            Err(err) => return abort(phases, err),
        };
        let Some(service) = page.list.first().cloned() else {
            tracing::info!(keyword = %self.config.keyword, "no services matched");
            phases.push(PhaseOutcome::NoServices);
            return SessionReport {
                phases,
                outcome: SessionOutcome::NoServices,
            };
        };
        tracing::info!(service = %service.name, total = page.total, "service selected");
        phases.push(PhaseOutcome::ServicesFound {
            total: page.total,
            selected: service.clone(),
        });

        // Phase 3: protocol. Fatal on failure.
        let protocol = match self.client.get_protocol(&service.id).await {
            Ok(protocol) => protocol,
            Err(err) => return abort(phases, err),
        };
        phases.push(PhaseOutcome::ProtocolLoaded {
            endpoints: protocol.endpoints.len(),
            payment_endpoints: protocol
                .endpoints
                .iter()
                .filter(|e| e.requires_payment)
                .count(),
        });

        // Phase 4: authentication. Fatal unless demo mode substitutes a
        // placeholder credential.
        let token_request = TokenRequest {
            phone: self.config.user_phone.clone(),
            nickname: self.config.user_nickname.clone(),
            agent_name: self.config.agent_name.clone(),
            agent_platform: self.config.agent_platform.clone(),
        };
        let token = match self.client.create_consumer_token(&token_request).await {
            Ok(grant) => {
                phases.push(PhaseOutcome::Authenticated {
                    expires_in: grant.expires_in,
                });
                grant.consumer_token
            }
            Err(err) if self.config.allow_placeholder_token => {
                tracing::warn!(error = %err, "auth failed, using placeholder token");
                phases.push(PhaseOutcome::PlaceholderToken {
                    reason: err.to_string(),
                });
                "token_demo_placeholder".to_string()
            }
            Err(err) => return abort(phases, err),
        };

        // Phase 5: execution.
        match self
            .client
            .execute(&service.id, &token, self.config.input.clone())
            .await
        {
            Ok(outcome) => {
                tracing::info!(status = %outcome.status, "execution finished");
                phases.push(PhaseOutcome::Executed {
                    status: outcome.status.clone(),
                });
                SessionReport {
                    phases,
                    outcome: SessionOutcome::Completed(outcome),
                }
            }
            Err(err) => abort(phases, err),
        }
    }
}

fn abort(phases: Vec<PhaseOutcome>, err: ClientError) -> SessionReport {
    tracing::error!(error = %err, "session aborted");
    SessionReport {
        phases,
        outcome: SessionOutcome::Aborted(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_production_safe() {
        let config = SessionConfig::default();
        assert!(!config.allow_placeholder_token);
        assert_eq!(config.input["action"], "get_menu");
    }
}
