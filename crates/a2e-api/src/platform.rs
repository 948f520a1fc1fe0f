//! Platform open API
//!
//! The surface agents call: discovery, keyword search with pagination,
//! protocol retrieval, consumer-token issuance, and endpoint execution.
//! Every response is wrapped in the `{code, message, data}` envelope;
//! platform-level failures use non-zero envelope codes, while business
//! rejections ride inside the execution outcome with their provider code
//! preserved verbatim.

use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::routes::build_menu;
use crate::state::AppState;
use a2e_core::{
    AuthGrant, Envelope, ExecuteFault, ExecuteOutcome, Protocol, SearchPage,
};
use a2e_provider::{validate, OrderRequest, ProviderError, TokenVerifier};

/// Envelope code for an unknown service id.
pub const CODE_SERVICE_NOT_FOUND: i64 = 1404;
/// Envelope code for an unusable request payload.
pub const CODE_BAD_REQUEST: i64 = 1400;

/// Platform capability summary served by discovery.
#[derive(Debug, Serialize)]
pub struct DiscoveryInfo {
    pub platform: PlatformInfo,
    pub endpoints: serde_json::Value,
}

#[derive(Debug, Serialize)]
pub struct PlatformInfo {
    pub name: String,
    pub version: String,
}

/// Search parameters: keyword plus optional type filter and pagination.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub keyword: String,
    #[serde(rename = "type")]
    pub service_type: Option<String>,
    #[serde(default = "default_page")]
    pub page: usize,
    #[serde(default = "default_size")]
    pub size: usize,
}

fn default_page() -> usize {
    1
}

fn default_size() -> usize {
    10
}

/// Consumer-token creation request.
#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    pub phone: String,
    pub nickname: String,
    #[serde(default)]
    pub agent_name: String,
    #[serde(default)]
    pub agent_platform: String,
}

/// Execution request: the delegated credential plus a structured input.
#[derive(Debug, Deserialize)]
pub struct ExecuteRequest {
    pub consumer_token: String,
    pub input: ExecuteInput,
}

/// Structured execution input: the endpoint to invoke plus its payload.
#[derive(Debug, Deserialize)]
pub struct ExecuteInput {
    pub action: String,
    #[serde(flatten)]
    pub params: serde_json::Value,
}

/// Platform discovery: name, version, and the open endpoint map.
pub async fn discovery() -> Json<Envelope<DiscoveryInfo>> {
    Json(Envelope::ok(DiscoveryInfo {
        platform: PlatformInfo {
            name: "A2E Platform".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        endpoints: serde_json::json!({
            "search": "/api/v1/open/services",
            "protocol": "/api/v1/open/services/{id}/protocol",
            "consumer_tokens": "/api/v1/open/consumer-tokens",
            "execute": "/api/v1/open/services/{id}/execute",
        }),
    }))
}

/// Keyword search over published services, paginated.
pub async fn search_services(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Json<Envelope<SearchPage>> {
    let size = query.size.clamp(1, 50);
    let page = query.page.max(1);

    let matches: Vec<_> = state
        .services()
        .iter()
        .map(|entry| &entry.service)
        .filter(|service| query.keyword.is_empty() || service.matches_keyword(&query.keyword))
        .filter(|service| {
            query
                .service_type
                .as_ref()
                .is_none_or(|t| &service.service_type == t)
        })
        .cloned()
        .collect();

    let total = matches.len();
    // page and size are caller input; the window math must not overflow.
    let list = matches
        .into_iter()
        .skip(page.saturating_sub(1).saturating_mul(size))
        .take(size)
        .collect();

    Json(Envelope::ok(SearchPage { total, list }))
}

/// Serve a service's protocol document.
pub async fn get_protocol(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<Envelope<Protocol>> {
    match state.service(&id) {
        Some(entry) => Json(Envelope::ok(entry.protocol.clone())),
        None => Json(Envelope::error(
            CODE_SERVICE_NOT_FOUND,
            format!("service '{id}' not found"),
        )),
    }
}

/// Issue a consumer token for a user acting through an agent.
pub async fn create_consumer_token(
    State(state): State<AppState>,
    Json(request): Json<TokenRequest>,
) -> Json<Envelope<AuthGrant>> {
    tracing::info!(
        agent = %request.agent_name,
        platform = %request.agent_platform,
        "issuing consumer token"
    );
    let grant = state.issuer().issue(&request.phone, &request.nickname).await;
    Json(Envelope::ok(grant))
}

/// Execute a service endpoint on the user's behalf.
///
/// Provider rejections come back as a `failed` outcome whose fault carries
/// the provider code verbatim; only platform-level problems (unknown
/// service, unusable input) use non-zero envelope codes.
pub async fn execute(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<ExecuteRequest>,
) -> Json<Envelope<ExecuteOutcome>> {
    if state.service(&id).is_none() {
        return Json(Envelope::error(
            CODE_SERVICE_NOT_FOUND,
            format!("service '{id}' not found"),
        ));
    }

    let execution_id = Uuid::new_v4().to_string();
    let outcome = match run_action(&state, &request).await {
        Ok(output) => ExecuteOutcome::completed(execution_id, output),
        Err(ExecError::BadInput(message)) => {
            return Json(Envelope::error(CODE_BAD_REQUEST, message));
        }
        Err(ExecError::Provider(err)) => {
            tracing::warn!(code = err.code(), error = %err, "execution rejected");
            ExecuteOutcome::failed(execution_id, fault_of(&err))
        }
    };
    Json(Envelope::ok(outcome))
}

/// Execution dispatch failure: a provider rejection, or input the
/// platform itself could not make sense of.
enum ExecError {
    Provider(ProviderError),
    BadInput(String),
}

impl From<ProviderError> for ExecError {
    fn from(err: ProviderError) -> Self {
        ExecError::Provider(err)
    }
}

fn fault_of(err: &ProviderError) -> ExecuteFault {
    ExecuteFault {
        code: err.code().to_string(),
        message: err.to_string(),
        suggestion: err.suggestion().unwrap_or_default().to_string(),
    }
}

/// Dispatch one action through the provider engine.
async fn run_action(
    state: &AppState,
    request: &ExecuteRequest,
) -> Result<serde_json::Value, ExecError> {
    let identity = state.issuer().verify(&request.consumer_token).await?;

    let output = match request.input.action.as_str() {
        "get_menu" => {
            let category = request
                .input
                .params
                .get("category")
                .and_then(|v| v.as_str());
            serde_json::to_value(build_menu(state.catalog(), category))
        }
        "create_order" => {
            let order_request: OrderRequest =
                serde_json::from_value(request.input.params.clone())
                    .map_err(|e| ExecError::BadInput(format!("bad order input: {e}")))?;
            let validated = validate(&order_request, state.catalog(), state.policy(), Utc::now())
                .map_err(ExecError::from)?;
            let order = state.engine().create(validated, &identity).await?;
            serde_json::to_value(order)
        }
        "get_order_status" => {
            let order_no = request
                .input
                .params
                .get("order_no")
                .and_then(|v| v.as_str())
                .ok_or_else(|| ExecError::BadInput("missing order_no".to_string()))?;
            let order = state.engine().get_status(order_no, &identity).await?;
            serde_json::to_value(order)
        }
        other => {
            return Err(ExecError::BadInput(format!("unknown action '{other}'")));
        }
    };
    output.map_err(|e| ExecError::BadInput(e.to_string()))
}

/// Platform open-API router.
pub fn platform_router(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/open/discovery", get(discovery))
        .route("/api/v1/open/services", get(search_services))
        .route("/api/v1/open/services/{id}/protocol", get(get_protocol))
        .route("/api/v1/open/consumer-tokens", post(create_consumer_token))
        .route("/api/v1/open/services/{id}/execute", post(execute))
        .with_state(state)
}
