//! Provider service surface
//!
//! The endpoints the protocol document describes: menu, order creation,
//! order status, the document itself, and a health probe. Protected
//! endpoints read the consumer token from the `X-Consumer-Token` header.

use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    routing::{get, post},
    Json, Router,
};
use chrono::{Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};
use crate::platform;
use crate::state::AppState;
use a2e_core::{Money, Protocol};
use a2e_provider::{validate, OrderRequest, ProviderError, TokenVerifier};

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub shop_open: bool,
    pub timestamp: chrono::DateTime<Utc>,
}

/// One menu category with its products.
#[derive(Debug, Serialize)]
pub struct MenuCategory {
    pub name: String,
    pub items: Vec<serde_json::Value>,
}

/// Categorized menu.
#[derive(Debug, Serialize)]
pub struct MenuResponse {
    pub categories: Vec<MenuCategory>,
    pub total_count: usize,
}

#[derive(Debug, Deserialize)]
pub struct MenuQuery {
    pub category: Option<String>,
}

/// Order summary returned by creation and status queries.
#[derive(Debug, Serialize)]
pub struct OrderResponse {
    pub order_no: String,
    pub total_amount: Money,
    pub status: String,
    pub status_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_time: Option<String>,
}

/// Read the consumer token header, treating absence as an invalid token.
fn consumer_token(headers: &HeaderMap) -> ApiResult<&str> {
    headers
        .get("x-consumer-token")
        .and_then(|v| v.to_str().ok())
        .ok_or(ApiError::Provider(ProviderError::InvalidToken))
}

fn payment_url(order_no: &str, total: Money) -> String {
    format!(
        "https://pay.a2e-platform.com/pay?order={}&amount={}.{:02}",
        order_no,
        total.cents() / 100,
        total.cents() % 100
    )
}

/// Basic health probe with the current open/closed state.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        shop_open: state.policy().is_open_at(Utc::now().hour()),
        timestamp: Utc::now(),
    })
}

/// Build the categorized menu view, optionally filtered by category.
pub(crate) fn build_menu(catalog: &a2e_provider::Catalog, category: Option<&str>) -> MenuResponse {
    let mut categories = Vec::new();
    let mut total_count = 0;

    for (name, products) in catalog.categories() {
        if category.is_some_and(|wanted| wanted != name) {
            continue;
        }
        total_count += products.len();
        let items = products
            .iter()
            .filter_map(|p| serde_json::to_value(p).ok())
            .collect();
        categories.push(MenuCategory { name, items });
    }

    MenuResponse {
        categories,
        total_count,
    }
}

/// Fetch the menu, optionally filtered by category.
pub async fn get_menu(
    State(state): State<AppState>,
    Query(query): Query<MenuQuery>,
) -> Json<MenuResponse> {
    Json(build_menu(state.catalog(), query.category.as_deref()))
}

/// Create an order: verify the token, run validation, execute.
pub async fn create_order(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<OrderRequest>,
) -> ApiResult<Json<OrderResponse>> {
    let token = consumer_token(&headers)?;
    let identity = state.issuer().verify(token).await?;

    let validated = validate(&request, state.catalog(), state.policy(), Utc::now())?;
    let order = state.engine().create(validated, &identity).await?;

    Ok(Json(OrderResponse {
        payment_url: Some(payment_url(&order.order_no, order.total_amount)),
        estimated_time: Some(format!("预计 {} 送达", order.estimated_time.format("%H:%M"))),
        total_amount: order.total_amount,
        status: order.status.to_string(),
        status_text: order.status.status_text().to_string(),
        order_no: order.order_no,
    }))
}

/// Ownership-checked order status query.
pub async fn get_order_status(
    State(state): State<AppState>,
    Path(order_no): Path<String>,
    headers: HeaderMap,
) -> ApiResult<Json<OrderResponse>> {
    let token = consumer_token(&headers)?;
    let identity = state.issuer().verify(token).await?;

    let order = state.engine().get_status(&order_no, &identity).await?;

    Ok(Json(OrderResponse {
        payment_url: None,
        estimated_time: Some(order.estimated_time.format("%H:%M").to_string()),
        total_amount: order.total_amount,
        status: order.status.to_string(),
        status_text: order.status.status_text().to_string(),
        order_no: order.order_no,
    }))
}

/// Serve this provider's protocol document.
pub async fn get_protocol(State(state): State<AppState>) -> ApiResult<Json<Protocol>> {
    state
        .own_protocol()
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::ServiceNotFound("no published service".to_string()))
}

/// Provider service router.
pub fn service_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/menu", get(get_menu))
        .route("/api/orders", post(create_order))
        .route("/api/orders/{order_no}", get(get_order_status))
        .route("/api/a2e/protocol", get(get_protocol))
        .with_state(state)
}

/// Full router: provider surface plus the platform open API.
pub fn api_router(state: AppState) -> Router {
    service_router(state.clone()).merge(platform::platform_router(state))
}
