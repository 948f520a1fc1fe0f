//! Full agent session against an in-process platform server.

use std::collections::BTreeMap;
use std::sync::Arc;

use a2e_api::{routes::api_router, state::ServiceEntry, AppState};
use a2e_client::{A2eClient, Orchestrator, PhaseOutcome, SessionConfig, SessionOutcome};
use a2e_core::{Endpoint, Money, Protocol, Service, ServiceInfo};
use a2e_provider::{Catalog, MemoryOrderStore, OrderPolicy, OrderStore, Product, TokenIssuer};

fn demo_state() -> AppState {
    let catalog = Catalog::new(vec![Product {
        id: 1,
        name: "招牌奶茶".into(),
        price: Money::from_major(12),
        description: "经典招牌".into(),
        category: "招牌系列".into(),
        options: BTreeMap::from([(
            "sugar".to_string(),
            vec!["全糖".to_string(), "半糖".to_string()],
        )]),
    }]);

    let protocol = Protocol::new(ServiceInfo {
        id: "demo_tea_shop".into(),
        name: "示例奶茶店".into(),
        service_type: "food_delivery".into(),
        provider: None,
    })
    .with_endpoint(Endpoint::new("get_menu", "/api/menu", "GET"))
    .with_endpoint(Endpoint::new("create_order", "/api/orders", "POST").with_payment());

    let service = Service {
        id: "demo_tea_shop".into(),
        name: "示例奶茶店".into(),
        service_type: "food_delivery".into(),
        description: "奶茶、果茶外送".into(),
        tags: vec!["奶茶".into()],
        certification_level: 2,
        provider: None,
    };

    AppState::new(
        catalog,
        OrderPolicy {
            open_hour: 0,
            close_hour: 24,
            ..OrderPolicy::default()
        },
        Arc::new(MemoryOrderStore::new()) as Arc<dyn OrderStore>,
        TokenIssuer::default(),
        vec![ServiceEntry { service, protocol }],
    )
}

async fn spawn_server() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let router = api_router(demo_state());
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn full_session_reaches_execution() {
    let base_url = spawn_server().await;
    let client = A2eClient::new(base_url);

    let config = SessionConfig {
        keyword: "奶茶".to_string(),
        ..SessionConfig::default()
    };
    let report = Orchestrator::new(client, config).run().await;

    let SessionOutcome::Completed(outcome) = report.outcome else {
        panic!("expected completed session, got {:?}", report.outcome);
    };
    assert_eq!(outcome.status, "completed");
    assert!(outcome.error.is_none());
    assert_eq!(outcome.output["total_count"], 1);

    // Every phase actually ran.
    assert!(report
        .phases
        .iter()
        .any(|p| matches!(p, PhaseOutcome::Discovered { .. })));
    assert!(report
        .phases
        .iter()
        .any(|p| matches!(p, PhaseOutcome::Authenticated { .. })));
}

#[tokio::test]
async fn empty_search_ends_session_normally() {
    let base_url = spawn_server().await;
    let client = A2eClient::new(base_url);

    let config = SessionConfig {
        keyword: "pizza".to_string(),
        ..SessionConfig::default()
    };
    let report = Orchestrator::new(client, config).run().await;

    assert!(matches!(report.outcome, SessionOutcome::NoServices));
    assert!(report
        .phases
        .iter()
        .any(|p| matches!(p, PhaseOutcome::NoServices)));
}

#[tokio::test]
async fn create_order_session_persists_and_secures_the_order() {
    let base_url = spawn_server().await;
    let client = A2eClient::new(base_url.clone());

    let config = SessionConfig {
        keyword: "奶茶".to_string(),
        input: serde_json::json!({
            "action": "create_order",
            "items": [{"product_id": 1, "quantity": 2, "options": {"sugar": "半糖"}}],
            "address": "北京市朝阳区1号",
            "phone": "13800138000"
        }),
        ..SessionConfig::default()
    };
    let report = Orchestrator::new(client.clone(), config).run().await;

    let SessionOutcome::Completed(outcome) = report.outcome else {
        panic!("expected completed session, got {:?}", report.outcome);
    };
    assert!(outcome.error.is_none());
    assert_eq!(outcome.output["status"], "pending_payment");
    assert_eq!(outcome.output["total_amount"], 24.0);
    let order_no = outcome.output["order_no"].as_str().unwrap().to_string();

    // A different user's status query is denied, with the code verbatim.
    let grant = client
        .create_consumer_token(&a2e_client::TokenRequest {
            phone: "13900000000".to_string(),
            nickname: "李四".to_string(),
            agent_name: "other-agent".to_string(),
            agent_platform: "a2e".to_string(),
        })
        .await
        .unwrap();
    let status = client
        .execute(
            "demo_tea_shop",
            &grant.consumer_token,
            serde_json::json!({"action": "get_order_status", "order_no": order_no}),
        )
        .await
        .unwrap();
    assert_eq!(status.status, "failed");
    assert_eq!(status.error.unwrap().code, "ACCESS_DENIED");
}

#[tokio::test]
async fn dangling_protocol_reference_fails_at_load() {
    // A provider publishing a permission against a missing endpoint is
    // caught by the client at fetch time, not when the endpoint is used.
    let protocol_json = serde_json::json!({
        "version": "1.0.0",
        "endpoints": [{"name": "get_menu", "path": "/api/menu", "method": "GET"}],
        "permissions": {
            "required": [{"name": "user_phone", "endpoint": "create_order"}]
        }
    });
    let err = Protocol::from_value(protocol_json).unwrap_err();
    assert!(matches!(err, a2e_core::ProtocolError::Malformed(_)));
}
