//! End-to-end provider pipeline: token verification, validation, execution.

use std::collections::BTreeMap;

use a2e_core::{Money, UserIdentity};
use a2e_provider::{
    validate, Catalog, ExecutionEngine, MemoryOrderStore, OrderItem, OrderPolicy, OrderRequest,
    OrderStatus, Product, ProviderError, StaticVerifier, TokenVerifier,
};
use chrono::{TimeZone, Utc};

fn tea_catalog() -> Catalog {
    Catalog::new(vec![
        Product {
            id: 1,
            name: "招牌奶茶".into(),
            price: Money::from_major(12),
            description: "经典招牌，香浓醇厚".into(),
            category: "招牌系列".into(),
            options: BTreeMap::from([
                (
                    "sugar".to_string(),
                    vec!["全糖".to_string(), "半糖".to_string()],
                ),
                (
                    "ice".to_string(),
                    vec!["正常冰".to_string(), "少冰".to_string()],
                ),
            ]),
        },
        Product {
            id: 2,
            name: "柠檬水".into(),
            price: Money::from_major(8),
            description: "现榨柠檬".into(),
            category: "鲜果系列".into(),
            options: BTreeMap::new(),
        },
    ])
}

fn open_hours() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
}

fn request_for(product_id: i64, options: BTreeMap<String, String>) -> OrderRequest {
    OrderRequest {
        items: vec![OrderItem {
            product_id,
            quantity: 1,
            options,
        }],
        address: "北京市朝阳区1号".into(),
        phone: "13800138000".into(),
        note: None,
    }
}

fn identity() -> UserIdentity {
    UserIdentity {
        user_id: "user_12345".into(),
        nickname: "张三".into(),
    }
}

/// Scenario A: compatible options during open hours create a pending order
/// with an exact total.
#[tokio::test]
async fn valid_order_executes_with_exact_total() {
    let verifier = StaticVerifier::default();
    let who = verifier.verify("token_demo").await.unwrap();

    let req = request_for(1, BTreeMap::from([("sugar".to_string(), "半糖".to_string())]));
    let validated = validate(&req, &tea_catalog(), &OrderPolicy::default(), open_hours()).unwrap();
    assert_eq!(validated.total_amount, Money::from_major(12));

    let engine = ExecutionEngine::new(MemoryOrderStore::new(), OrderPolicy::default());
    let order = engine.create(validated, &who).await.unwrap();
    assert_eq!(order.status, OrderStatus::PendingPayment);
    assert_eq!(order.total_amount, Money::from_major(12));
}

/// Scenario B: an option value outside the product's permitted set fails.
#[test]
fn disallowed_sugar_level_is_incompatible() {
    let req = request_for(1, BTreeMap::from([("sugar".to_string(), "微糖".to_string())]));
    let err =
        validate(&req, &tea_catalog(), &OrderPolicy::default(), open_hours()).unwrap_err();
    assert_eq!(err.code(), "INVALID_OPTIONS");
}

/// Scenario C: a total below the delivery minimum fails with both amounts.
#[test]
fn below_minimum_reports_total_and_threshold() {
    let req = request_for(2, BTreeMap::new());
    let err =
        validate(&req, &tea_catalog(), &OrderPolicy::default(), open_hours()).unwrap_err();
    assert_eq!(
        err,
        ProviderError::BelowMinimum {
            total: Money::from_major(8),
            minimum: Money::from_major(10),
        }
    );
}

/// Scenario D: the creator sees the order; anyone else is denied, and no
/// partial identity or order detail leaks through the denial.
#[tokio::test]
async fn ownership_is_enforced_on_status_queries() {
    let req = request_for(1, BTreeMap::new());
    let validated = validate(&req, &tea_catalog(), &OrderPolicy::default(), open_hours()).unwrap();

    let engine = ExecutionEngine::new(MemoryOrderStore::new(), OrderPolicy::default());
    let order = engine.create(validated, &identity()).await.unwrap();

    let mine = engine.get_status(&order.order_no, &identity()).await.unwrap();
    assert_eq!(mine.status, OrderStatus::PendingPayment);

    let other = UserIdentity {
        user_id: "user_67890".into(),
        nickname: "李四".into(),
    };
    let err = engine.get_status(&order.order_no, &other).await.unwrap_err();
    assert_eq!(err, ProviderError::AccessDenied);
}

/// Validation failures never persist anything.
#[tokio::test]
async fn no_partial_order_on_validation_failure() {
    let store = MemoryOrderStore::new();
    let req = request_for(2, BTreeMap::new());
    assert!(validate(&req, &tea_catalog(), &OrderPolicy::default(), open_hours()).is_err());

    // Ledger untouched: a fresh engine over the same store finds nothing.
    let engine = ExecutionEngine::new(store, OrderPolicy::default());
    let err = engine
        .get_status("A2E20250601120000ABCDEF", &identity())
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::OrderNotFound(_)));
}
