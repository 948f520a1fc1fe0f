//! Demo provider: a tea shop publishing an A2E protocol document.
//!
//! Serves both the provider service API (menu, orders) and the platform
//! open API on one port so the agent demo can run a full session locally.

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use a2e_api::{state::ServiceEntry, AppState};
use a2e_core::{
    AuthInfo, AuthMethod, Endpoint, Money, Protocol, SemanticInfo, Service, ServiceInfo,
};
use a2e_provider::{Catalog, MemoryOrderStore, OrderPolicy, OrderStore, Product, TokenIssuer};

#[derive(Parser)]
#[command(about = "Run the demo tea-shop provider")]
struct Args {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:8000")]
    listen: SocketAddr,
}

fn product(
    id: i64,
    name: &str,
    price: i64,
    description: &str,
    category: &str,
    sugar: &[&str],
    ice: &[&str],
) -> Product {
    let mut options = BTreeMap::new();
    options.insert(
        "sugar".to_string(),
        sugar.iter().map(|s| s.to_string()).collect(),
    );
    options.insert(
        "ice".to_string(),
        ice.iter().map(|s| s.to_string()).collect(),
    );
    Product {
        id,
        name: name.to_string(),
        price: Money::from_major(price),
        description: description.to_string(),
        category: category.to_string(),
        options,
    }
}

const ALL_SUGAR: &[&str] = &["全糖", "七分糖", "半糖", "三分糖", "无糖"];
const ALL_ICE: &[&str] = &["正常冰", "少冰", "去冰", "热"];

fn tea_menu() -> Catalog {
    Catalog::new(vec![
        product(
            1,
            "招牌奶茶",
            12,
            "经典招牌，香浓醇厚，使用优质红茶配合鲜奶",
            "招牌系列",
            ALL_SUGAR,
            ALL_ICE,
        ),
        product(
            2,
            "芝士茉莉",
            18,
            "茉莉花茶配芝士奶盖，清香与浓郁的完美结合",
            "芝士系列",
            ALL_SUGAR,
            &["正常冰", "少冰", "去冰"],
        ),
        product(
            3,
            "杨枝甘露",
            22,
            "芒果、西柚、椰奶的热带风情",
            "鲜果系列",
            &["全糖", "半糖"],
            &["正常冰", "少冰"],
        ),
        product(
            4,
            "多肉葡萄",
            20,
            "新鲜葡萄果肉，酸甜可口",
            "鲜果系列",
            ALL_SUGAR,
            ALL_ICE,
        ),
    ])
}

fn tea_protocol() -> Protocol {
    Protocol::new(ServiceInfo {
        id: "demo_tea_shop".into(),
        name: "示例奶茶店".into(),
        service_type: "food_delivery".into(),
        provider: None,
    })
    .with_semantic(SemanticInfo {
        description: "示例奶茶店，提供各类奶茶、果茶".into(),
        keywords: vec!["奶茶".into(), "果茶".into(), "外卖".into()],
        capabilities: vec!["在线点餐".into(), "自定义口味".into(), "外卖配送".into()],
        constraints: vec!["营业时间 9:00-21:00".into(), "起送金额 ¥10.00".into()],
    })
    .with_auth(AuthInfo {
        required: true,
        methods: vec![AuthMethod {
            auth_type: "consumer_token".into(),
            description: "A2E 平台用户 Token".into(),
            endpoint: String::new(),
        }],
    })
    .with_endpoint(
        Endpoint::new("get_menu", "/api/menu", "GET").with_description("获取菜单"),
    )
    .with_endpoint(
        Endpoint::new("create_order", "/api/orders", "POST")
            .with_description("创建订单")
            .with_payment()
            .with_input_schema(serde_json::json!({
                "type": "object",
                "required": ["items", "address", "phone"],
                "properties": {
                    "items": {"type": "array"},
                    "address": {"type": "string"},
                    "phone": {"type": "string"},
                    "note": {"type": "string"}
                }
            })),
    )
    .with_endpoint(
        Endpoint::new("get_order_status", "/api/orders/{order_no}", "GET")
            .with_description("查询订单状态"),
    )
    .with_required_permission("user_phone", "配送联系电话", "create_order")
    .with_required_permission("user_address", "配送地址", "create_order")
    .with_error_code("SHOP_CLOSED", "店铺已打烊", "在营业时间内重试")
    .with_error_code("INVALID_PRODUCT", "商品不存在", "刷新菜单后重试")
    .with_error_code("INVALID_OPTIONS", "商品不支持该选项", "按菜单中的选项下单")
    .with_error_code("MIN_AMOUNT_NOT_MET", "未达到起送金额", "增加商品")
}

fn tea_service() -> Service {
    Service {
        id: "demo_tea_shop".into(),
        name: "示例奶茶店".into(),
        service_type: "food_delivery".into(),
        description: "示例奶茶店，提供各类奶茶、果茶".into(),
        tags: vec!["奶茶".into(), "外卖".into()],
        certification_level: 2,
        provider: None,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = Args::parse();

    let protocol = tea_protocol();
    protocol.validate()?;

    let state = AppState::new(
        tea_menu(),
        OrderPolicy::default(),
        Arc::new(MemoryOrderStore::new()) as Arc<dyn OrderStore>,
        TokenIssuer::default(),
        vec![ServiceEntry {
            service: tea_service(),
            protocol,
        }],
    );

    tracing::info!(listen = %args.listen, "starting demo tea-shop provider");
    a2e_api::serve(args.listen, state).await?;
    Ok(())
}
