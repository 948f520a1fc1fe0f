//! Order execution and the order ledger
//!
//! [`ExecutionEngine`] applies validated requests to provider state: it
//! generates a collision-resistant order number, persists the order with
//! its initial `PendingPayment` status, and answers ownership-checked
//! status queries. The ledger itself sits behind the [`OrderStore`] trait
//! so a real persistence backend can replace the in-memory map without
//! touching validation or execution logic.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use tokio::sync::RwLock;

use crate::config::OrderPolicy;
use crate::error::ProviderError;
use crate::validate::{PricedItem, ValidatedOrder};
use a2e_core::{Money, UserIdentity};

/// Order lifecycle status.
///
/// Creation sets `PendingPayment`; later transitions are applied by
/// provider-internal processes through [`OrderStatus::can_transition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    PendingPayment,
    Paid,
    Preparing,
    Delivering,
    Completed,
    Cancelled,
}

impl OrderStatus {
    /// Whether moving to `next` is a legal transition.
    pub fn can_transition(&self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, next),
            (PendingPayment, Paid)
                | (PendingPayment, Cancelled)
                | (Paid, Preparing)
                | (Preparing, Delivering)
                | (Delivering, Completed)
        )
    }

    /// Human-readable label shown to end users.
    pub fn status_text(&self) -> &'static str {
        match self {
            OrderStatus::PendingPayment => "待支付",
            OrderStatus::Paid => "已支付",
            OrderStatus::Preparing => "制作中",
            OrderStatus::Delivering => "配送中",
            OrderStatus::Completed => "已完成",
            OrderStatus::Cancelled => "已取消",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OrderStatus::PendingPayment => "pending_payment",
            OrderStatus::Paid => "paid",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Delivering => "delivering",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

/// A persisted execution record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    /// Globally unique, human-legible, time-ordered number.
    pub order_no: String,
    /// Owning user; status queries are checked against this.
    pub user_id: String,
    pub items: Vec<PricedItem>,
    pub total_amount: Money,
    pub address: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    /// Estimated delivery time: creation plus the preparation offset.
    pub estimated_time: DateTime<Utc>,
}

/// The order ledger, keyed by order number.
///
/// Writes must be atomic per key: `insert` fails rather than overwrite,
/// and a read never observes a partially-written order.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Insert a new order; fails if the key is already taken.
    async fn insert(&self, order: Order) -> Result<(), ProviderError>;

    /// Fetch an order by exact number.
    async fn get(&self, order_no: &str) -> Result<Option<Order>, ProviderError>;

    /// Apply a status change, enforcing the transition machine.
    async fn update_status(
        &self,
        order_no: &str,
        next: OrderStatus,
    ) -> Result<Order, ProviderError>;
}

#[async_trait]
impl<T: OrderStore + ?Sized> OrderStore for std::sync::Arc<T> {
    async fn insert(&self, order: Order) -> Result<(), ProviderError> {
        (**self).insert(order).await
    }

    async fn get(&self, order_no: &str) -> Result<Option<Order>, ProviderError> {
        (**self).get(order_no).await
    }

    async fn update_status(
        &self,
        order_no: &str,
        next: OrderStatus,
    ) -> Result<Order, ProviderError> {
        (**self).update_status(order_no, next).await
    }
}

/// In-memory ledger for tests, demos, and single-process deployments.
#[derive(Debug, Default)]
pub struct MemoryOrderStore {
    orders: RwLock<HashMap<String, Order>>,
}

impl MemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrderStore for MemoryOrderStore {
    async fn insert(&self, order: Order) -> Result<(), ProviderError> {
        let mut orders = self.orders.write().await;
        if orders.contains_key(&order.order_no) {
            return Err(ProviderError::Store(format!(
                "order {} already exists",
                order.order_no
            )));
        }
        orders.insert(order.order_no.clone(), order);
        Ok(())
    }

    async fn get(&self, order_no: &str) -> Result<Option<Order>, ProviderError> {
        Ok(self.orders.read().await.get(order_no).cloned())
    }

    async fn update_status(
        &self,
        order_no: &str,
        next: OrderStatus,
    ) -> Result<Order, ProviderError> {
        let mut orders = self.orders.write().await;
        let order = orders
            .get_mut(order_no)
            .ok_or_else(|| ProviderError::OrderNotFound(order_no.to_string()))?;
        if !order.status.can_transition(next) {
            return Err(ProviderError::InvalidTransition {
                from: order.status.to_string(),
                to: next.to_string(),
            });
        }
        order.status = next;
        Ok(order.clone())
    }
}

/// Generate an order number: `A2E` + timestamp + 24 bits of randomness.
///
/// Time-ordered for humans, with enough suffix entropy that concurrent
/// creations within one second do not collide at expected request rates.
fn generate_order_no(now: DateTime<Utc>) -> String {
    let suffix: [u8; 3] = rand::rng().random();
    format!(
        "A2E{}{}",
        now.format("%Y%m%d%H%M%S"),
        hex::encode_upper(suffix)
    )
}

/// Applies validated orders to the ledger.
pub struct ExecutionEngine<S: OrderStore> {
    store: S,
    policy: OrderPolicy,
}

impl<S: OrderStore> ExecutionEngine<S> {
    pub fn new(store: S, policy: OrderPolicy) -> Self {
        Self { store, policy }
    }

    /// The underlying ledger.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Create an order from a validated request.
    ///
    /// Regenerates the order number on the (unlikely) ledger collision;
    /// nothing is persisted until the insert succeeds.
    pub async fn create(
        &self,
        validated: ValidatedOrder,
        identity: &UserIdentity,
    ) -> Result<Order, ProviderError> {
        let now = Utc::now();

        for _ in 0..8 {
            let order = Order {
                order_no: generate_order_no(now),
                user_id: identity.user_id.clone(),
                items: validated.items.clone(),
                total_amount: validated.total_amount,
                address: validated.address.clone(),
                phone: validated.phone.clone(),
                note: validated.note.clone(),
                status: OrderStatus::PendingPayment,
                created_at: now,
                estimated_time: now + Duration::minutes(self.policy.prep_minutes),
            };
            match self.store.insert(order.clone()).await {
                Ok(()) => {
                    tracing::info!(
                        order_no = %order.order_no,
                        user_id = %identity.user_id,
                        "order created"
                    );
                    return Ok(order);
                }
                Err(ProviderError::Store(_)) => continue,
                Err(err) => return Err(err),
            }
        }
        Err(ProviderError::Store(
            "could not allocate a unique order number".to_string(),
        ))
    }

    /// Fetch an order's status, enforcing ownership.
    ///
    /// A missing order and a foreign order are reported with distinct
    /// codes, matching the protocol's taxonomy.
    pub async fn get_status(
        &self,
        order_no: &str,
        identity: &UserIdentity,
    ) -> Result<Order, ProviderError> {
        let order = self
            .store
            .get(order_no)
            .await?
            .ok_or_else(|| ProviderError::OrderNotFound(order_no.to_string()))?;
        if order.user_id != identity.user_id {
            return Err(ProviderError::AccessDenied);
        }
        Ok(order)
    }

    /// Apply the payment transition. Represents the platform's payment
    /// callback; any other transition request is rejected by the machine.
    pub async fn mark_paid(&self, order_no: &str) -> Result<Order, ProviderError> {
        self.store.update_status(order_no, OrderStatus::Paid).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn identity() -> UserIdentity {
        UserIdentity {
            user_id: "user_12345".into(),
            nickname: "张三".into(),
        }
    }

    fn validated() -> ValidatedOrder {
        ValidatedOrder {
            items: vec![PricedItem {
                product_id: 1,
                product_name: "招牌奶茶".into(),
                quantity: 1,
                options: BTreeMap::new(),
                unit_price: Money::from_major(12),
                total_price: Money::from_major(12),
            }],
            total_amount: Money::from_major(12),
            address: "北京市朝阳区1号".into(),
            phone: "13800138000".into(),
            note: None,
        }
    }

    fn engine() -> ExecutionEngine<MemoryOrderStore> {
        ExecutionEngine::new(MemoryOrderStore::new(), OrderPolicy::default())
    }

    #[tokio::test]
    async fn test_create_sets_initial_state() {
        let engine = engine();
        let order = engine.create(validated(), &identity()).await.unwrap();
        assert!(order.order_no.starts_with("A2E"));
        assert_eq!(order.status, OrderStatus::PendingPayment);
        assert_eq!(order.total_amount, Money::from_major(12));
        assert_eq!(
            order.estimated_time - order.created_at,
            Duration::minutes(30)
        );
    }

    #[tokio::test]
    async fn test_owner_can_read_status() {
        let engine = engine();
        let order = engine.create(validated(), &identity()).await.unwrap();
        let fetched = engine.get_status(&order.order_no, &identity()).await.unwrap();
        assert_eq!(fetched.status, OrderStatus::PendingPayment);
    }

    #[tokio::test]
    async fn test_foreign_user_denied_even_when_order_exists() {
        let engine = engine();
        let order = engine.create(validated(), &identity()).await.unwrap();
        let stranger = UserIdentity {
            user_id: "user_99999".into(),
            nickname: "李四".into(),
        };
        let err = engine.get_status(&order.order_no, &stranger).await.unwrap_err();
        assert_eq!(err, ProviderError::AccessDenied);
    }

    #[tokio::test]
    async fn test_missing_order_not_found() {
        let engine = engine();
        let err = engine
            .get_status("A2E20250101000000FFFFFF", &identity())
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::OrderNotFound(_)));
    }

    #[tokio::test]
    async fn test_payment_transition() {
        let engine = engine();
        let order = engine.create(validated(), &identity()).await.unwrap();
        let paid = engine.mark_paid(&order.order_no).await.unwrap();
        assert_eq!(paid.status, OrderStatus::Paid);

        // Paying twice is not a legal transition.
        let err = engine.mark_paid(&order.order_no).await.unwrap_err();
        assert!(matches!(err, ProviderError::InvalidTransition { .. }));
    }

    #[test]
    fn test_status_machine_edges() {
        use OrderStatus::*;
        assert!(PendingPayment.can_transition(Paid));
        assert!(PendingPayment.can_transition(Cancelled));
        assert!(Paid.can_transition(Preparing));
        assert!(Preparing.can_transition(Delivering));
        assert!(Delivering.can_transition(Completed));

        assert!(!Paid.can_transition(PendingPayment));
        assert!(!Cancelled.can_transition(Paid));
        assert!(!Completed.can_transition(Delivering));
        assert!(!PendingPayment.can_transition(Preparing));
    }

    #[tokio::test]
    async fn test_concurrent_creates_get_distinct_numbers() {
        let engine = std::sync::Arc::new(engine());
        let mut set = tokio::task::JoinSet::new();
        for _ in 0..64 {
            let engine = engine.clone();
            set.spawn(async move { engine.create(validated(), &identity()).await.unwrap() });
        }
        let mut numbers = std::collections::HashSet::new();
        while let Some(order) = set.join_next().await {
            assert!(numbers.insert(order.unwrap().order_no));
        }
        assert_eq!(numbers.len(), 64);
    }
}
