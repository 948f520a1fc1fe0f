//! Provider order policy
//!
//! The tunables the validation and execution engines read: operating
//! window, minimum order amount, and the preparation offset used to
//! estimate delivery.

use a2e_core::Money;
use serde::{Deserialize, Serialize};

/// Business-rule configuration for order handling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderPolicy {
    /// First hour of day (inclusive) the shop accepts orders.
    pub open_hour: u32,
    /// Hour of day (exclusive) the shop stops accepting orders.
    pub close_hour: u32,
    /// Minimum order total for delivery.
    pub minimum_order: Money,
    /// Preparation offset added to creation time for `estimated_time`.
    pub prep_minutes: i64,
}

impl Default for OrderPolicy {
    fn default() -> Self {
        Self {
            open_hour: 9,
            close_hour: 21,
            minimum_order: Money::from_major(10),
            prep_minutes: 30,
        }
    }
}

impl OrderPolicy {
    /// Whether the given hour of day falls within the open window.
    pub fn is_open_at(&self, hour: u32) -> bool {
        hour >= self.open_hour && hour < self.close_hour
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_window() {
        let policy = OrderPolicy::default();
        assert!(policy.is_open_at(9));
        assert!(policy.is_open_at(20));
        assert!(!policy.is_open_at(21));
        assert!(!policy.is_open_at(8));
    }

    #[test]
    fn test_deserialize() {
        let policy: OrderPolicy = serde_json::from_str(
            r#"{"open_hour":8,"close_hour":22,"minimum_order":15.0,"prep_minutes":20}"#,
        )
        .unwrap();
        assert_eq!(policy.minimum_order, Money::from_major(15));
        assert!(policy.is_open_at(21));
    }
}
