//! Provider error taxonomy
//!
//! Every variant maps to a stable wire code that crosses the transport
//! verbatim, plus an optional remediation hint. HTTP status mapping lives
//! in the API layer; nothing here knows about transports.

use a2e_core::Money;

/// Provider-side errors with stable wire codes.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProviderError {
    /// Request arrived outside the provider's operating window.
    #[error("shop is closed; open hours are {open_hour}:00-{close_hour}:00")]
    ServiceUnavailable { open_hour: u32, close_hour: u32 },

    /// A line item referenced a product absent from the catalog.
    #[error("product {0} does not exist")]
    UnknownProduct(i64),

    /// A selected option value is not permitted for the product.
    #[error("product '{product}' does not support {option}={value}")]
    IncompatibleOption {
        product: String,
        option: String,
        value: String,
    },

    /// A line item asked for zero units.
    #[error("quantity must be at least 1 for product {0}")]
    InvalidQuantity(i64),

    /// The order total is below the provider's minimum.
    #[error("order total {total} is below the {minimum} minimum")]
    BelowMinimum { total: Money, minimum: Money },

    /// The consumer token is empty, malformed, unknown, or expired.
    #[error("invalid consumer token")]
    InvalidToken,

    /// No order with that number exists.
    #[error("order {0} not found")]
    OrderNotFound(String),

    /// The order exists but belongs to a different user.
    #[error("no access to this order")]
    AccessDenied,

    /// The requested status change is not a legal transition.
    #[error("cannot move order from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    /// The order ledger failed.
    #[error("order store error: {0}")]
    Store(String),
}

impl ProviderError {
    /// Stable wire code, preserved verbatim to the caller.
    pub fn code(&self) -> &'static str {
        match self {
            ProviderError::ServiceUnavailable { .. } => "SHOP_CLOSED",
            ProviderError::UnknownProduct(_) => "INVALID_PRODUCT",
            ProviderError::IncompatibleOption { .. } => "INVALID_OPTIONS",
            ProviderError::InvalidQuantity(_) => "INVALID_QUANTITY",
            ProviderError::BelowMinimum { .. } => "MIN_AMOUNT_NOT_MET",
            ProviderError::InvalidToken => "INVALID_TOKEN",
            ProviderError::OrderNotFound(_) => "ORDER_NOT_FOUND",
            ProviderError::AccessDenied => "ACCESS_DENIED",
            ProviderError::InvalidTransition { .. } => "INVALID_TRANSITION",
            ProviderError::Store(_) => "STORE_ERROR",
        }
    }

    /// Remediation hint for the calling agent, when one exists.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            ProviderError::ServiceUnavailable { .. } => {
                Some("retry during the advertised open hours")
            }
            ProviderError::UnknownProduct(_) => Some("refresh the menu and use a listed product id"),
            ProviderError::IncompatibleOption { .. } => {
                Some("choose an option value from the product's options schema")
            }
            ProviderError::BelowMinimum { .. } => Some("add items to reach the minimum order"),
            ProviderError::InvalidToken => Some("obtain a fresh consumer token from the platform"),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_stable() {
        assert_eq!(ProviderError::InvalidToken.code(), "INVALID_TOKEN");
        assert_eq!(
            ProviderError::BelowMinimum {
                total: Money::from_major(8),
                minimum: Money::from_major(10),
            }
            .code(),
            "MIN_AMOUNT_NOT_MET"
        );
    }

    #[test]
    fn test_messages_carry_detail() {
        let err = ProviderError::IncompatibleOption {
            product: "招牌奶茶".into(),
            option: "sugar".into(),
            value: "微糖".into(),
        };
        assert!(err.to_string().contains("sugar=微糖"));
    }
}
