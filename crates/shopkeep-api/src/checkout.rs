//! # Checkout Orchestration
//!
//! Turns a cart plus customer details into a recorded sale.
//!
//! ## Checkout Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Checkout Pipeline                                │
//! │                                                                         │
//! │  checkout(cart, customer, email, discount)                              │
//! │     │                                                                   │
//! │     ├── cart empty? ─────────────► Err(EmptyCart)      (no request)     │
//! │     ├── name invalid? ───────────► Err(Invalid)        (no request)     │
//! │     ├── email invalid? ──────────► Err(Invalid)        (no request)     │
//! │     │                                                                   │
//! │     └── POST sales/create ───┬── Ok  ──► cart.clear(), Ok(receipt)      │
//! │                              └── Err ──► cart UNTOUCHED, Err(Api)       │
//! │                                                                         │
//! │  The cart is only cleared after the server confirms the sale, so a     │
//! │  network failure never loses an in-progress sale.                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tracing::info;

use shopkeep_core::cart::{Cart, CartTotals};
use shopkeep_core::money::DiscountRate;
use shopkeep_core::types::NewSale;
use shopkeep_core::validation::{validate_customer_name, validate_email};

use crate::client::ApiClient;
use crate::error::CheckoutError;

/// What the clerk sees after a confirmed sale.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutReceipt {
    /// Pricing at the moment the sale was recorded.
    pub totals: CartTotals,

    /// Number of distinct products sold.
    pub line_count: usize,

    /// Total units across all lines.
    pub unit_count: i64,
}

/// Validates the sale locally, records it on the backend, and clears the
/// cart once the server confirms.
///
/// Validation failures and an empty cart are rejected before any network
/// traffic. On an API failure the cart is left as-is so the sale can be
/// retried.
pub async fn checkout(
    api: &ApiClient,
    cart: &mut Cart,
    customer: &str,
    customer_email: &str,
    discount: DiscountRate,
) -> Result<CheckoutReceipt, CheckoutError> {
    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }
    validate_customer_name(customer)?;
    validate_email(customer_email)?;

    let totals = cart.totals(discount);
    let sale = NewSale {
        customer: customer.trim().to_string(),
        customer_email: customer_email.trim().to_string(),
        discount: discount.percentage(),
        products: cart.to_sale_lines(),
    };

    api.create_sale(&sale).await?;

    let receipt = CheckoutReceipt {
        totals,
        line_count: cart.item_count(),
        unit_count: cart.total_quantity(),
    };

    // Server confirmed; only now does the cart reset for the next sale.
    cart.clear();

    info!(
        lines = receipt.line_count,
        units = receipt.unit_count,
        total = %receipt.totals.total,
        "sale recorded"
    );

    Ok(receipt)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use shopkeep_core::money::Money;
    use shopkeep_core::types::Product;
    use shopkeep_session::HttpClient;

    fn api() -> ApiClient {
        // Points at a routable-but-unused base; rejection paths below never
        // reach the network.
        ApiClient::new(HttpClient::new(), "http://localhost:4000/api").unwrap()
    }

    fn cart_with_one_item() -> Cart {
        let mut cart = Cart::new();
        cart.add_item(&Product {
            id: "p1".to_string(),
            name: "Coffee".to_string(),
            price: Money::from_cents(350),
            inventory: 10,
        })
        .unwrap();
        cart
    }

    #[tokio::test]
    async fn test_empty_cart_rejected_before_network() {
        let mut cart = Cart::new();
        let result = checkout(
            &api(),
            &mut cart,
            "Bob",
            "bob@example.com",
            DiscountRate::zero(),
        )
        .await;

        assert!(matches!(result, Err(CheckoutError::EmptyCart)));
    }

    #[tokio::test]
    async fn test_blank_customer_rejected_and_cart_kept() {
        let mut cart = cart_with_one_item();
        let result = checkout(
            &api(),
            &mut cart,
            "   ",
            "bob@example.com",
            DiscountRate::zero(),
        )
        .await;

        assert!(matches!(result, Err(CheckoutError::Invalid(_))));
        assert_eq!(cart.item_count(), 1);
    }

    #[tokio::test]
    async fn test_bad_email_rejected_and_cart_kept() {
        let mut cart = cart_with_one_item();
        let result = checkout(
            &api(),
            &mut cart,
            "Bob",
            "not-an-email",
            DiscountRate::zero(),
        )
        .await;

        assert!(matches!(result, Err(CheckoutError::Invalid(_))));
        assert_eq!(cart.item_count(), 1);
    }
}
