//! # Cart Engine
//!
//! Maintains the working set of items for one sale and computes its pricing.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  UI Action                 Engine Call             Cart Change          │
//! │  ─────────                 ───────────             ───────────          │
//! │                                                                         │
//! │  Click Product ──────────► add_item() ───────────► qty += 1 or insert  │
//! │                                                                         │
//! │  Change Quantity ────────► set_quantity() ───────► qty = n (or remove) │
//! │                                                                         │
//! │  Click Remove ───────────► remove_item() ────────► item dropped        │
//! │                                                                         │
//! │  Checkout Success ───────► clear() ──────────────► items emptied       │
//! │                                                                         │
//! │  Render Totals ──────────► totals(rate) ─────────► (pure, read only)   │
//! │                                                                         │
//! │  Every rejection (StockExceeded, OutOfStock) leaves the cart exactly    │
//! │  as it was. There is no partial mutation.                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - Items are unique by `product_id` (adding the same product increments)
//! - For every line item: 1 ≤ quantity ≤ max_stock
//! - `max_stock` is the inventory snapshot taken when the item was added
//! - Insertion order is preserved (display order = order added)

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CartError, CartResult};
use crate::money::{DiscountRate, Money};
use crate::types::{Product, SaleLine};

// =============================================================================
// Line Item
// =============================================================================

/// One product entry in the cart with its quantity and stock ceiling.
///
/// ## Snapshot Pattern
/// `name`, `unit_price` and `max_stock` are frozen copies of the product
/// at the moment it was added. A catalog refresh mid-sale does not move
/// the price or the ceiling under an open cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Product ID (unique key within the cart).
    pub product_id: String,

    /// Product name at time of adding (frozen).
    pub name: String,

    /// Unit price at time of adding (frozen).
    pub unit_price: Money,

    /// Quantity in cart. Always 1 ≤ quantity ≤ max_stock.
    pub quantity: i64,

    /// Available inventory at time of adding (frozen).
    pub max_stock: i64,
}

impl LineItem {
    fn from_product(product: &Product) -> Self {
        LineItem {
            product_id: product.id.clone(),
            name: product.name.clone(),
            unit_price: product.price,
            quantity: 1,
            max_stock: product.inventory,
        }
    }

    /// Line total: unit price × quantity.
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The in-progress collection of products selected for a single sale.
///
/// One cart per sales session. No locking lives here; the engine is pure
/// state + math, and callers serialize access (see shopkeep-session for
/// the shared-state wrapper pattern).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart { items: Vec::new() }
    }

    /// Adds one unit of a product to the cart.
    ///
    /// ## Behavior
    /// - Product already in cart: increment its quantity by 1, rejecting
    ///   with `StockExceeded` if that would pass the stock snapshot.
    /// - New product: insert with quantity 1 and `max_stock` frozen from
    ///   `product.inventory`, rejecting with `OutOfStock` when inventory
    ///   is 0 (a line item never exists with quantity 0).
    ///
    /// On rejection the cart is unchanged.
    pub fn add_item(&mut self, product: &Product) -> CartResult<()> {
        if let Some(item) = self.items.iter_mut().find(|i| i.product_id == product.id) {
            let requested = item.quantity + 1;
            if requested > item.max_stock {
                return Err(CartError::StockExceeded {
                    product_id: item.product_id.clone(),
                    requested,
                    max_stock: item.max_stock,
                });
            }
            item.quantity = requested;
            return Ok(());
        }

        if product.inventory < 1 {
            return Err(CartError::OutOfStock {
                product_id: product.id.clone(),
                name: product.name.clone(),
            });
        }

        self.items.push(LineItem::from_product(product));
        Ok(())
    }

    /// Sets the quantity of an item exactly.
    ///
    /// ## Behavior
    /// - `quantity > max_stock`: rejected with `StockExceeded`, unchanged
    /// - `quantity < 1`: the item is removed entirely
    /// - Product not in cart: no-op
    pub fn set_quantity(&mut self, product_id: &str, quantity: i64) -> CartResult<()> {
        let Some(item) = self.items.iter_mut().find(|i| i.product_id == product_id) else {
            return Ok(());
        };

        if quantity > item.max_stock {
            return Err(CartError::StockExceeded {
                product_id: item.product_id.clone(),
                requested: quantity,
                max_stock: item.max_stock,
            });
        }

        if quantity < 1 {
            self.remove_item(product_id);
            return Ok(());
        }

        item.quantity = quantity;
        Ok(())
    }

    /// Removes an item from the cart by product ID.
    ///
    /// Absent products are a no-op, not an error.
    pub fn remove_item(&mut self, product_id: &str) {
        self.items.retain(|i| i.product_id != product_id);
    }

    /// Clears all items from the cart (after checkout or explicit reset).
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Computes pricing for the current cart contents.
    ///
    /// Pure function of cart + discount, recomputed on demand and never
    /// cached: identical inputs always yield identical totals.
    pub fn totals(&self, discount: DiscountRate) -> CartTotals {
        let subtotal = self
            .items
            .iter()
            .fold(Money::zero(), |acc, i| acc + i.line_total());
        let discount_amount = discount.amount_of(subtotal);

        CartTotals {
            subtotal,
            discount_amount,
            total: subtotal - discount_amount,
        }
    }

    /// The line items in insertion order.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the number of unique products in the cart.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Returns the total quantity across all items.
    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Builds the sale-creation lines for checkout.
    pub fn to_sale_lines(&self) -> Vec<SaleLine> {
        self.items
            .iter()
            .map(|i| SaleLine {
                product_id: i.product_id.clone(),
                quantity: i.quantity,
            })
            .collect()
    }
}

// =============================================================================
// Cart Totals
// =============================================================================

/// Derived pricing for a cart at a given discount.
///
/// `total = subtotal - discount_amount`, exactly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    pub subtotal: Money,
    pub discount_amount: Money,
    pub total: Money,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: &str, price_cents: i64, inventory: i64) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Product {}", id),
            price: Money::from_cents(price_cents),
            inventory,
        }
    }

    #[test]
    fn test_add_item_inserts_with_quantity_one() {
        let mut cart = Cart::new();
        cart.add_item(&product("p1", 999, 5)).unwrap();

        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.items()[0].quantity, 1);
        assert_eq!(cart.items()[0].max_stock, 5);
    }

    #[test]
    fn test_add_same_product_increments_no_duplicate_row() {
        let mut cart = Cart::new();
        let p = product("p1", 999, 5);

        cart.add_item(&p).unwrap();
        cart.add_item(&p).unwrap();
        cart.add_item(&p).unwrap();

        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.total_quantity(), 3);
    }

    #[test]
    fn test_add_rejects_past_stock_snapshot() {
        let mut cart = Cart::new();
        let p = product("p1", 999, 2);

        cart.add_item(&p).unwrap();
        cart.add_item(&p).unwrap();
        let err = cart.add_item(&p).unwrap_err();

        assert!(matches!(
            err,
            CartError::StockExceeded {
                requested: 3,
                max_stock: 2,
                ..
            }
        ));
        // Rejection left the cart unchanged.
        assert_eq!(cart.items()[0].quantity, 2);
    }

    #[test]
    fn test_add_zero_stock_rejected() {
        let mut cart = Cart::new();
        cart.add_item(&product("p1", 10000, 2)).unwrap();

        let err = cart.add_item(&product("p2", 5000, 0)).unwrap_err();
        assert!(matches!(err, CartError::OutOfStock { .. }));

        // Cart still holds only p1.
        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.items()[0].product_id, "p1");
    }

    #[test]
    fn test_set_quantity_exact() {
        let mut cart = Cart::new();
        cart.add_item(&product("p1", 999, 5)).unwrap();

        cart.set_quantity("p1", 4).unwrap();
        assert_eq!(cart.items()[0].quantity, 4);
    }

    #[test]
    fn test_set_quantity_above_stock_rejected() {
        let mut cart = Cart::new();
        let p = product("p1", 10000, 2);
        cart.add_item(&p).unwrap();
        cart.add_item(&p).unwrap();

        let err = cart.set_quantity("p1", 5).unwrap_err();
        assert!(matches!(
            err,
            CartError::StockExceeded {
                requested: 5,
                max_stock: 2,
                ..
            }
        ));
        assert_eq!(cart.items()[0].quantity, 2);
    }

    #[test]
    fn test_set_quantity_below_one_removes_item() {
        let mut cart = Cart::new();
        cart.add_item(&product("p1", 999, 5)).unwrap();

        cart.set_quantity("p1", 0).unwrap();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_quantity_unknown_product_is_noop() {
        let mut cart = Cart::new();
        cart.add_item(&product("p1", 999, 5)).unwrap();

        cart.set_quantity("ghost", 3).unwrap();
        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.items()[0].quantity, 1);
    }

    #[test]
    fn test_remove_then_re_add_resets_quantity() {
        let mut cart = Cart::new();
        let p = product("p1", 999, 5);

        cart.add_item(&p).unwrap();
        cart.add_item(&p).unwrap();
        cart.remove_item("p1");
        cart.add_item(&p).unwrap();

        // No leaked state from the removed line.
        assert_eq!(cart.items()[0].quantity, 1);
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut cart = Cart::new();
        cart.add_item(&product("p1", 999, 5)).unwrap();

        cart.remove_item("ghost");
        assert_eq!(cart.item_count(), 1);
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut cart = Cart::new();
        cart.add_item(&product("b", 100, 5)).unwrap();
        cart.add_item(&product("a", 100, 5)).unwrap();
        cart.add_item(&product("c", 100, 5)).unwrap();

        let ids: Vec<&str> = cart.items().iter().map(|i| i.product_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_totals_scenario() {
        // [{price: $100, qty: 2}], discount 10% →
        // subtotal $200, discount $20, total $180
        let mut cart = Cart::new();
        let p = product("p1", 10000, 2);
        cart.add_item(&p).unwrap();
        cart.add_item(&p).unwrap();

        let totals = cart.totals(DiscountRate::from_percent(10.0));
        assert_eq!(totals.subtotal.cents(), 20000);
        assert_eq!(totals.discount_amount.cents(), 2000);
        assert_eq!(totals.total.cents(), 18000);
    }

    #[test]
    fn test_totals_is_pure() {
        let mut cart = Cart::new();
        cart.add_item(&product("p1", 1234, 3)).unwrap();
        let rate = DiscountRate::from_percent(7.5);

        let first = cart.totals(rate);
        let second = cart.totals(rate);
        assert_eq!(first, second);
        assert_eq!(first.total, first.subtotal - first.discount_amount);
    }

    #[test]
    fn test_totals_empty_cart() {
        let cart = Cart::new();
        let totals = cart.totals(DiscountRate::from_percent(50.0));
        assert!(totals.subtotal.is_zero());
        assert!(totals.discount_amount.is_zero());
        assert!(totals.total.is_zero());
    }

    #[test]
    fn test_clear() {
        let mut cart = Cart::new();
        cart.add_item(&product("p1", 999, 5)).unwrap();
        cart.add_item(&product("p2", 500, 5)).unwrap();

        cart.clear();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_invariant_holds_across_sequences() {
        // Arbitrary mix of operations never leaves a line item outside
        // 1 ≤ quantity ≤ max_stock.
        let mut cart = Cart::new();
        let a = product("a", 100, 3);
        let b = product("b", 250, 1);

        let _ = cart.add_item(&a);
        let _ = cart.add_item(&b);
        let _ = cart.add_item(&a);
        let _ = cart.add_item(&b); // rejected: b max_stock 1
        let _ = cart.set_quantity("a", 3);
        let _ = cart.set_quantity("a", 9); // rejected
        let _ = cart.set_quantity("b", 1);

        for item in cart.items() {
            assert!(item.quantity >= 1);
            assert!(item.quantity <= item.max_stock);
        }
        assert_eq!(cart.total_quantity(), 4); // a=3, b=1
    }

    #[test]
    fn test_to_sale_lines() {
        let mut cart = Cart::new();
        let p = product("p1", 10000, 2);
        cart.add_item(&p).unwrap();
        cart.add_item(&p).unwrap();
        cart.add_item(&product("p2", 500, 9)).unwrap();

        let lines = cart.to_sale_lines();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].product_id, "p1");
        assert_eq!(lines[0].quantity, 2);
        assert_eq!(lines[1].quantity, 1);
    }
}
