//! Cart state and pricing.
//!
//! The cart is a transient pre-checkout container of selected stock items.
//! It is created lazily on the first add-to-cart action and superseded at
//! checkout, when the server converts it into an invoice. Totals are always
//! recomputed from the full item list; there is no incremental bookkeeping.

use serde::{Deserialize, Serialize};

use super::stock::Stock;
use crate::validation;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cart {
    pub id: i64,
    pub created_at: Option<String>,
}

/// One cart line item. `price` holds the absolute discount amount for the
/// line (0 = no discount); the effective unit price shown to the operator is
/// `stock.selling_price - price`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItem {
    pub id: i64,
    pub cart_id: i64,
    pub stock_id: i64,
    pub quantity: i64,
    pub price: f64,
    pub stock: Stock,
}

/// Totals recomputed from the full item list.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CartTotals {
    pub subtotal: f64,
    pub discount: f64,
    pub total: f64,
}

impl CartTotals {
    pub fn compute(items: &[CartItem]) -> Self {
        let subtotal: f64 = items
            .iter()
            .map(|i| i.stock.selling_price * i.quantity as f64)
            .sum();
        let discount: f64 = items.iter().map(|i| i.price).sum();
        Self {
            subtotal,
            discount,
            total: subtotal - discount,
        }
    }
}

/// Client-side cart state held in managed app state.
#[derive(Debug, Default)]
pub struct CartSession {
    pub cart_id: Option<i64>,
    pub items: Vec<CartItem>,
}

impl CartSession {
    pub fn totals(&self) -> CartTotals {
        CartTotals::compute(&self.items)
    }

    /// Immutable copy of the item list taken before an optimistic mutation.
    pub fn snapshot(&self) -> Vec<CartItem> {
        self.items.clone()
    }

    /// Optimistically drop an item from the local list. Returns false when
    /// the item was not present.
    pub fn remove_local(&mut self, item_id: i64) -> bool {
        let before = self.items.len();
        self.items.retain(|i| i.id != item_id);
        self.items.len() != before
    }

    /// Roll back to a pre-mutation snapshot. The whole list is replaced, not
    /// patched, so a failed removal cannot leave duplicate entries behind.
    pub fn restore(&mut self, snapshot: Vec<CartItem>) {
        self.items = snapshot;
    }

    pub fn replace_items(&mut self, items: Vec<CartItem>) {
        self.items = items;
    }

    pub fn clear(&mut self) {
        self.cart_id = None;
        self.items.clear();
    }
}

/// Customer details collected at checkout.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutDetails {
    pub first_name: String,
    pub last_name: String,
    pub contact_number: String,
    pub payment_method: String,
    /// False for "checkout without bill": the sale is identical but the
    /// print trigger is skipped.
    pub print_receipt: bool,
}

/// Result returned to the webview after a successful checkout.
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutResult {
    pub invoice_id: i64,
    pub print_receipt: bool,
}

/// Pre-flight checkout validation. A failure here means no request is sent.
pub fn validate_checkout(details: &CheckoutDetails, items: &[CartItem]) -> Result<(), String> {
    validation::validate_name(&details.first_name).map_err(|_| "First name is required".to_string())?;
    validation::validate_name(&details.last_name).map_err(|_| "Last name is required".to_string())?;
    validation::validate_contact_number(&details.contact_number)?;

    if items.is_empty() {
        return Err("Cart is empty".into());
    }

    if CartTotals::compute(items).total <= 0.0 {
        return Err("Cart total must be greater than zero".into());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::product::{Product, ProductStatus};
    use crate::models::stock::{Stock, StockCondition};

    fn stock(id: i64, selling_price: f64) -> Stock {
        Stock {
            id,
            product_id: id,
            serial_number: None,
            quantity: 10,
            cost_price: selling_price / 2.0,
            selling_price,
            condition: StockCondition::New,
            color: None,
            product: Some(Product {
                id,
                name: format!("Product {}", id),
                description: None,
                image: None,
                status: ProductStatus::Active,
                device_category_id: 1,
                device_subcategory_id: None,
            }),
        }
    }

    fn item(id: i64, selling_price: f64, quantity: i64, discount: f64) -> CartItem {
        CartItem {
            id,
            cart_id: 1,
            stock_id: id,
            quantity,
            price: discount,
            stock: stock(id, selling_price),
        }
    }

    fn details() -> CheckoutDetails {
        CheckoutDetails {
            first_name: "Jane".into(),
            last_name: "Perera".into(),
            contact_number: "0771234567".into(),
            payment_method: "cash".into(),
            print_receipt: true,
        }
    }

    #[test]
    fn totals_without_discounts() {
        let items = vec![item(1, 1000.0, 2, 0.0), item(2, 500.0, 1, 0.0)];
        let totals = CartTotals::compute(&items);
        assert_eq!(totals.subtotal, 2500.0);
        assert_eq!(totals.discount, 0.0);
        assert_eq!(totals.total, 2500.0);
    }

    #[test]
    fn price_override_becomes_discount() {
        let items = vec![item(1, 1000.0, 2, 0.0), item(2, 500.0, 1, 200.0)];
        let totals = CartTotals::compute(&items);
        assert_eq!(totals.subtotal, 2500.0);
        assert_eq!(totals.discount, 200.0);
        assert_eq!(totals.total, 2300.0);
    }

    #[test]
    fn checkout_rejects_short_contact_number() {
        let mut d = details();
        d.contact_number = "12345".into();
        let items = vec![item(1, 1000.0, 1, 0.0)];
        assert_eq!(
            validate_checkout(&d, &items).unwrap_err(),
            "Invalid contact number format"
        );
    }

    #[test]
    fn checkout_rejects_empty_cart_and_zero_total() {
        assert_eq!(validate_checkout(&details(), &[]).unwrap_err(), "Cart is empty");

        let fully_discounted = vec![item(1, 100.0, 1, 100.0)];
        assert!(validate_checkout(&details(), &fully_discounted).is_err());
    }

    #[test]
    fn checkout_requires_names() {
        let mut d = details();
        d.first_name = "".into();
        let items = vec![item(1, 1000.0, 1, 0.0)];
        assert_eq!(
            validate_checkout(&d, &items).unwrap_err(),
            "First name is required"
        );
    }

    #[test]
    fn optimistic_removal_restores_from_snapshot() {
        let mut session = CartSession {
            cart_id: Some(1),
            items: vec![item(1, 1000.0, 1, 0.0), item(2, 500.0, 1, 0.0)],
        };

        let snapshot = session.snapshot();
        assert!(session.remove_local(2));
        assert_eq!(session.items.len(), 1);

        // server rejected the delete: full replacement, no duplicates
        session.restore(snapshot);
        assert_eq!(session.items.len(), 2);
        assert!(session.items.iter().any(|i| i.id == 2));
    }

    #[test]
    fn remove_local_reports_missing_item() {
        let mut session = CartSession::default();
        assert!(!session.remove_local(42));
    }
}
