use serde::{Deserialize, Serialize};

use super::product::Product;
use super::user::User;

/// Immutable record of a completed sale, produced from a cart at checkout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub contact_number: String,
    pub payment_method: String,
    pub total_amount: f64,
    pub created_at: Option<String>,
    /// Issuing cashier.
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub items: Vec<InvoiceItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceItem {
    pub id: i64,
    pub sold_price: f64,
    pub quantity: i64,
    pub discount: f64,
    pub serial_number: Option<String>,
    #[serde(default)]
    pub product: Option<Product>,
}

/// Classification of a post-sale return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReturnType {
    /// Restockable: the unit goes back into sellable stock.
    Stock,
    /// Written off as damaged.
    Damaged,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReturnedItem {
    pub invoice_id: i64,
    pub item_id: i64,
    pub quantity: i64,
    pub return_type: ReturnType,
    pub returned_at: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateReturnPayload {
    pub invoice_id: i64,
    pub item_id: i64,
    pub quantity: i64,
    pub return_type: ReturnType,
}
