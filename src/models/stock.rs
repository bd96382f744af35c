use serde::{Deserialize, Serialize};

use super::product::Product;

/// Physical condition of a stock unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockCondition {
    New,
    Used,
    Refurbished,
}

/// One sellable inventory unit/batch of a product, carrying its own price
/// and condition. Serial number is required for serialized categories
/// (phones).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stock {
    pub id: i64,
    pub product_id: i64,
    pub serial_number: Option<String>,
    pub quantity: i64,
    pub cost_price: f64,
    pub selling_price: f64,
    pub condition: StockCondition,
    pub color: Option<String>,
    #[serde(default)]
    pub product: Option<Product>,
}

impl Stock {
    /// Display/search name, falling back to the serial number when the
    /// nested product is absent.
    pub fn display_name(&self) -> &str {
        self.product
            .as_ref()
            .map(|p| p.name.as_str())
            .or(self.serial_number.as_deref())
            .unwrap_or("")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateStockPayload {
    pub product_id: i64,
    pub serial_number: Option<String>,
    pub quantity: i64,
    pub cost_price: f64,
    pub selling_price: f64,
    pub condition: StockCondition,
    pub color: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateStockPayload {
    pub serial_number: Option<String>,
    pub quantity: i64,
    pub cost_price: f64,
    pub selling_price: f64,
    pub condition: StockCondition,
    pub color: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn condition_round_trips_lowercase() {
        let json = serde_json::to_string(&StockCondition::Refurbished).unwrap();
        assert_eq!(json, "\"refurbished\"");
        let parsed: StockCondition = serde_json::from_str("\"used\"").unwrap();
        assert_eq!(parsed, StockCondition::Used);
    }
}
