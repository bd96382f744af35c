use serde::{Deserialize, Serialize};

/// Product status; inactive products are hidden from the sales outlet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    Active,
    Inactive,
}

impl ProductStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductStatus::Active => "active",
            ProductStatus::Inactive => "inactive",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub status: ProductStatus,
    pub device_category_id: i64,
    pub device_subcategory_id: Option<i64>,
}

impl Product {
    /// Whether stock of this product carries a mandatory serial number
    /// (phones are serialized, accessories are not).
    pub fn is_serialized(&self) -> bool {
        self.device_category_id == crate::outlet::PHONES_CATEGORY_ID
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub subcategories: Vec<Subcategory>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subcategory {
    pub id: i64,
    pub name: String,
    pub device_category_id: i64,
}

/// Payload for creating a product. `image_path` points at a local file and
/// is uploaded as multipart when present.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProductPayload {
    pub name: String,
    pub description: Option<String>,
    pub device_category_id: i64,
    pub device_subcategory_id: Option<i64>,
    pub image_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateProductPayload {
    pub name: String,
    pub description: Option<String>,
    pub status: ProductStatus,
    pub device_category_id: i64,
    pub device_subcategory_id: Option<i64>,
    pub image_path: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outlet::{ACCESSORIES_CATEGORY_ID, PHONES_CATEGORY_ID};

    fn product(device_category_id: i64) -> Product {
        Product {
            id: 1,
            name: "iPhone 12".into(),
            description: None,
            image: None,
            status: ProductStatus::Active,
            device_category_id,
            device_subcategory_id: None,
        }
    }

    #[test]
    fn only_phone_stock_requires_serial_numbers() {
        assert!(product(PHONES_CATEGORY_ID).is_serialized());
        assert!(!product(ACCESSORIES_CATEGORY_ID).is_serialized());
    }
}
