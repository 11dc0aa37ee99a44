//! The fixed shop catalog.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::ProductId;

/// Shop category used for filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductCategory {
    Nfc,
    Review,
    Accessories,
}

/// A product that can be added to the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub category: ProductCategory,
    /// Unit price in INR.
    pub price: Decimal,
}

impl Product {
    /// Create a product.
    #[must_use]
    pub fn new(
        id: impl Into<ProductId>,
        name: impl Into<String>,
        category: ProductCategory,
        price: Decimal,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category,
            price,
        }
    }
}

/// All products offered in the shop, in display order.
#[must_use]
pub fn catalog() -> Vec<Product> {
    vec![
        Product::new(
            "nfc-premium",
            "Premium NFC Card",
            ProductCategory::Nfc,
            Decimal::new(1199, 0),
        ),
        Product::new(
            "nfc-standard",
            "Standard NFC Card",
            ProductCategory::Nfc,
            Decimal::new(999, 0),
        ),
        Product::new(
            "review-card-pro",
            "Review Card Pro",
            ProductCategory::Review,
            Decimal::new(1499, 0),
        ),
        Product::new(
            "nfc-bundle",
            "NFC Card Bundle (5 Pack)",
            ProductCategory::Nfc,
            Decimal::new(4999, 0),
        ),
        Product::new(
            "card-holder",
            "Premium Card Holder",
            ProductCategory::Accessories,
            Decimal::new(499, 0),
        ),
        Product::new(
            "phone-stand",
            "Smart Phone Stand",
            ProductCategory::Accessories,
            Decimal::new(399, 0),
        ),
    ]
}

/// Look up a catalog product by ID.
#[must_use]
pub fn find_product(id: &str) -> Option<Product> {
    catalog().into_iter().find(|p| p.id.as_str() == id)
}

/// Products in a category; `None` means all.
#[must_use]
pub fn products_in(category: Option<ProductCategory>) -> Vec<Product> {
    catalog()
        .into_iter()
        .filter(|p| category.is_none_or(|c| p.category == c))
        .collect()
}
