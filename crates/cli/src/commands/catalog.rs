//! Product listing.

use taponn_core::catalog::products_in;
use taponn_core::{Price, ProductCategory};
use tracing::info;

/// List products, optionally limited to one category.
pub fn list(category: Option<ProductCategory>) {
    for product in products_in(category) {
        info!(
            "{:<16} {:<24} {}",
            product.id,
            product.name,
            Price::inr(product.price)
        );
    }
}
