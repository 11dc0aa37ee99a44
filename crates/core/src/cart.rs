//! In-memory shopping cart.
//!
//! The cart holds at most one line per product ID, and a line never holds a
//! quantity below one: dropping to zero removes it. Nothing is persisted; the
//! cart lives as long as its owner.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::Product;
use crate::types::ProductId;

/// Errors from cart mutations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CartError {
    /// Adding zero units would create an empty line.
    #[error("quantity must be at least 1")]
    ZeroQuantity,
    /// The resulting quantity does not fit in a `u32`.
    #[error("quantity for {0} is too large")]
    QuantityOverflow(ProductId),
}

/// A cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: ProductId,
    pub name: String,
    /// Unit price in INR.
    pub price: Decimal,
    pub quantity: u32,
}

impl CartItem {
    /// `price × quantity`.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// Outcome of [`Cart::update_quantity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityUpdate {
    /// The line now holds the given quantity.
    Set(u32),
    /// The requested quantity was zero or negative and the line was removed.
    Removed,
    /// No line with that ID exists.
    Missing,
}

/// Shopping cart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Add `quantity` units of a product and return the line's new quantity.
    ///
    /// An existing line for the same product is incremented; otherwise a new
    /// line is appended.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::ZeroQuantity`] for `quantity == 0` and
    /// [`CartError::QuantityOverflow`] if the line would exceed `u32::MAX`.
    pub fn add(&mut self, product: &Product, quantity: u32) -> Result<u32, CartError> {
        if quantity == 0 {
            return Err(CartError::ZeroQuantity);
        }

        if let Some(item) = self.items.iter_mut().find(|i| i.id == product.id) {
            item.quantity = item
                .quantity
                .checked_add(quantity)
                .ok_or_else(|| CartError::QuantityOverflow(product.id.clone()))?;
            return Ok(item.quantity);
        }

        self.items.push(CartItem {
            id: product.id.clone(),
            name: product.name.clone(),
            price: product.price,
            quantity,
        });
        Ok(quantity)
    }

    /// Remove the line for `id`. Returns the removed line, if any.
    pub fn remove(&mut self, id: &str) -> Option<CartItem> {
        let pos = self.position(id)?;
        Some(self.items.remove(pos))
    }

    /// Set the quantity of a line.
    ///
    /// A quantity of zero or below removes the line. The value replaces the
    /// current quantity rather than adding to it.
    pub fn update_quantity(&mut self, id: &str, quantity: i64) -> QuantityUpdate {
        let Some(pos) = self.position(id) else {
            return QuantityUpdate::Missing;
        };

        if quantity <= 0 {
            self.items.remove(pos);
            return QuantityUpdate::Removed;
        }

        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        if let Some(item) = self.items.get_mut(pos) {
            item.quantity = quantity;
        }
        QuantityUpdate::Set(quantity)
    }

    /// Sum of `price × quantity` over all lines.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    /// Look up the line for a product.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&CartItem> {
        self.items.iter().find(|i| i.id.as_str() == id)
    }

    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.items.len()
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|i| i.id.as_str() == id)
    }
}
