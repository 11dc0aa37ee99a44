//! Order submission payload for `POST /orders`.
//!
//! Built once at submit time from the cart and checkout details. The backend
//! recomputes totals and owns the order from then on.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cart::Cart;
use crate::checkout::CheckoutDetails;
use crate::types::{PaymentMethod, PaymentStatus, ProductType};

/// Placeholder sent when the customer leaves the phone field blank.
pub const NO_PHONE: &str = "N/A";

/// Body of an order-creation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub customer_info: CustomerInfo,
    pub items: Vec<OrderItem>,
    pub shipping: Shipping,
    pub payment: Payment,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerInfo {
    pub name: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_type: ProductType,
    pub quantity: u32,
    /// Sent as a JSON number.
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shipping {
    pub address: ShippingAddress,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub method: PaymentMethod,
    pub status: PaymentStatus,
}

impl OrderRequest {
    /// Map a cart and checkout form to an order request.
    ///
    /// Every line carries the same [`ProductType::NfcCard`] tag regardless of
    /// product category. The payment status is `completed` exactly when the
    /// customer attested the payment.
    #[must_use]
    pub fn from_checkout(cart: &Cart, details: &CheckoutDetails, payment_done: bool) -> Self {
        let phone = details.phone.trim();
        let phone = if phone.is_empty() { NO_PHONE } else { phone };

        let items = cart
            .items()
            .iter()
            .map(|item| OrderItem {
                product_type: ProductType::NfcCard,
                quantity: item.quantity,
                unit_price: item.price,
                name: item.name.clone(),
            })
            .collect();

        Self {
            customer_info: CustomerInfo {
                name: details.full_name.trim().to_owned(),
                email: details.email.trim().to_owned(),
                phone: phone.to_owned(),
            },
            items,
            shipping: Shipping {
                address: ShippingAddress {
                    street: details.street.trim().to_owned(),
                    city: details.city.trim().to_owned(),
                    state: details.state.trim().to_owned(),
                    zip_code: details.zip_code.trim().to_owned(),
                    country: details.country.trim().to_owned(),
                },
            },
            payment: Payment {
                method: PaymentMethod::BankTransfer,
                status: PaymentStatus::from_attestation(payment_done),
            },
            notes: format!(
                "Order via Shop | Contact: {} {}",
                details.full_name.trim(),
                details.phone.trim()
            )
            .trim_end()
            .to_owned(),
        }
    }

    /// Sum of `unit_price × quantity` over the items.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.items
            .iter()
            .map(|i| i.unit_price * Decimal::from(i.quantity))
            .sum()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::catalog::{Product, ProductCategory};

    fn details() -> CheckoutDetails {
        CheckoutDetails {
            full_name: "Ravi Kumar".into(),
            email: "ravi@example.in".into(),
            phone: "9876543210".into(),
            street: "4 Park Street".into(),
            city: "Kolkata".into(),
            state: "West Bengal".into(),
            zip_code: "700016".into(),
            country: "India".into(),
        }
    }

    fn cart() -> Cart {
        let mut cart = Cart::new();
        cart.add(
            &Product::new("nfc-premium", "Premium NFC Card", ProductCategory::Nfc, Decimal::new(1199, 0)),
            1,
        )
        .unwrap();
        cart.add(
            &Product::new("review-card-pro", "Review Card Pro", ProductCategory::Review, Decimal::new(4999, 2)),
            2,
        )
        .unwrap();
        cart
    }

    #[test]
    fn test_payload_shape() {
        let order = OrderRequest::from_checkout(&cart(), &details(), true);
        let json = serde_json::to_value(&order).unwrap();

        assert_eq!(json["customerInfo"]["name"], "Ravi Kumar");
        assert_eq!(json["customerInfo"]["phone"], "9876543210");
        assert_eq!(json["items"][0]["productType"], "nfc_card");
        assert_eq!(json["items"][0]["unitPrice"], 1199.0);
        assert_eq!(json["items"][1]["quantity"], 2);
        let unit_price = json["items"][1]["unitPrice"].as_f64().unwrap();
        assert!((unit_price - 49.99).abs() < 1e-9);
        assert_eq!(json["shipping"]["address"]["zipCode"], "700016");
        assert_eq!(json["payment"]["status"], "completed");
        assert_eq!(json["payment"]["method"], "bank_transfer");
        assert_eq!(json["notes"], "Order via Shop | Contact: Ravi Kumar 9876543210");
    }

    #[test]
    fn test_every_line_uses_fixed_product_type() {
        let order = OrderRequest::from_checkout(&cart(), &details(), true);
        assert!(order.items.iter().all(|i| i.product_type == ProductType::NfcCard));
    }

    #[test]
    fn test_unattested_payment_is_pending() {
        let order = OrderRequest::from_checkout(&cart(), &details(), false);
        assert_eq!(order.payment.status, PaymentStatus::Pending);
    }

    #[test]
    fn test_blank_phone_defaults() {
        let mut d = details();
        d.phone = " ".into();
        let order = OrderRequest::from_checkout(&cart(), &d, true);
        assert_eq!(order.customer_info.phone, NO_PHONE);
        assert_eq!(order.notes, "Order via Shop | Contact: Ravi Kumar");
    }

    #[test]
    fn test_total_matches_cart() {
        let cart = cart();
        let order = OrderRequest::from_checkout(&cart, &details(), true);
        assert_eq!(order.total(), cart.total());
    }
}
