//! Checkout details and the manual-payment flow.
//!
//! Payment is a UPI deep link plus a self-attestation checkbox. The two are
//! independent: opening the link does not tick the box and ticking the box
//! does not require the link to have been opened. The checkbox together with
//! a complete address is the only gate on placing the order.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::upi::{Merchant, UpiPaymentLink};

/// Why an order cannot be placed yet.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CheckoutError {
    /// Required contact or shipping fields are blank.
    #[error("Please complete shipping details (missing: {})", .0.join(", "))]
    MissingFields(Vec<&'static str>),
    /// The "I have done this payment" box is not ticked.
    #[error("Please confirm that you have completed the payment")]
    PaymentNotConfirmed,
}

/// Contact and shipping fields collected at checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutDetails {
    pub full_name: String,
    pub email: String,
    /// Optional.
    pub phone: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
}

impl CheckoutDetails {
    /// Details seeded from the signed-in user.
    #[must_use]
    pub fn prefilled(full_name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            full_name: full_name.into(),
            email: email.into(),
            ..Self::default()
        }
    }

    /// Required fields that are blank after trimming, by wire name.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("fullName", &self.full_name),
            ("email", &self.email),
            ("street", &self.street),
            ("city", &self.city),
            ("state", &self.state),
            ("zipCode", &self.zip_code),
            ("country", &self.country),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }
}

/// Result of pressing "Pay Now".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayNow {
    /// Open this link in the device's UPI handler.
    Link(UpiPaymentLink),
    /// Payment is already attested; the link is inert.
    AlreadyPaid,
}

/// State of an open checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutFlow {
    pub details: CheckoutDetails,
    payment_done: bool,
}

impl CheckoutFlow {
    #[must_use]
    pub const fn new(details: CheckoutDetails) -> Self {
        Self {
            details,
            payment_done: false,
        }
    }

    /// Tick or untick "I have done this payment".
    pub const fn set_payment_done(&mut self, done: bool) {
        self.payment_done = done;
    }

    #[must_use]
    pub const fn payment_done(&self) -> bool {
        self.payment_done
    }

    /// Press "Pay Now" for the current cart total.
    #[must_use]
    pub fn pay_now(&self, merchant: &Merchant, total: Decimal) -> PayNow {
        if self.payment_done {
            PayNow::AlreadyPaid
        } else {
            PayNow::Link(UpiPaymentLink::for_amount(merchant, total))
        }
    }

    /// Check whether "Place Order" is enabled.
    ///
    /// # Errors
    ///
    /// Missing fields are reported before a missing payment confirmation.
    pub fn validate(&self) -> Result<(), CheckoutError> {
        let missing = self.details.missing_fields();
        if !missing.is_empty() {
            return Err(CheckoutError::MissingFields(missing));
        }
        if !self.payment_done {
            return Err(CheckoutError::PaymentNotConfirmed);
        }
        Ok(())
    }

    #[must_use]
    pub fn can_place_order(&self) -> bool {
        self.validate().is_ok()
    }
}
