//! `upi://pay` deep links.
//!
//! A UPI link hands the payment to whatever UPI app the device has
//! registered. The client never learns whether the payment went through.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{CurrencyCode, format_amount};

/// The payee that shop payments go to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Merchant {
    /// Virtual payment address, e.g. `taponn@upi`.
    pub upi_id: String,
    /// Name shown in the payer's UPI app.
    pub name: String,
}

impl Merchant {
    #[must_use]
    pub fn new(upi_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            upi_id: upi_id.into(),
            name: name.into(),
        }
    }
}

/// A built `upi://pay` URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpiPaymentLink {
    uri: String,
    amount: Option<Decimal>,
}

impl UpiPaymentLink {
    /// Link for paying `amount` INR to the merchant.
    ///
    /// ```
    /// use rust_decimal::Decimal;
    /// use taponn_core::{Merchant, UpiPaymentLink};
    ///
    /// let merchant = Merchant::new("taponn@upi", "TapOnn");
    /// let link = UpiPaymentLink::for_amount(&merchant, Decimal::new(1199, 0));
    /// assert_eq!(link.as_str(), "upi://pay?pa=taponn@upi&pn=TapOnn&am=1199.00&cu=INR");
    /// ```
    #[must_use]
    pub fn for_amount(merchant: &Merchant, amount: Decimal) -> Self {
        let am = format_amount(amount);
        let uri = format!(
            "upi://pay?pa={}&pn={}&am={am}&cu={}",
            encode_param(&merchant.upi_id),
            encode_param(&merchant.name),
            CurrencyCode::INR.code(),
        );
        Self {
            uri,
            amount: Some(amount),
        }
    }

    /// Open-amount link to an arbitrary payee, as shown on public profiles.
    #[must_use]
    pub fn for_payee(upi_id: &str, name: &str) -> Self {
        let uri = format!(
            "upi://pay?pa={}&pn={}&cu={}",
            encode_param(upi_id),
            encode_param(name),
            CurrencyCode::INR.code(),
        );
        Self { uri, amount: None }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.uri
    }

    /// The requested amount, if the link carries one.
    #[must_use]
    pub const fn amount(&self) -> Option<Decimal> {
        self.amount
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.uri
    }
}

/// Percent-encode a query value, leaving `@` so the payee address stays
/// readable in the URI.
fn encode_param(value: &str) -> String {
    urlencoding::encode(value).replace("%40", "@")
}

impl fmt::Display for UpiPaymentLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.uri)
    }
}

impl AsRef<str> for UpiPaymentLink {
    fn as_ref(&self) -> &str {
        &self.uri
    }
}
