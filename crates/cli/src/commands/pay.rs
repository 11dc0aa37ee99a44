//! UPI payment links.

use rust_decimal::Decimal;
use taponn_client::ClientConfig;
use taponn_core::{UpiPaymentLink, format_amount};
use tracing::info;

/// Print the merchant payment link for `amount`.
///
/// # Errors
///
/// Returns an error if `amount` is not positive.
pub fn link(config: &ClientConfig, amount: Decimal) -> Result<(), Box<dyn std::error::Error>> {
    if amount <= Decimal::ZERO {
        return Err(format!("Amount must be positive, got {amount}").into());
    }

    let link = UpiPaymentLink::for_amount(&config.merchant, amount);
    info!(
        "Pay ₹{} to {} ({})",
        format_amount(amount),
        config.merchant.name,
        config.merchant.upi_id
    );
    info!("{link}");
    Ok(())
}
