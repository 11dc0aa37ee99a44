//! Shop checkout from a cart file.
//!
//! # Cart File Format
//!
//! ```yaml
//! items:
//!   - product: nfc-premium
//!     quantity: 2
//!   - product: card-holder
//! ```

use std::path::{Path, PathBuf};

use clap::Args;
use serde::Deserialize;
use taponn_client::Services;
use taponn_core::catalog::find_product;
use taponn_core::{PayNow, Product};
use thiserror::Error;
use tracing::info;

/// Errors reading a cart file.
#[derive(Debug, Error)]
pub enum CartFileError {
    #[error("Failed to read cart file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid cart file: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Unknown product: {0}")]
    UnknownProduct(String),

    #[error("Cart file has no items")]
    Empty,
}

#[derive(Debug, Deserialize)]
struct CartFile {
    #[serde(default)]
    items: Vec<CartLine>,
}

#[derive(Debug, Deserialize)]
struct CartLine {
    product: String,
    #[serde(default = "default_quantity")]
    quantity: u32,
}

const fn default_quantity() -> u32 {
    1
}

/// Arguments for `taponn order`.
#[derive(Debug, Args)]
pub struct OrderArgs {
    /// YAML cart file
    #[arg(long)]
    pub cart: PathBuf,

    /// Full name (defaults to the signed-in user's)
    #[arg(long)]
    pub name: Option<String>,

    /// Email (defaults to the signed-in user's)
    #[arg(long)]
    pub email: Option<String>,

    #[arg(long)]
    pub phone: Option<String>,

    #[arg(long)]
    pub street: String,

    #[arg(long)]
    pub city: String,

    #[arg(long)]
    pub state: String,

    #[arg(long)]
    pub zip: String,

    #[arg(long)]
    pub country: String,

    /// Confirm that the UPI payment has been made
    #[arg(long)]
    pub paid: bool,
}

/// Parse a cart file into catalog products and quantities.
fn parse_cart(raw: &str) -> Result<Vec<(Product, u32)>, CartFileError> {
    let file: CartFile = serde_yaml::from_str(raw)?;
    if file.items.is_empty() {
        return Err(CartFileError::Empty);
    }

    file.items
        .into_iter()
        .map(|line| {
            find_product(&line.product)
                .map(|p| (p, line.quantity))
                .ok_or(CartFileError::UnknownProduct(line.product))
        })
        .collect()
}

async fn read_cart(path: &Path) -> Result<Vec<(Product, u32)>, CartFileError> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CartFileError::Read {
            path: path.to_path_buf(),
            source,
        })?;
    parse_cart(&raw)
}

/// Run checkout for the cart file and submit the order.
///
/// # Errors
///
/// Returns an error if the cart file is invalid, the user is not signed
/// in, checkout is incomplete, or the order is rejected.
pub async fn place(services: &Services, args: &OrderArgs) -> Result<(), Box<dyn std::error::Error>> {
    let lines = read_cart(&args.cart).await?;
    info!(lines = lines.len(), "Loaded cart");

    services.session.hydrate().await;

    let mut shop = services.shop();
    for (product, quantity) in &lines {
        shop.add_to_cart(product, *quantity)?;
    }
    shop.open_cart();

    let flow = shop.begin_checkout()?;
    let details = &mut flow.details;
    if let Some(name) = &args.name {
        details.full_name.clone_from(name);
    }
    if let Some(email) = &args.email {
        details.email.clone_from(email);
    }
    if let Some(phone) = &args.phone {
        details.phone.clone_from(phone);
    }
    details.street.clone_from(&args.street);
    details.city.clone_from(&args.city);
    details.state.clone_from(&args.state);
    details.zip_code.clone_from(&args.zip);
    details.country.clone_from(&args.country);

    if let PayNow::Link(link) = shop.pay_now()? {
        info!("Pay with any UPI app: {link}");
    }
    shop.set_payment_done(args.paid)?;

    let total = shop.total();
    shop.place_order().await?;
    info!("Order placed for ₹{total:.2}");
    Ok(())
}
