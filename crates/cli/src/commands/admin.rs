//! Admin dashboard queries.

use taponn_client::{JsonEnvelope, Services};
use tracing::info;

/// Print the dashboard statistics.
///
/// # Errors
///
/// Returns an error if the request fails outside demo mode.
pub async fn stats(services: &Services) -> Result<(), Box<dyn std::error::Error>> {
    let envelope = services.dashboard_stats().await?;
    log_data(&envelope)
}

/// Print the database collections.
///
/// # Errors
///
/// Returns an error if the request fails outside demo mode.
pub async fn tables(services: &Services) -> Result<(), Box<dyn std::error::Error>> {
    let envelope = services.database_tables().await?;
    log_data(&envelope)
}

fn log_data(envelope: &JsonEnvelope) -> Result<(), Box<dyn std::error::Error>> {
    match &envelope.data {
        Some(data) => info!("{}", serde_json::to_string_pretty(data)?),
        None => info!("No data returned"),
    }
    Ok(())
}
