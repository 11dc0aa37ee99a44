//! Session management.

use taponn_client::{Credentials, Services};
use taponn_core::Email;
use tracing::{info, warn};

/// Sign in and persist the token. Accounts are keyed by lowercase email.
///
/// # Errors
///
/// Returns an error if the credentials are rejected.
pub async fn login(
    services: &Services,
    email: &Email,
    password: String,
) -> Result<(), Box<dyn std::error::Error>> {
    let user = services
        .session
        .login(&Credentials::new(email.normalized(), password))
        .await?;
    info!("Signed in as {} <{}> ({})", user.name, user.email, user.role);
    Ok(())
}

/// Clear the stored session. The backend is told on a best-effort basis.
pub async fn logout(services: &Services) {
    if services.api.token().is_some()
        && let Err(e) = services.api.logout().await
    {
        warn!(error = %e, "Backend logout failed");
    }
    services.session.logout();
    info!("Signed out");
}

/// Show who the stored token belongs to.
pub async fn whoami(services: &Services) {
    match services.session.hydrate().await {
        Some(user) => info!("{} <{}> ({})", user.name, user.email, user.role),
        None => info!("Not signed in"),
    }
}
