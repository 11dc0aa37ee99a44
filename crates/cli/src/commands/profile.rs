//! Public profile lookup.

use taponn_client::Services;
use tracing::info;

/// Resolve `username`, list its links and optionally click one.
///
/// # Errors
///
/// Returns an error if the profile cannot be resolved or `click` names a
/// link the profile does not have.
pub async fn show(
    services: &Services,
    username: &str,
    click: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let view = services.profiles.open(username).await?;
    let profile = view.profile();

    info!("{}", profile.display_name);
    if let Some(bio) = profile.bio.as_deref().filter(|b| !b.is_empty()) {
        info!("  {bio}");
    }

    let links = view.links();
    if links.is_empty() {
        info!("  (no links)");
    }
    for link in &links {
        match link.href(&profile.display_name) {
            Some(href) => info!("  {:<10} {href}", link.kind()),
            None => info!("  {:<10} {}", link.kind(), link.value()),
        }
    }

    let clicked = match click {
        Some(kind) => {
            let link = links
                .iter()
                .find(|l| l.kind().eq_ignore_ascii_case(kind))
                .ok_or_else(|| format!("Profile has no {kind} link"))?;
            view.click(link)
        }
        None => None,
    };

    services.tracker.flush().await;

    if let Some(href) = clicked {
        info!("Open: {href}");
    }
    Ok(())
}
