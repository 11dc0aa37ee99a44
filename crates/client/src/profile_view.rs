//! Public profile pages.
//!
//! [`ProfileResolver::open`] is the page load: it fetches the profile named
//! in the route and records a view. [`ProfileView::click`] is a tap on one
//! of the profile's links. Tracking never delays or fails either action.

use std::sync::Arc;

use taponn_core::{AnalyticsEvent, ProfileLink, PublicProfile, SessionId};
use thiserror::Error;
use tracing::instrument;

use crate::api::ApiClient;
use crate::navigation::{NOT_FOUND_PATH, Navigator};
use crate::tracker::AnalyticsTracker;

#[derive(Debug, Error)]
pub enum ProfileError {
    /// The user has been sent to the not-found page.
    #[error("Profile not found: {0}")]
    NotFound(String),
}

/// Loads public profiles by username.
#[derive(Clone)]
pub struct ProfileResolver {
    api: ApiClient,
    tracker: AnalyticsTracker,
    navigator: Arc<dyn Navigator>,
}

impl ProfileResolver {
    #[must_use]
    pub fn new(api: ApiClient, tracker: AnalyticsTracker, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            api,
            tracker,
            navigator,
        }
    }

    /// Open `/{username}`.
    ///
    /// Any failure, including an unsuccessful envelope, redirects to the
    /// not-found page. On success a profile view is tracked in the
    /// background.
    ///
    /// # Errors
    ///
    /// Returns `ProfileError::NotFound` after redirecting.
    #[instrument(skip(self))]
    pub async fn open(&self, username: &str) -> Result<ProfileView, ProfileError> {
        let username = username.trim().trim_matches('/');
        if username.is_empty() {
            return Err(self.not_found(username));
        }

        let profile = match self.api.get_public_profile(username).await {
            Ok(envelope) => match envelope.into_data() {
                Ok(profile) => profile,
                Err(e) => {
                    tracing::info!(error = %e, "Profile lookup unsuccessful");
                    return Err(self.not_found(username));
                }
            },
            Err(e) => {
                tracing::warn!(error = %e, "Error fetching profile");
                return Err(self.not_found(username));
            }
        };

        let session_id = self.tracker.session_id();
        // Handle dropped: the view is recorded in the background.
        drop(
            self.tracker
                .track(AnalyticsEvent::profile_view(&profile, session_id.clone())),
        );

        Ok(ProfileView {
            profile,
            tracker: self.tracker.clone(),
            session_id,
        })
    }

    fn not_found(&self, username: &str) -> ProfileError {
        self.navigator.navigate(NOT_FOUND_PATH);
        ProfileError::NotFound(username.to_owned())
    }
}

impl std::fmt::Debug for ProfileResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProfileResolver")
            .field("api", &self.api)
            .finish_non_exhaustive()
    }
}

/// A loaded public profile.
#[derive(Debug)]
pub struct ProfileView {
    profile: PublicProfile,
    tracker: AnalyticsTracker,
    session_id: SessionId,
}

impl ProfileView {
    #[must_use]
    pub const fn profile(&self) -> &PublicProfile {
        &self.profile
    }

    #[must_use]
    pub const fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    /// Links in display order.
    #[must_use]
    pub fn links(&self) -> Vec<ProfileLink> {
        self.profile.links()
    }

    /// Tap a link: record the click in the background and return where the
    /// link leads, if anywhere.
    pub fn click(&self, link: &ProfileLink) -> Option<String> {
        let event = AnalyticsEvent::link_click(&self.profile, link, self.session_id.clone());
        drop(self.tracker.track(event));
        link.href(&self.profile.display_name)
    }
}
