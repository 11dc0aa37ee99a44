//! Profile endpoints.

use taponn_core::PublicProfile;
use tracing::instrument;

use super::{ApiClient, ApiEnvelope, ApiError, JsonEnvelope, segment};

impl ApiClient {
    /// Fetch a public profile by username.
    ///
    /// An unknown username may come back either as a 404 or as a 2xx
    /// envelope with `success: false`; callers should treat both as
    /// not-found.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self), fields(username = %username))]
    pub async fn get_public_profile(
        &self,
        username: &str,
    ) -> Result<ApiEnvelope<PublicProfile>, ApiError> {
        self.get(&format!("profiles/public/{}", segment(username)))
            .await
    }

    /// Fetch the signed-in user's own profile.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self))]
    pub async fn get_my_profile(&self) -> Result<JsonEnvelope, ApiError> {
        self.get("profiles/my").await
    }

    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self, profile))]
    pub async fn create_profile(
        &self,
        profile: &serde_json::Value,
    ) -> Result<JsonEnvelope, ApiError> {
        self.post("profiles", profile).await
    }

    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self, profile), fields(profile_id = %id))]
    pub async fn update_profile(
        &self,
        id: &str,
        profile: &serde_json::Value,
    ) -> Result<JsonEnvelope, ApiError> {
        self.put(&format!("profiles/{}", segment(id)), profile).await
    }

    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self), fields(profile_id = %id))]
    pub async fn delete_profile(&self, id: &str) -> Result<JsonEnvelope, ApiError> {
        self.delete(&format!("profiles/{}", segment(id))).await
    }

    /// Flip a profile between active and inactive.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self), fields(profile_id = %id))]
    pub async fn toggle_profile_status(&self, id: &str) -> Result<JsonEnvelope, ApiError> {
        self.patch::<_, serde_json::Value>(&format!("profiles/{}/toggle-status", segment(id)), None)
            .await
    }
}
