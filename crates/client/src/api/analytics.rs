//! Analytics endpoints.

use taponn_core::AnalyticsEvent;
use tracing::instrument;

use super::{ApiClient, ApiError, JsonEnvelope, segment};

impl ApiClient {
    /// Record one tracking event.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self, event), fields(event_type = ?event.event_type, action = %event.event_action))]
    pub async fn record_event(&self, event: &AnalyticsEvent) -> Result<JsonEnvelope, ApiError> {
        self.post("analytics/event", event).await
    }

    /// Aggregated analytics for one profile.
    ///
    /// `period` is passed through as the `period` query parameter
    /// (e.g. `7d`, `30d`).
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self), fields(profile_id = %profile_id))]
    pub async fn get_profile_analytics(
        &self,
        profile_id: &str,
        period: Option<&str>,
    ) -> Result<JsonEnvelope, ApiError> {
        let path = format!("analytics/profile/{}", segment(profile_id));
        match period {
            Some(period) => self.get_with_query(&path, &[("period", period)]).await,
            None => self.get(&path).await,
        }
    }

    /// Analytics across all of the signed-in user's profiles.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self))]
    pub async fn get_user_analytics(&self) -> Result<JsonEnvelope, ApiError> {
        self.get("analytics/user").await
    }
}
