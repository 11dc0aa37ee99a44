//! QR code endpoints.

use taponn_core::QrCodeId;
use tracing::instrument;

use super::{ApiClient, ApiError, JsonEnvelope, segment};

impl ApiClient {
    /// QR codes owned by the signed-in user.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self))]
    pub async fn get_qr_codes(&self) -> Result<JsonEnvelope, ApiError> {
        self.get("qr").await
    }

    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self, qr_code))]
    pub async fn create_qr_code(
        &self,
        qr_code: &serde_json::Value,
    ) -> Result<JsonEnvelope, ApiError> {
        self.post("qr", qr_code).await
    }

    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self), fields(qr_id = %id))]
    pub async fn delete_qr_code(&self, id: &QrCodeId) -> Result<JsonEnvelope, ApiError> {
        self.delete(&format!("qr/{}", segment(id.as_str()))).await
    }
}
