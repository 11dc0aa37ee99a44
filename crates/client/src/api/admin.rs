//! Admin dashboard endpoints.
//!
//! Payloads here are shown as-is by the dashboard, so they stay opaque JSON.

use serde_json::json;
use taponn_core::{OrderId, OrderStatus};
use tracing::instrument;

use super::{ApiClient, ApiError, JsonEnvelope, segment};

impl ApiClient {
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self))]
    pub async fn admin_dashboard_stats(&self) -> Result<JsonEnvelope, ApiError> {
        self.get("admin/dashboard").await
    }

    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self))]
    pub async fn admin_users(&self) -> Result<JsonEnvelope, ApiError> {
        self.get("admin/users").await
    }

    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self))]
    pub async fn admin_profiles(&self) -> Result<JsonEnvelope, ApiError> {
        self.get("admin/profiles").await
    }

    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self))]
    pub async fn admin_orders(&self) -> Result<JsonEnvelope, ApiError> {
        self.get("admin/orders").await
    }

    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self))]
    pub async fn admin_qr_codes(&self) -> Result<JsonEnvelope, ApiError> {
        self.get("admin/qr-codes").await
    }

    /// Collection names available to the database viewer.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self))]
    pub async fn admin_database_tables(&self) -> Result<JsonEnvelope, ApiError> {
        self.get("admin/database/tables").await
    }

    /// One page of raw documents from a collection.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self), fields(table = %name))]
    pub async fn admin_table_data(
        &self,
        name: &str,
        page: u32,
        limit: u32,
    ) -> Result<JsonEnvelope, ApiError> {
        let (page, limit) = (page.to_string(), limit.to_string());
        self.get_with_query(
            &format!("admin/database/{}", segment(name)),
            &[("page", page.as_str()), ("limit", limit.as_str())],
        )
        .await
    }

    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self), fields(order_id = %id, status = ?status))]
    pub async fn admin_update_order_status(
        &self,
        id: &OrderId,
        status: OrderStatus,
    ) -> Result<JsonEnvelope, ApiError> {
        let body = json!({ "status": status });
        self.patch(&format!("admin/orders/{}/status", segment(id.as_str())), Some(&body))
            .await
    }
}
