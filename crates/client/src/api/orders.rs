//! Order endpoints.

use taponn_core::{OrderId, OrderRequest};
use tracing::instrument;

use super::{ApiClient, ApiError, JsonEnvelope, segment};

impl ApiClient {
    /// Submit a new order.
    ///
    /// Only `success` on the returned envelope says whether the order was
    /// accepted.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self, order), fields(items = order.items.len()))]
    pub async fn create_order(&self, order: &OrderRequest) -> Result<JsonEnvelope, ApiError> {
        self.post("orders", order).await
    }

    /// Orders placed by the signed-in user.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self))]
    pub async fn get_orders(&self) -> Result<JsonEnvelope, ApiError> {
        self.get("orders").await
    }

    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn get_order(&self, id: &OrderId) -> Result<JsonEnvelope, ApiError> {
        self.get(&format!("orders/{}", segment(id.as_str()))).await
    }

    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn cancel_order(&self, id: &OrderId) -> Result<JsonEnvelope, ApiError> {
        self.patch::<_, serde_json::Value>(&format!("orders/{}/cancel", segment(id.as_str())), None)
            .await
    }
}
