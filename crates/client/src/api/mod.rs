//! REST client for the TapOnn backend.
//!
//! Every call goes to `{api_url}/{path}` with JSON bodies and, when a token
//! is stored, an `Authorization: Bearer <token>` header. Each call is tried
//! once. Failures are classified as [`ApiError`]:
//!
//! - no response at all becomes [`ApiError::Network`]
//! - 401 clears the stored token and sends the user to the sign-in page
//! - 5xx becomes [`ApiError::Server`]
//! - anything else non-2xx is passed through as [`ApiError::Status`]
//!
//! Call groups live in one file per resource, each adding methods to
//! [`ApiClient`].

mod admin;
mod analytics;
mod auth;
mod error;
mod orders;
mod profiles;
mod qr;
mod upload;

pub use auth::{Credentials, LoginResponse, Registration, User};
pub use error::ApiError;
pub use upload::UploadFile;

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{AUTHORIZATION, HeaderValue};
use reqwest::{Method, RequestBuilder};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::{ClientConfig, Timeouts};
use crate::navigation::{LOGIN_PATH, Navigator};
use crate::storage::{KeyValueStore, StorageError, TOKEN_KEY};

/// The backend's standard response shape.
///
/// Most endpoints answer `{ success, data, message }`; the auth endpoints
/// add `token` and `user` at the top level.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub success: bool,
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<serde_json::Value>,
}

impl<T> ApiEnvelope<T> {
    /// The payload of a successful envelope.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unsuccessful` if `success` is false or `data` is absent.
    pub fn into_data(self) -> Result<T, ApiError> {
        match (self.success, self.data) {
            (true, Some(data)) => Ok(data),
            _ => Err(ApiError::Unsuccessful {
                message: self.message,
            }),
        }
    }
}

/// Shorthand for endpoints whose payload is not modelled.
pub type JsonEnvelope = ApiEnvelope<serde_json::Value>;

/// TapOnn REST client.
///
/// Cheap to clone; clones share the HTTP connection pool, the token store
/// and the navigator.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    http: reqwest::Client,
    base_url: Url,
    timeouts: Timeouts,
    local_store: Arc<dyn KeyValueStore>,
    navigator: Arc<dyn Navigator>,
}

impl ApiClient {
    /// Create a new client.
    ///
    /// `local_store` holds the bearer token; `navigator` receives the
    /// sign-in redirect on 401.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(
        config: &ClientConfig,
        local_store: Arc<dyn KeyValueStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeouts.default)
            .user_agent(concat!("taponn-client/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::InvalidRequest(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                http,
                base_url: config.api_url.clone(),
                timeouts: config.timeouts,
                local_store,
                navigator,
            }),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Storage that holds the bearer token.
    #[must_use]
    pub fn local_store(&self) -> &Arc<dyn KeyValueStore> {
        &self.inner.local_store
    }

    #[must_use]
    pub fn navigator(&self) -> &Arc<dyn Navigator> {
        &self.inner.navigator
    }

    /// The stored bearer token, if any.
    #[must_use]
    pub fn token(&self) -> Option<SecretString> {
        self.inner
            .local_store
            .get(TOKEN_KEY)
            .filter(|t| !t.trim().is_empty())
            .map(SecretString::from)
    }

    /// Persist a bearer token for subsequent calls.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the token could not be stored.
    pub fn set_token(&self, token: &SecretString) -> Result<(), StorageError> {
        self.inner.local_store.set(TOKEN_KEY, token.expose_secret())
    }

    /// Forget the stored bearer token.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the removal could not be persisted.
    pub fn clear_token(&self) -> Result<(), StorageError> {
        self.inner.local_store.remove(TOKEN_KEY)
    }

    // =========================================================================
    // Request plumbing
    // =========================================================================

    fn url(&self, path: &str) -> Result<Url, ApiError> {
        self.inner
            .base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ApiError::InvalidRequest(format!("Invalid path {path}: {e}")))
    }

    fn authorization(&self) -> Result<Option<HeaderValue>, ApiError> {
        let Some(token) = self.token() else {
            return Ok(None);
        };

        let token = token.expose_secret().trim();
        let formatted = if token.starts_with("Bearer ") {
            token.to_owned()
        } else {
            format!("Bearer {token}")
        };

        let mut value = HeaderValue::from_str(&formatted)
            .map_err(|e| ApiError::InvalidRequest(format!("Invalid stored token: {e}")))?;
        value.set_sensitive(true);
        Ok(Some(value))
    }

    fn request(&self, method: Method, url: Url) -> Result<RequestBuilder, ApiError> {
        let mut request = self.inner.http.request(method, url);
        if let Some(auth) = self.authorization()? {
            request = request.header(AUTHORIZATION, auth);
        }
        Ok(request)
    }

    /// Send a prepared request and decode a success body.
    pub(crate) async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = request.send().await.map_err(|e| {
            tracing::warn!(error = %e, "Network error - backend may be offline");
            ApiError::Network(e)
        })?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(ApiError::Network)?;

        if status.is_success() {
            let body: &[u8] = if bytes.is_empty() { b"null" } else { &bytes };
            return Ok(serde_json::from_slice(body)?);
        }

        let body = serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            serde_json::Value::String(String::from_utf8_lossy(&bytes).into_owned())
        });
        Err(self.classify(status.as_u16(), body))
    }

    fn classify(&self, status: u16, body: serde_json::Value) -> ApiError {
        let error = ApiError::from_status(status, body);
        match &error {
            ApiError::Unauthorized { .. } => self.handle_unauthorized(),
            ApiError::Server { status, message } => {
                tracing::error!(status, reason = %message, "Server error");
            }
            _ => tracing::debug!(status, "Request failed"),
        }
        error
    }

    fn handle_unauthorized(&self) {
        tracing::warn!("Unauthorized response, clearing stored token");
        if let Err(e) = self.clear_token() {
            tracing::warn!(error = %e, "Failed to clear stored token");
        }

        let navigator = &self.inner.navigator;
        if !navigator.current_path().contains("/login") {
            navigator.navigate(LOGIN_PATH);
        }
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let request = self.request(Method::GET, self.url(path)?)?;
        self.send(request).await
    }

    /// GET with query parameters appended to the path.
    pub(crate) async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let mut url = self.url(path)?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        let request = self.request(Method::GET, url)?;
        self.send(request).await
    }

    pub(crate) async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let request = self.request(Method::POST, self.url(path)?)?.json(body);
        self.send(request).await
    }

    pub(crate) async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let request = self.request(Method::PUT, self.url(path)?)?.json(body);
        self.send(request).await
    }

    pub(crate) async fn patch<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, ApiError> {
        let mut request = self.request(Method::PATCH, self.url(path)?)?;
        if let Some(body) = body {
            request = request.json(body);
        }
        self.send(request).await
    }

    pub(crate) async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let request = self.request(Method::DELETE, self.url(path)?)?;
        self.send(request).await
    }

    /// POST a multipart form with an explicit timeout.
    pub(crate) async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
        timeout: Duration,
    ) -> Result<T, ApiError> {
        let request = self
            .request(Method::POST, self.url(path)?)?
            .multipart(form)
            .timeout(timeout);
        self.send(request).await
    }

    pub(crate) fn timeouts(&self) -> Timeouts {
        self.inner.timeouts
    }
}

/// Encode a caller-supplied value as a single path segment.
pub(crate) fn segment(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("has_token", &self.token().is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::navigation::HistoryNavigator;
    use crate::storage::MemoryStore;
    use serde_json::json;

    fn client(store: Arc<MemoryStore>, nav: Arc<HistoryNavigator>) -> ApiClient {
        let config = ClientConfig::for_api_url("http://localhost:5000/api").unwrap();
        ApiClient::new(&config, store, nav).unwrap()
    }

    #[test]
    fn test_url_joins_under_base_path() {
        let c = client(Arc::default(), Arc::default());
        assert_eq!(
            c.url("/profiles/public/asha").unwrap().as_str(),
            "http://localhost:5000/api/profiles/public/asha"
        );
        assert_eq!(
            c.url("orders").unwrap().as_str(),
            "http://localhost:5000/api/orders"
        );
    }

    #[test]
    fn test_authorization_header() {
        let store = Arc::new(MemoryStore::new());
        let c = client(Arc::clone(&store), Arc::default());
        assert!(c.authorization().unwrap().is_none());

        store.set(TOKEN_KEY, "abc").unwrap();
        assert_eq!(c.authorization().unwrap().unwrap(), "Bearer abc");

        store.set(TOKEN_KEY, "Bearer xyz").unwrap();
        assert_eq!(c.authorization().unwrap().unwrap(), "Bearer xyz");
    }

    #[test]
    fn test_unauthorized_clears_token_and_redirects() {
        let store = Arc::new(MemoryStore::new());
        let nav = Arc::new(HistoryNavigator::new("/app/dashboard"));
        let c = client(Arc::clone(&store), Arc::clone(&nav));
        store.set(TOKEN_KEY, "stale").unwrap();

        let err = c.classify(401, json!({ "message": "Token expired" }));
        assert!(err.is_unauthorized());
        assert!(store.get(TOKEN_KEY).is_none());
        assert_eq!(nav.current_path(), LOGIN_PATH);
    }

    #[test]
    fn test_unauthorized_on_login_page_stays_put() {
        let nav = Arc::new(HistoryNavigator::new("/app/login"));
        let c = client(Arc::default(), Arc::clone(&nav));

        c.classify(401, json!({}));
        assert_eq!(nav.history(), vec!["/app/login"]);
    }

    #[test]
    fn test_envelope_into_data() {
        let ok: ApiEnvelope<u32> =
            serde_json::from_value(json!({ "success": true, "data": 7 })).unwrap();
        assert_eq!(ok.into_data().unwrap(), 7);

        let failed: ApiEnvelope<u32> =
            serde_json::from_value(json!({ "success": false, "message": "Profile not found" }))
                .unwrap();
        let err = failed.into_data().unwrap_err();
        assert_eq!(err.to_string(), "Profile not found");
    }

    #[test]
    fn test_envelope_decodes_payload_without_default() {
        let found: ApiEnvelope<taponn_core::PublicProfile> = serde_json::from_value(json!({
            "success": true,
            "data": { "_id": "p1", "displayName": "Asha Rao" }
        }))
        .unwrap();
        assert_eq!(found.into_data().unwrap().display_name, "Asha Rao");

        let missing: ApiEnvelope<taponn_core::PublicProfile> =
            serde_json::from_value(json!({ "success": false })).unwrap();
        assert!(missing.data.is_none());
    }

    #[test]
    fn test_debug_hides_token() {
        let store = Arc::new(MemoryStore::new());
        store.set(TOKEN_KEY, "super-secret").unwrap();
        let c = client(store, Arc::default());
        assert!(!format!("{c:?}").contains("super-secret"));
    }
}
