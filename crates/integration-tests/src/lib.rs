//! Integration tests for the TapOnn client.
//!
//! Tests run the real client against [`MockBackend`], an in-process axum
//! server bound to an ephemeral port. Every request is recorded, and
//! responses are stubbed per method and path.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p taponn-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, PoisonError};

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, HeaderName, Method, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use serde_json::{Value, json};
use taponn_client::{
    ClientConfig, HistoryNavigator, MemoryStore, Navigator, Notifier, RecordingNotifier, Services,
};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Path prefix the client talks to.
pub const API_PREFIX: &str = "/api";

/// One request as the backend saw it.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    /// Path below [`API_PREFIX`], e.g. `/orders`.
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl RecordedRequest {
    /// The body parsed as JSON, or `Value::Null` if it is not JSON.
    #[must_use]
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap_or(Value::Null)
    }
}

#[derive(Default)]
struct Shared {
    stubs: Mutex<HashMap<(Method, String), (StatusCode, Value)>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

/// In-process stand-in for the REST backend.
pub struct MockBackend {
    addr: SocketAddr,
    shared: Arc<Shared>,
    server: JoinHandle<()>,
}

impl MockBackend {
    /// Bind to `127.0.0.1:0` and start serving.
    ///
    /// Unstubbed routes answer `404 {"success": false}`, except
    /// `POST /analytics/event`, which is accepted by default.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    pub async fn start() -> Self {
        let shared = Arc::new(Shared::default());
        let app = Router::new()
            .fallback(record_and_respond)
            .with_state(Arc::clone(&shared));

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .unwrap_or_else(|e| panic!("Failed to bind mock backend: {e}"));
        let addr = listener
            .local_addr()
            .unwrap_or_else(|e| panic!("Mock backend has no address: {e}"));

        let server = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                panic!("Mock backend stopped: {e}");
            }
        });

        let backend = Self {
            addr,
            shared,
            server,
        };
        backend.respond(
            Method::POST,
            "/analytics/event",
            StatusCode::CREATED,
            json!({"success": true, "message": "Event recorded"}),
        );
        backend
    }

    /// Base URL for [`ClientConfig::for_api_url`].
    #[must_use]
    pub fn api_url(&self) -> String {
        format!("http://{}{API_PREFIX}", self.addr)
    }

    /// Answer `method path` with `status` and `body` from now on.
    pub fn respond(&self, method: Method, path: &str, status: StatusCode, body: Value) {
        self.shared
            .stubs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert((method, path.to_owned()), (status, body));
    }

    /// Every request received so far, oldest first.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.shared
            .requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Requests received for `method path`.
    #[must_use]
    pub fn requests_to(&self, method: &Method, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == *method && r.path == path)
            .collect()
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        self.server.abort();
    }
}

async fn record_and_respond(
    State(shared): State<Arc<Shared>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri
        .path()
        .strip_prefix(API_PREFIX)
        .unwrap_or_else(|| uri.path())
        .to_owned();
    let header_value = |name: HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned)
    };

    let request = RecordedRequest {
        method: method.clone(),
        path: path.clone(),
        query: uri.query().map(str::to_owned),
        authorization: header_value(header::AUTHORIZATION),
        content_type: header_value(header::CONTENT_TYPE),
        body,
    };
    shared
        .requests
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .push(request);

    let stub = shared
        .stubs
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&(method, path))
        .cloned();

    match stub {
        Some((status, body)) => (status, Json(body)).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({"success": false, "message": "Route not found"})),
        )
            .into_response(),
    }
}

/// A client wired to a [`MockBackend`] with in-memory storage.
pub struct TestClient {
    pub backend: MockBackend,
    pub services: Services,
    pub notifier: Arc<RecordingNotifier>,
    pub navigator: Arc<HistoryNavigator>,
}

impl TestClient {
    /// Start a backend and a client pointed at it, on the home page.
    pub async fn start() -> Self {
        Self::start_at("/").await
    }

    /// Start a backend and a client whose navigator begins at `path`.
    ///
    /// # Panics
    ///
    /// Panics if the client cannot be built.
    pub async fn start_at(path: &str) -> Self {
        let backend = MockBackend::start().await;
        let services = connect(&backend.api_url(), path);
        Self {
            backend,
            notifier: services.notifier,
            navigator: services.navigator,
            services: services.services,
        }
    }

    /// Store `token` as if a previous login had happened.
    ///
    /// # Panics
    ///
    /// Panics if the token cannot be stored.
    #[must_use]
    pub fn with_token(self, token: &str) -> Self {
        self.services
            .api
            .set_token(&token.to_owned().into())
            .unwrap_or_else(|e| panic!("Failed to store token: {e}"));
        self
    }

    /// The last path navigated to.
    #[must_use]
    pub fn current_path(&self) -> String {
        self.navigator.history().last().cloned().unwrap_or_default()
    }
}

/// A client with its recording collaborators.
pub struct Connected {
    pub services: Services,
    pub notifier: Arc<RecordingNotifier>,
    pub navigator: Arc<HistoryNavigator>,
}

/// Build a client against `api_url` with in-memory storage.
///
/// # Panics
///
/// Panics if `api_url` is invalid or the client cannot be built.
#[must_use]
pub fn connect(api_url: &str, path: &str) -> Connected {
    let config = ClientConfig::for_api_url(api_url)
        .unwrap_or_else(|e| panic!("Invalid API URL {api_url}: {e}"));
    let notifier = Arc::new(RecordingNotifier::new());
    let navigator = Arc::new(HistoryNavigator::new(path));
    let shared_notifier: Arc<dyn Notifier> = notifier.clone();
    let shared_navigator: Arc<dyn Navigator> = navigator.clone();

    let services = Services::with_stores(
        config,
        Arc::new(MemoryStore::new()),
        Arc::new(MemoryStore::new()),
        shared_notifier,
        shared_navigator,
    )
    .unwrap_or_else(|e| panic!("Failed to build client: {e}"));

    Connected {
        services,
        notifier,
        navigator,
    }
}

/// A signed-in account document.
#[must_use]
pub fn user_json() -> Value {
    json!({
        "_id": "665f1c2e9b1e8a0012345678",
        "name": "Asha Rao",
        "email": "asha@example.com",
        "role": "user",
        "permissions": []
    })
}

/// A public profile document for `username` with one link of each kind.
#[must_use]
pub fn profile_json(username: &str) -> Value {
    json!({
        "_id": "6660a1b2c3d4e5f601234567",
        "user": "665f1c2e9b1e8a0012345678",
        "username": username,
        "displayName": "Asha Rao",
        "bio": "Design lead",
        "location": "Bengaluru",
        "contactInfo": {
            "email": "asha@example.com",
            "phone": "+91 98765 43210",
            "website": "https://asha.design"
        },
        "socialLinks": {
            "linkedin": "https://linkedin.com/in/asharao",
            "twitter": ""
        },
        "customLinks": [
            {"title": "Portfolio", "url": "https://asha.design/work"}
        ],
        "paymentInfo": {"upiId": "asha@okaxis"}
    })
}
