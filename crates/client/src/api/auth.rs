//! Authentication endpoints.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use taponn_core::{UserId, UserRole};
use tracing::instrument;

use super::{ApiClient, ApiError, JsonEnvelope};

/// A signed-in account as returned by the auth endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", alias = "id")]
    pub id: UserId,
    #[serde(default)]
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub role: UserRole,
    #[serde(default)]
    pub permissions: Vec<String>,
}

/// Email and password for `POST /auth/login`.
pub struct Credentials {
    pub email: String,
    pub password: SecretString,
}

impl Credentials {
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: SecretString::from(password.into()),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// New account details for `POST /auth/register`.
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: SecretString,
    pub phone: Option<String>,
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("phone", &self.phone)
            .finish()
    }
}

/// Token and user returned by a successful login or registration.
pub struct LoginResponse {
    pub token: SecretString,
    pub user: User,
}

impl std::fmt::Debug for LoginResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginResponse")
            .field("token", &"[REDACTED]")
            .field("user", &self.user)
            .finish()
    }
}

impl ApiClient {
    /// Exchange credentials for a token.
    ///
    /// Does not store the token; see `AuthSession::login`.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails or the response lacks a token
    /// or user.
    #[instrument(skip(self, credentials), fields(email = %credentials.email))]
    pub async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError> {
        let body = json!({
            "email": credentials.email,
            "password": credentials.password.expose_secret(),
        });
        let response: Value = self.post("auth/login", &body).await?;
        token_response(response)
    }

    /// Create an account and sign it in.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails or the response lacks a token
    /// or user.
    #[instrument(skip(self, registration), fields(email = %registration.email))]
    pub async fn register(&self, registration: &Registration) -> Result<LoginResponse, ApiError> {
        let body = json!({
            "name": registration.name,
            "email": registration.email,
            "password": registration.password.expose_secret(),
            "phone": registration.phone,
        });
        let response: Value = self.post("auth/register", &body).await?;
        token_response(response)
    }

    /// The user behind the stored token.
    ///
    /// Returns `None` when the backend answers without a user.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails or the user cannot be decoded.
    #[instrument(skip(self))]
    pub async fn me(&self) -> Result<Option<User>, ApiError> {
        let response: Value = self.get("auth/me").await?;
        extract_user(response)
            .map(serde_json::from_value)
            .transpose()
            .map_err(ApiError::from)
    }

    /// Tell the backend the session ended.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<JsonEnvelope, ApiError> {
        self.get("auth/logout").await
    }

    /// Backend liveness probe.
    ///
    /// # Errors
    ///
    /// Returns error if the backend is unreachable or unhealthy.
    #[instrument(skip(self))]
    pub async fn health(&self) -> Result<Value, ApiError> {
        self.get("health").await
    }
}

fn token_response(mut response: Value) -> Result<LoginResponse, ApiError> {
    let token = response
        .get("token")
        .and_then(Value::as_str)
        .filter(|t| !t.is_empty())
        .map(|t| SecretString::from(t.to_owned()));
    let user = response.get_mut("user").map(Value::take).filter(|u| !u.is_null());

    match (token, user) {
        (Some(token), Some(user)) => Ok(LoginResponse {
            token,
            user: serde_json::from_value(user)?,
        }),
        _ => Err(ApiError::Unsuccessful {
            message: Some(
                response
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or("Invalid login response: missing token or user")
                    .to_owned(),
            ),
        }),
    }
}

/// `/auth/me` puts the user under `user`, under `data`, or at the top level.
fn extract_user(mut response: Value) -> Option<Value> {
    for key in ["user", "data"] {
        if let Some(user) = response.get_mut(key).map(Value::take)
            && !user.is_null()
        {
            return Some(user);
        }
    }

    let looks_like_user = response.get("_id").is_some() || response.get("id").is_some();
    looks_like_user.then_some(response)
}
