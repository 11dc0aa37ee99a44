//! Signed-in user state.
//!
//! One `AuthSession` is created at start-up and handed to everything that
//! needs to know who is signed in. Call [`AuthSession::hydrate`] once to
//! turn a persisted token back into a user.

use std::sync::{Arc, PoisonError, RwLock};

use thiserror::Error;
use tracing::instrument;

use crate::api::{ApiClient, ApiError, Credentials, LoginResponse, Registration, User};
use crate::storage::{StorageError, USER_KEY};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Process-wide auth state.
#[derive(Debug, Clone)]
pub struct AuthSession {
    api: ApiClient,
    user: Arc<RwLock<Option<User>>>,
}

impl AuthSession {
    /// A signed-out session. No network calls are made.
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            user: Arc::new(RwLock::new(None)),
        }
    }

    #[must_use]
    pub const fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Restore the user from a persisted token.
    ///
    /// Without a token nothing happens. With one, `/auth/me` is called; if
    /// that fails or returns no user the token is discarded.
    #[instrument(skip(self))]
    pub async fn hydrate(&self) -> Option<User> {
        self.api.token()?;

        match self.api.me().await {
            Ok(Some(user)) => {
                tracing::info!(user_id = %user.id, "Session restored");
                self.remember(&user);
                Some(user)
            }
            Ok(None) => {
                tracing::warn!("No user data returned from /auth/me");
                self.forget();
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, "Authentication check failed");
                self.forget();
                None
            }
        }
    }

    /// Sign in and persist the token.
    ///
    /// # Errors
    ///
    /// Returns error if the credentials are rejected or the token cannot be
    /// stored.
    #[instrument(skip(self, credentials), fields(email = %credentials.email))]
    pub async fn login(&self, credentials: &Credentials) -> Result<User, AuthError> {
        let response = self.api.login(credentials).await?;
        self.accept(response)
    }

    /// Create an account and sign it in.
    ///
    /// # Errors
    ///
    /// Returns error if registration is rejected or the token cannot be
    /// stored.
    #[instrument(skip(self, registration), fields(email = %registration.email))]
    pub async fn register(&self, registration: &Registration) -> Result<User, AuthError> {
        let response = self.api.register(registration).await?;
        self.accept(response)
    }

    /// Clear the token and the user.
    pub fn logout(&self) {
        tracing::info!("Logged out");
        self.forget();
    }

    #[must_use]
    pub fn current_user(&self) -> Option<User> {
        self.user
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.user
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    fn accept(&self, response: LoginResponse) -> Result<User, AuthError> {
        self.api.set_token(&response.token)?;
        self.remember(&response.user);
        Ok(response.user)
    }

    fn remember(&self, user: &User) {
        match serde_json::to_string(user) {
            Ok(json) => {
                if let Err(e) = self.api.local_store().set(USER_KEY, &json) {
                    tracing::warn!(error = %e, "Failed to persist user");
                }
            }
            Err(e) => tracing::warn!(error = %e, "Failed to serialize user"),
        }
        *self.user.write().unwrap_or_else(PoisonError::into_inner) = Some(user.clone());
    }

    fn forget(&self) {
        if let Err(e) = self.api.clear_token() {
            tracing::warn!(error = %e, "Failed to clear token");
        }
        if let Err(e) = self.api.local_store().remove(USER_KEY) {
            tracing::warn!(error = %e, "Failed to clear user");
        }
        *self.user.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Install a user without a network round trip.
    #[cfg(test)]
    pub(crate) fn set_user_for_test(&self, user: User) {
        *self.user.write().unwrap_or_else(PoisonError::into_inner) = Some(user);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::navigation::HistoryNavigator;
    use crate::storage::{KeyValueStore, MemoryStore, TOKEN_KEY};

    fn session(store: Arc<MemoryStore>) -> AuthSession {
        // Nothing listens here; every call fails as a network error.
        let config = ClientConfig::for_api_url("http://127.0.0.1:9/api").unwrap();
        let api = ApiClient::new(&config, store, Arc::new(HistoryNavigator::default())).unwrap();
        AuthSession::new(api)
    }

    #[tokio::test]
    async fn test_hydrate_without_token_is_noop() {
        let s = session(Arc::default());
        assert!(s.hydrate().await.is_none());
        assert!(!s.is_authenticated());
    }

    #[tokio::test]
    async fn test_hydrate_failure_discards_token() {
        let store = Arc::new(MemoryStore::new());
        store.set(TOKEN_KEY, "stale").unwrap();
        store.set(USER_KEY, "{}").unwrap();

        let s = session(Arc::clone(&store));
        assert!(s.hydrate().await.is_none());
        assert!(store.get(TOKEN_KEY).is_none());
        assert!(store.get(USER_KEY).is_none());
    }

    #[test]
    fn test_logout_clears_state() {
        let store = Arc::new(MemoryStore::new());
        store.set(TOKEN_KEY, "tok").unwrap();
        let s = session(Arc::clone(&store));
        s.set_user_for_test(User {
            id: "u1".into(),
            name: "Asha".into(),
            email: "a@b.in".into(),
            phone: None,
            role: taponn_core::UserRole::User,
            permissions: Vec::new(),
        });
        assert!(s.is_authenticated());

        s.logout();
        assert!(s.current_user().is_none());
        assert!(store.get(TOKEN_KEY).is_none());
    }
}
