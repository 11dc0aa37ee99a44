//! Wiring for a complete client.

use std::sync::Arc;

use thiserror::Error;

use crate::api::{ApiClient, ApiError, JsonEnvelope};
use crate::config::ClientConfig;
use crate::demo::{self, DemoFallback};
use crate::navigation::Navigator;
use crate::notify::Notifier;
use crate::profile_view::ProfileResolver;
use crate::session::AuthSession;
use crate::shop::Shop;
use crate::storage::{FileStore, KeyValueStore, MemoryStore, StorageError};
use crate::tracker::AnalyticsTracker;

#[derive(Debug, Error)]
pub enum ServicesError {
    #[error("Failed to open local storage: {0}")]
    Storage(#[from] StorageError),

    #[error("Failed to create API client: {0}")]
    Api(#[from] ApiError),
}

/// Every client component, sharing one token store, navigator and notifier.
#[derive(Clone)]
pub struct Services {
    pub config: ClientConfig,
    pub api: ApiClient,
    pub session: AuthSession,
    pub tracker: AnalyticsTracker,
    pub profiles: ProfileResolver,
    pub notifier: Arc<dyn Notifier>,
    pub navigator: Arc<dyn Navigator>,
}

impl Services {
    /// Build with local storage persisted under `config.storage_dir`.
    ///
    /// # Errors
    ///
    /// Returns error if the storage document is unreadable or the HTTP
    /// client cannot be built.
    pub fn open(
        config: ClientConfig,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, ServicesError> {
        let local_store: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(&config.storage_dir)?);
        Self::with_stores(config, local_store, Arc::new(MemoryStore::new()), notifier, navigator)
    }

    /// Build with caller-supplied local and session stores.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built.
    pub fn with_stores(
        config: ClientConfig,
        local_store: Arc<dyn KeyValueStore>,
        session_store: Arc<dyn KeyValueStore>,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, ServicesError> {
        let api = ApiClient::new(&config, local_store, Arc::clone(&navigator))?;
        let session = AuthSession::new(api.clone());
        let tracker = AnalyticsTracker::new(api.clone(), session_store);
        let profiles = ProfileResolver::new(api.clone(), tracker.clone(), Arc::clone(&navigator));

        Ok(Self {
            config,
            api,
            session,
            tracker,
            profiles,
            notifier,
            navigator,
        })
    }

    /// A fresh shop with an empty cart.
    #[must_use]
    pub fn shop(&self) -> Shop {
        Shop::new(
            self.api.clone(),
            self.session.clone(),
            Arc::clone(&self.notifier),
            Arc::clone(&self.navigator),
            self.config.merchant.clone(),
        )
    }
}

impl Services {
    /// Admin dashboard statistics.
    ///
    /// In demo mode an unreachable or failing backend yields sample data
    /// and a warning notice.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails and demo data does not apply.
    pub async fn dashboard_stats(&self) -> Result<JsonEnvelope, ApiError> {
        self.api.admin_dashboard_stats().await.or_demo_when(
            self.config.demo_mode,
            self.notifier.as_ref(),
            demo::dashboard_stats,
        )
    }

    /// Database collections for the admin browser, with the same demo-mode
    /// fallback as [`dashboard_stats`](Self::dashboard_stats).
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails and demo data does not apply.
    pub async fn database_tables(&self) -> Result<JsonEnvelope, ApiError> {
        self.api.admin_database_tables().await.or_demo_when(
            self.config.demo_mode,
            self.notifier.as_ref(),
            demo::database_tables,
        )
    }
}

impl std::fmt::Debug for Services {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Services")
            .field("config", &self.config)
            .field("api", &self.api)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::navigation::HistoryNavigator;
    use crate::notify::RecordingNotifier;
    use crate::storage::TOKEN_KEY;

    #[test]
    fn test_open_shares_file_backed_token() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = ClientConfig::for_api_url("http://127.0.0.1:9/api").unwrap();
        config.storage_dir = dir.path().to_path_buf();

        let services = Services::open(
            config.clone(),
            Arc::new(RecordingNotifier::new()),
            Arc::new(HistoryNavigator::default()),
        )
        .unwrap();
        services.api.local_store().set(TOKEN_KEY, "tok").unwrap();

        let reopened = Services::open(
            config,
            Arc::new(RecordingNotifier::new()),
            Arc::new(HistoryNavigator::default()),
        )
        .unwrap();
        assert!(reopened.api.token().is_some());
        assert!(reopened.shop().cart().is_empty());
    }

    fn offline(demo_mode: bool) -> (Services, Arc<RecordingNotifier>) {
        let mut config = ClientConfig::for_api_url("http://127.0.0.1:9/api").unwrap();
        config.demo_mode = demo_mode;
        let notifier = Arc::new(RecordingNotifier::new());
        let services = Services::with_stores(
            config,
            Arc::new(MemoryStore::new()),
            Arc::new(MemoryStore::new()),
            Arc::clone(&notifier) as Arc<dyn Notifier>,
            Arc::new(HistoryNavigator::default()),
        )
        .unwrap();
        (services, notifier)
    }

    #[tokio::test]
    async fn test_demo_mode_substitutes_dashboard_stats() {
        let (services, notifier) = offline(true);

        let stats = services.dashboard_stats().await.unwrap();

        assert!(stats.success);
        assert!(stats.data.is_some());
        assert_eq!(notifier.last().unwrap().message, demo::DEMO_NOTICE);
    }

    #[tokio::test]
    async fn test_without_demo_mode_network_error_surfaces() {
        let (services, notifier) = offline(false);

        let err = services.database_tables().await.unwrap_err();

        assert!(err.is_network_error());
        assert!(notifier.notices().is_empty());
    }
}
