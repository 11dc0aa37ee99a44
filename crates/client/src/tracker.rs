//! Best-effort analytics dispatch.
//!
//! Events are sent on a background task that the caller does not wait for.
//! A failed send is logged and dropped; nothing is retried.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use taponn_core::{AnalyticsEvent, SessionId};
use tokio::runtime::Handle;
use tokio::sync::Notify;
use tokio::task::JoinHandle;

use crate::api::ApiClient;
use crate::storage::{KeyValueStore, SESSION_ID_KEY};

/// Sends analytics events without blocking the caller.
#[derive(Clone)]
pub struct AnalyticsTracker {
    api: ApiClient,
    session_store: Arc<dyn KeyValueStore>,
    in_flight: Arc<InFlight>,
}

#[derive(Default)]
struct InFlight {
    count: AtomicUsize,
    idle: Notify,
}

impl InFlight {
    fn finish(&self) {
        if self.count.fetch_sub(1, Ordering::AcqRel) == 1 {
            self.idle.notify_waiters();
        }
    }
}

impl AnalyticsTracker {
    /// `session_store` holds the visitor session id.
    #[must_use]
    pub fn new(api: ApiClient, session_store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            api,
            session_store,
            in_flight: Arc::default(),
        }
    }

    /// The visitor session id, created and stored on first use.
    #[must_use]
    pub fn session_id(&self) -> SessionId {
        if let Some(stored) = self.session_store.get(SESSION_ID_KEY) {
            return SessionId::from_stored(stored);
        }

        let id = SessionId::generate();
        if let Err(e) = self.session_store.set(SESSION_ID_KEY, id.as_str()) {
            tracing::warn!(error = %e, "Failed to store session id");
        }
        id
    }

    /// Send `event` in the background.
    ///
    /// Outside a Tokio runtime the event is dropped with a warning and `None`
    /// is returned. The handle may be dropped; awaiting it only tells you the
    /// attempt finished.
    pub fn track(&self, event: AnalyticsEvent) -> Option<JoinHandle<()>> {
        let Ok(runtime) = Handle::try_current() else {
            tracing::warn!(event_type = ?event.event_type, "No runtime, analytics event dropped");
            return None;
        };

        let api = self.api.clone();
        let in_flight = Arc::clone(&self.in_flight);
        in_flight.count.fetch_add(1, Ordering::AcqRel);

        Some(runtime.spawn(async move {
            match api.record_event(&event).await {
                Ok(envelope) if !envelope.success => tracing::warn!(
                    event_type = ?event.event_type,
                    reason = envelope.message.as_deref().unwrap_or_default(),
                    "Analytics event rejected"
                ),
                Ok(_) => tracing::debug!(event_type = ?event.event_type, "Analytics event recorded"),
                Err(e) => tracing::warn!(
                    event_type = ?event.event_type,
                    error = %e,
                    "Analytics tracking failed"
                ),
            }
            in_flight.finish();
        }))
    }

    /// Wait until every event sent so far has been attempted.
    ///
    /// Lets a short-lived process finish its sends before exiting. Failed
    /// events are not retried.
    pub async fn flush(&self) {
        loop {
            let idle = self.in_flight.idle.notified();
            if self.in_flight.count.load(Ordering::Acquire) == 0 {
                return;
            }
            idle.await;
        }
    }

    /// Number of events still being sent.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.in_flight.count.load(Ordering::Acquire)
    }
}

impl std::fmt::Debug for AnalyticsTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalyticsTracker")
            .field("api", &self.api)
            .finish_non_exhaustive()
    }
}
