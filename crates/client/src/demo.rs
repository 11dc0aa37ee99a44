//! Demo-data fallback for dashboards.
//!
//! When the backend is offline or failing, dashboard views may show sample
//! data instead of an error. Only network and 5xx failures qualify; every
//! other error still reaches the caller.

use serde_json::{Value, json};

use crate::api::{ApiEnvelope, ApiError, JsonEnvelope};
use crate::notify::Notifier;

/// Warning shown whenever demo data replaces a failed call.
pub const DEMO_NOTICE: &str = "Using demo data - Backend connection failed";

/// Substitute demo data for a failed call.
pub trait DemoFallback<T> {
    /// Replace a network or server failure with `demo()` and warn the user.
    ///
    /// # Errors
    ///
    /// Returns the original error if it does not allow a fallback.
    fn or_demo<F>(self, notifier: &dyn Notifier, demo: F) -> Result<T, ApiError>
    where
        F: FnOnce() -> T;

    /// [`or_demo`](Self::or_demo) when `enabled`, otherwise propagate unchanged.
    ///
    /// # Errors
    ///
    /// Returns the original error if `enabled` is false or the error does not
    /// allow a fallback.
    fn or_demo_when<F>(self, enabled: bool, notifier: &dyn Notifier, demo: F) -> Result<T, ApiError>
    where
        F: FnOnce() -> T;
}

impl<T> DemoFallback<T> for Result<T, ApiError> {
    fn or_demo<F>(self, notifier: &dyn Notifier, demo: F) -> Result<T, ApiError>
    where
        F: FnOnce() -> T,
    {
        match self {
            Err(e) if e.allows_demo_fallback() => {
                tracing::warn!(error = %e, "Backend unavailable, using fallback data");
                notifier.warning(DEMO_NOTICE);
                Ok(demo())
            }
            other => other,
        }
    }

    fn or_demo_when<F>(self, enabled: bool, notifier: &dyn Notifier, demo: F) -> Result<T, ApiError>
    where
        F: FnOnce() -> T,
    {
        if enabled {
            self.or_demo(notifier, demo)
        } else {
            self
        }
    }
}

fn envelope(data: Value) -> JsonEnvelope {
    ApiEnvelope {
        success: true,
        data: Some(data),
        message: Some("demo".to_owned()),
        token: None,
        user: None,
    }
}

/// Sample admin dashboard statistics.
#[must_use]
pub fn dashboard_stats() -> JsonEnvelope {
    envelope(json!({
        "stats": {
            "totalUsers": 156,
            "activeUsers": 89,
            "totalQRScans": 1247,
            "totalOrders": 89,
            "revenue": 2450.50,
            "conversionRate": 12.5
        },
        "orderData": [
            { "product": "NFC Card", "orders": 45, "revenue": 2247.50 },
            { "product": "Review Card", "orders": 32, "revenue": 959.68 },
            { "product": "Custom Card", "orders": 12, "revenue": 959.88 }
        ],
        "deviceData": [
            { "name": "Mobile", "value": 68 },
            { "name": "Desktop", "value": 25 },
            { "name": "Tablet", "value": 7 }
        ]
    }))
}

/// Sample collection list for the database viewer.
#[must_use]
pub fn database_tables() -> JsonEnvelope {
    envelope(json!([
        { "name": "users", "count": 156 },
        { "name": "profiles", "count": 142 },
        { "name": "orders", "count": 89 },
        { "name": "qrcodes", "count": 203 },
        { "name": "analytics", "count": 1247 }
    ]))
}
