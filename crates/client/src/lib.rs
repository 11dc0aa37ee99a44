//! TapOnn Client - REST client, shop checkout and public profiles.
//!
//! The browser front end's behavior, without the browser:
//! - [`api`] - Typed REST client with error classification
//! - [`session`] - Signed-in user state
//! - [`shop`] - Cart, manual UPI checkout and order submission
//! - [`profile_view`] - Public profile resolution with click tracking
//! - [`tracker`] - Fire-and-forget analytics
//! - [`demo`] - Demo-data fallback for dashboards
//!
//! Toasts, routing and browser storage are abstracted as [`notify::Notifier`],
//! [`navigation::Navigator`] and [`storage::KeyValueStore`].
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use taponn_client::{ClientConfig, HistoryNavigator, Services, TracingNotifier};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ClientConfig::from_env()?;
//! let services = Services::open(
//!     config,
//!     Arc::new(TracingNotifier),
//!     Arc::new(HistoryNavigator::default()),
//! )?;
//! services.session.hydrate().await;
//!
//! let view = services.profiles.open("asha").await?;
//! for link in view.links() {
//!     let _href = view.click(&link);
//! }
//! # Ok(())
//! # }
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod demo;
pub mod navigation;
pub mod notify;
pub mod profile_view;
pub mod services;
pub mod session;
pub mod shop;
pub mod storage;
pub mod tracker;

pub use api::{ApiClient, ApiEnvelope, ApiError, Credentials, JsonEnvelope, User};
pub use config::{ClientConfig, ConfigError};
pub use demo::DemoFallback;
pub use navigation::{HistoryNavigator, Navigator};
pub use notify::{Notice, NoticeLevel, Notifier, RecordingNotifier, TracingNotifier};
pub use profile_view::{ProfileError, ProfileResolver, ProfileView};
pub use services::{Services, ServicesError};
pub use session::{AuthError, AuthSession};
pub use shop::{Shop, ShopError};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};
pub use tracker::AnalyticsTracker;
