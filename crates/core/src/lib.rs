//! TapOnn Core - Shared types and client-side commerce state.
//!
//! This crate provides the domain model used by every TapOnn component:
//! - `client` - REST client, shop controller and public profile resolver
//! - `cli` - Command-line front end for the client
//!
//! # Architecture
//!
//! The core crate contains only types and pure state machines - no I/O, no
//! HTTP clients, no storage. Notifications, navigation and network calls are
//! the client crate's concern.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, prices, emails, and statuses
//! - [`catalog`] - The fixed shop product catalog
//! - [`cart`] - Cart line items and their invariants
//! - [`checkout`] - Checkout details and the manual-payment flow
//! - [`upi`] - `upi://pay` deep-link construction
//! - [`order`] - Order submission payload
//! - [`profile`] - Public profile document and its outbound links
//! - [`analytics`] - Tracking events and the per-session identifier

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod analytics;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod order;
pub mod profile;
pub mod types;
pub mod upi;

pub use analytics::{AnalyticsEvent, EventMetadata, EventType, SessionId};
pub use cart::{Cart, CartError, CartItem, QuantityUpdate};
pub use catalog::{Product, ProductCategory};
pub use checkout::{CheckoutDetails, CheckoutError, CheckoutFlow, PayNow};
pub use order::OrderRequest;
pub use profile::{ProfileLink, PublicProfile};
pub use types::*;
pub use upi::{Merchant, UpiPaymentLink};
