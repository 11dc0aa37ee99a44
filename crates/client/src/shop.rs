//! Shop controller: cart, checkout and order submission.
//!
//! Each method corresponds to one user action in the shop. Feedback goes
//! through the [`Notifier`]; redirects go through the [`Navigator`].
//!
//! Checkout has two independent inputs: the UPI "Pay Now" link and the
//! "I have done this payment" checkbox. Only the checkbox (plus a complete
//! address) unlocks "Place Order". Pressing "Place Order" twice sends two
//! orders.

use std::sync::Arc;

use rust_decimal::Decimal;
use taponn_core::{
    Cart, CartError, CartItem, CheckoutDetails, CheckoutError, CheckoutFlow, Merchant, OrderRequest,
    PayNow, Product, QuantityUpdate,
};
use thiserror::Error;
use tracing::instrument;

use crate::api::{ApiClient, ApiError, JsonEnvelope};
use crate::navigation::{Navigator, PRODUCTS_PATH, login_with_return};
use crate::notify::Notifier;
use crate::session::AuthSession;

const EMPTY_CART: &str = "Your cart is empty";
const INCOMPLETE_DETAILS: &str = "Please complete shipping details";
const ORDER_PLACED: &str = "Order placed successfully";
const ORDER_FAILED: &str = "Failed to place order";
const ALREADY_PAID: &str = "Payment already marked as done";
const REMOVED: &str = "Removed from cart";

/// Why a shop action did not go through.
#[derive(Debug, Error)]
pub enum ShopError {
    #[error("Your cart is empty")]
    EmptyCart,

    /// The user was sent to the sign-in page.
    #[error("Sign in to check out")]
    LoginRequired,

    #[error("Checkout is not open")]
    CheckoutClosed,

    #[error(transparent)]
    Cart(#[from] CartError),

    /// Place Order is disabled; no request was sent.
    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    /// The backend answered with `success: false`.
    #[error("{0}")]
    Rejected(String),

    #[error("Failed to place order: {0}")]
    Api(#[from] ApiError),
}

/// Shop state for one visitor.
pub struct Shop {
    api: ApiClient,
    session: AuthSession,
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn Navigator>,
    merchant: Merchant,
    cart: Cart,
    checkout: Option<CheckoutFlow>,
    cart_open: bool,
}

impl Shop {
    #[must_use]
    pub fn new(
        api: ApiClient,
        session: AuthSession,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
        merchant: Merchant,
    ) -> Self {
        Self {
            api,
            session,
            notifier,
            navigator,
            merchant,
            cart: Cart::new(),
            checkout: None,
            cart_open: false,
        }
    }

    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    #[must_use]
    pub const fn is_cart_open(&self) -> bool {
        self.cart_open
    }

    #[must_use]
    pub const fn is_checkout_open(&self) -> bool {
        self.checkout.is_some()
    }

    #[must_use]
    pub const fn checkout(&self) -> Option<&CheckoutFlow> {
        self.checkout.as_ref()
    }

    /// Editable checkout state, while checkout is open.
    pub const fn checkout_mut(&mut self) -> Option<&mut CheckoutFlow> {
        self.checkout.as_mut()
    }

    #[must_use]
    pub const fn merchant(&self) -> &Merchant {
        &self.merchant
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// Add a product and return the line's new quantity.
    ///
    /// # Errors
    ///
    /// Returns `ShopError::Cart` for a zero quantity or an overflowing line.
    pub fn add_to_cart(&mut self, product: &Product, quantity: u32) -> Result<u32, ShopError> {
        match self.cart.add(product, quantity) {
            Ok(total) => {
                tracing::debug!(product_id = %product.id, quantity = total, "Added to cart");
                self.notifier
                    .success(&format!("Added {} to cart!", product.name));
                Ok(total)
            }
            Err(e) => {
                self.notifier.error(&e.to_string());
                Err(e.into())
            }
        }
    }

    pub fn remove_from_cart(&mut self, product_id: &str) -> Option<CartItem> {
        let removed = self.cart.remove(product_id);
        self.notifier.success(REMOVED);
        removed
    }

    /// Set a line's quantity. Zero or below removes it.
    pub fn update_quantity(&mut self, product_id: &str, quantity: i64) -> QuantityUpdate {
        let update = self.cart.update_quantity(product_id, quantity);
        if update == QuantityUpdate::Removed {
            self.notifier.success(REMOVED);
        }
        update
    }

    #[must_use]
    pub fn total(&self) -> Decimal {
        self.cart.total()
    }

    pub const fn open_cart(&mut self) {
        self.cart_open = true;
    }

    pub const fn close_cart(&mut self) {
        self.cart_open = false;
    }

    // =========================================================================
    // Checkout
    // =========================================================================

    /// Press "Checkout".
    ///
    /// A signed-out user is redirected to sign in with a return to the shop,
    /// and checkout stays closed. An already open checkout keeps what was
    /// entered.
    ///
    /// # Errors
    ///
    /// Returns `ShopError::EmptyCart` or `ShopError::LoginRequired`.
    pub fn begin_checkout(&mut self) -> Result<&mut CheckoutFlow, ShopError> {
        if self.cart.is_empty() {
            self.notifier.error(EMPTY_CART);
            return Err(ShopError::EmptyCart);
        }

        let Some(user) = self.session.current_user() else {
            tracing::info!("Checkout requires sign-in");
            self.navigator.navigate(&login_with_return(PRODUCTS_PATH));
            return Err(ShopError::LoginRequired);
        };

        Ok(self
            .checkout
            .get_or_insert_with(|| CheckoutFlow::new(CheckoutDetails::prefilled(user.name, user.email))))
    }

    pub fn close_checkout(&mut self) {
        self.checkout = None;
    }

    /// Tick or untick "I have done this payment".
    ///
    /// # Errors
    ///
    /// Returns `ShopError::CheckoutClosed` outside checkout.
    pub fn set_payment_done(&mut self, done: bool) -> Result<(), ShopError> {
        let flow = self.checkout.as_mut().ok_or(ShopError::CheckoutClosed)?;
        flow.set_payment_done(done);
        Ok(())
    }

    /// Press "Pay Now".
    ///
    /// Once payment is marked as done the link no longer opens.
    ///
    /// # Errors
    ///
    /// Returns `ShopError::CheckoutClosed` outside checkout.
    pub fn pay_now(&self) -> Result<PayNow, ShopError> {
        let flow = self.checkout.as_ref().ok_or(ShopError::CheckoutClosed)?;
        let action = flow.pay_now(&self.merchant, self.cart.total());
        if action == PayNow::AlreadyPaid {
            self.notifier.warning(ALREADY_PAID);
        }
        Ok(action)
    }

    /// Whether "Place Order" is enabled.
    #[must_use]
    pub fn can_place_order(&self) -> bool {
        !self.cart.is_empty()
            && self
                .checkout
                .as_ref()
                .is_some_and(CheckoutFlow::can_place_order)
    }

    /// Press "Place Order".
    ///
    /// Nothing is sent unless every required field is filled and payment is
    /// marked as done. On success the cart is emptied and checkout and cart
    /// are closed; on failure everything is kept for another try.
    ///
    /// # Errors
    ///
    /// Returns `ShopError::Checkout` if the order is not ready,
    /// `ShopError::Rejected` if the backend declined it, and `ShopError::Api`
    /// if the request failed.
    #[instrument(skip(self), fields(items = self.cart.len(), total = %self.cart.total()))]
    pub async fn place_order(&mut self) -> Result<JsonEnvelope, ShopError> {
        if self.cart.is_empty() {
            self.notifier.error(EMPTY_CART);
            return Err(ShopError::EmptyCart);
        }
        let flow = self.checkout.as_ref().ok_or(ShopError::CheckoutClosed)?;

        if let Err(e) = flow.validate() {
            let message = match &e {
                CheckoutError::MissingFields(_) => INCOMPLETE_DETAILS.to_owned(),
                CheckoutError::PaymentNotConfirmed => e.to_string(),
            };
            self.notifier.error(&message);
            return Err(e.into());
        }

        let order = OrderRequest::from_checkout(&self.cart, &flow.details, flow.payment_done());

        match self.api.create_order(&order).await {
            Ok(envelope) if envelope.success => {
                tracing::info!(total = %order.total(), "Order placed");
                self.notifier.success(ORDER_PLACED);
                self.cart.clear();
                self.checkout = None;
                self.cart_open = false;
                Ok(envelope)
            }
            Ok(envelope) => {
                let message = envelope
                    .message
                    .unwrap_or_else(|| ORDER_FAILED.to_owned());
                tracing::warn!(reason = %message, "Order rejected");
                self.notifier.error(&message);
                Err(ShopError::Rejected(message))
            }
            Err(e) => {
                tracing::error!(error = %e, "Order submission failed");
                self.notifier.error(ORDER_FAILED);
                Err(e.into())
            }
        }
    }
}

impl std::fmt::Debug for Shop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Shop")
            .field("cart", &self.cart)
            .field("checkout", &self.checkout)
            .field("cart_open", &self.cart_open)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::api::User;
    use crate::config::ClientConfig;
    use crate::navigation::HistoryNavigator;
    use crate::notify::{NoticeLevel, RecordingNotifier};
    use crate::storage::MemoryStore;
    use taponn_core::catalog::find_product;

    struct Fixture {
        shop: Shop,
        notifier: Arc<RecordingNotifier>,
        navigator: Arc<HistoryNavigator>,
        session: AuthSession,
    }

    fn fixture() -> Fixture {
        // Port 9 refuses connections, so any request that does go out fails
        // as a network error.
        let config = ClientConfig::for_api_url("http://127.0.0.1:9/api").unwrap();
        let navigator = Arc::new(HistoryNavigator::new(PRODUCTS_PATH));
        let notifier = Arc::new(RecordingNotifier::new());
        let api = ApiClient::new(
            &config,
            Arc::new(MemoryStore::new()),
            Arc::clone(&navigator) as Arc<dyn Navigator>,
        )
        .unwrap();
        let session = AuthSession::new(api.clone());
        let shop = Shop::new(
            api,
            session.clone(),
            Arc::clone(&notifier) as Arc<dyn Notifier>,
            Arc::clone(&navigator) as Arc<dyn Navigator>,
            config.merchant,
        );
        Fixture {
            shop,
            notifier,
            navigator,
            session,
        }
    }

    fn sign_in(session: &AuthSession) {
        session.set_user_for_test(User {
            id: "u1".into(),
            name: "Asha Rao".into(),
            email: "asha@example.in".into(),
            phone: None,
            role: taponn_core::UserRole::User,
            permissions: Vec::new(),
        });
    }

    fn fill_address(flow: &mut CheckoutFlow) {
        let d = &mut flow.details;
        d.street = "12 MG Road".into();
        d.city = "Pune".into();
        d.state = "MH".into();
        d.zip_code = "411001".into();
        d.country = "India".into();
    }

    #[test]
    fn test_add_and_remove_notify() {
        let mut f = fixture();
        let card = find_product("nfc-standard").unwrap();

        assert_eq!(f.shop.add_to_cart(&card, 1).unwrap(), 1);
        assert_eq!(f.shop.add_to_cart(&card, 2).unwrap(), 3);
        assert_eq!(f.shop.total(), Decimal::from(2997));
        assert_eq!(
            f.notifier.last().unwrap().message,
            format!("Added {} to cart!", card.name)
        );

        assert!(f.shop.remove_from_cart("nfc-standard").is_some());
        assert!(f.shop.cart().is_empty());
        assert_eq!(f.notifier.last().unwrap().message, REMOVED);
    }

    #[test]
    fn test_update_quantity_to_zero_removes() {
        let mut f = fixture();
        let card = find_product("card-holder").unwrap();
        f.shop.add_to_cart(&card, 2).unwrap();

        assert_eq!(f.shop.update_quantity("card-holder", 5), QuantityUpdate::Set(5));
        assert_eq!(f.shop.update_quantity("card-holder", 0), QuantityUpdate::Removed);
        assert!(f.shop.cart().is_empty());
    }

    #[test]
    fn test_empty_cart_checkout() {
        let mut f = fixture();
        assert!(matches!(f.shop.begin_checkout(), Err(ShopError::EmptyCart)));
        let notice = f.notifier.last().unwrap();
        assert_eq!(notice.level, NoticeLevel::Error);
        assert_eq!(notice.message, EMPTY_CART);
    }

    #[test]
    fn test_signed_out_checkout_redirects() {
        let mut f = fixture();
        f.shop.add_to_cart(&find_product("nfc-premium").unwrap(), 1).unwrap();

        assert!(matches!(f.shop.begin_checkout(), Err(ShopError::LoginRequired)));
        assert!(!f.shop.is_checkout_open());
        assert_eq!(f.navigator.current_path(), "/app/login?returnUrl=%2Fproducts");
    }

    #[test]
    fn test_checkout_prefills_from_user() {
        let mut f = fixture();
        sign_in(&f.session);
        f.shop.add_to_cart(&find_product("nfc-premium").unwrap(), 1).unwrap();

        let flow = f.shop.begin_checkout().unwrap();
        assert_eq!(flow.details.full_name, "Asha Rao");
        assert_eq!(flow.details.email, "asha@example.in");
        assert!(!flow.payment_done());
    }

    #[test]
    fn test_pay_now_is_inert_once_paid() {
        let mut f = fixture();
        sign_in(&f.session);
        f.shop.add_to_cart(&find_product("nfc-premium").unwrap(), 1).unwrap();
        f.shop.begin_checkout().unwrap();

        match f.shop.pay_now().unwrap() {
            PayNow::Link(link) => assert_eq!(
                link.as_str(),
                "upi://pay?pa=taponn@upi&pn=TapOnn&am=1199.00&cu=INR"
            ),
            PayNow::AlreadyPaid => panic!("expected a payment link"),
        }

        f.shop.set_payment_done(true).unwrap();
        assert_eq!(f.shop.pay_now().unwrap(), PayNow::AlreadyPaid);
        assert_eq!(f.notifier.last().unwrap().level, NoticeLevel::Warning);
    }

    #[tokio::test]
    async fn test_place_order_gated_without_request() {
        let mut f = fixture();
        sign_in(&f.session);
        f.shop.add_to_cart(&find_product("nfc-standard").unwrap(), 1).unwrap();
        fill_address(f.shop.begin_checkout().unwrap());

        // Complete address but payment not confirmed.
        assert!(!f.shop.can_place_order());
        let err = f.shop.place_order().await.unwrap_err();
        assert!(matches!(
            err,
            ShopError::Checkout(CheckoutError::PaymentNotConfirmed)
        ));

        // Payment confirmed but a required field blanked.
        let flow = f.shop.checkout_mut().unwrap();
        flow.set_payment_done(true);
        flow.details.city = "  ".into();
        let err = f.shop.place_order().await.unwrap_err();
        assert!(matches!(err, ShopError::Checkout(CheckoutError::MissingFields(_))));
        assert_eq!(f.notifier.last().unwrap().message, INCOMPLETE_DETAILS);
        assert_eq!(f.shop.cart().len(), 1);
    }

    #[tokio::test]
    async fn test_place_order_network_failure_keeps_state() {
        let mut f = fixture();
        sign_in(&f.session);
        f.shop.add_to_cart(&find_product("nfc-standard").unwrap(), 1).unwrap();
        fill_address(f.shop.begin_checkout().unwrap());
        f.shop.set_payment_done(true).unwrap();
        f.shop.open_cart();

        let err = f.shop.place_order().await.unwrap_err();
        assert!(matches!(err, ShopError::Api(ApiError::Network(_))));
        assert_eq!(f.notifier.last().unwrap().message, ORDER_FAILED);
        assert_eq!(f.shop.cart().len(), 1);
        assert!(f.shop.is_checkout_open());
        assert!(f.shop.is_cart_open());
    }
}
