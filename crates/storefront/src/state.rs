//! The storefront session.
//!
//! [`Storefront`] owns every piece of client state for one site: the catalog
//! cache, cart, wishlist, account and checkout. Front ends drive it with
//! user intents and receive refreshed view models through a
//! [`RenderSurface`]. There is no global state; two sessions over two stores
//! never see each other's data.

use std::future::Future;

use tracing::{debug, instrument};

use markethub_core::{CheckoutStatus, Email, ProductId};

use crate::cart::{Cart, LineChange};
use crate::catalog::{ALL_CATEGORIES, Catalog, ProductSource};
use crate::checkout::{Checkout, OrderConfirmation, ShippingForm};
use crate::config::StorefrontConfig;
use crate::error::{AppError, Result};
use crate::models::{Notification, Product, UserProfile};
use crate::services::account::{AccountService, LoginForm, SignupForm};
use crate::services::newsletter;
use crate::store::{Namespace, SharedStore};
use crate::views::{CartView, ProductCardView, WishlistView};
use crate::wishlist::Wishlist;

/// Where the storefront pushes view updates.
///
/// Every method defaults to doing nothing so a surface only implements what
/// it displays.
pub trait RenderSurface: Send {
    /// The visible product grid changed.
    fn products_changed(&mut self, _cards: &[ProductCardView]) {}

    /// Cart contents or totals changed.
    fn cart_changed(&mut self, _cart: &CartView) {}

    /// Wishlist membership changed.
    fn wishlist_changed(&mut self, _wishlist: &WishlistView) {}

    /// Show a transient message.
    fn notify(&mut self, _notification: &Notification) {}

    /// The checkout moved to a new status.
    fn checkout_changed(&mut self, _status: CheckoutStatus) {}
}

/// A surface that discards every update.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSurface;

impl RenderSurface for NullSurface {}

/// What the product grid is currently showing.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ProductFilter {
    Category(String),
    Search(String),
}

/// One storefront session.
pub struct Storefront {
    namespace: Namespace,
    catalog: Catalog,
    cart: Cart,
    wishlist: Wishlist,
    account: AccountService,
    checkout: Checkout,
    filter: ProductFilter,
    surface: Box<dyn RenderSurface>,
}

impl std::fmt::Debug for Storefront {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storefront")
            .field("namespace", &self.namespace)
            .field("cart", &self.cart)
            .field("wishlist", &self.wishlist)
            .field("checkout", &self.checkout)
            .field("filter", &self.filter)
            .finish_non_exhaustive()
    }
}

impl Storefront {
    /// Open a session, restoring persisted cart, wishlist and profile.
    ///
    /// Unreadable persisted state is discarded and starts empty.
    #[must_use]
    pub fn open(
        config: &StorefrontConfig,
        store: SharedStore,
        surface: Box<dyn RenderSurface>,
    ) -> Self {
        let namespace = config.site.clone();
        Self {
            catalog: Catalog::new(),
            cart: Cart::load_or_reset(store.clone(), &namespace),
            wishlist: Wishlist::load_or_reset(store.clone(), &namespace),
            account: AccountService::load_or_reset(store, &namespace),
            checkout: Checkout::new(config.checkout_delay),
            filter: ProductFilter::Category(ALL_CATEGORIES.to_string()),
            namespace,
            surface,
        }
    }

    #[must_use]
    pub const fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    #[must_use]
    pub const fn wishlist(&self) -> &Wishlist {
        &self.wishlist
    }

    /// The signed-in profile, if any.
    #[must_use]
    pub const fn user(&self) -> Option<&UserProfile> {
        self.account.current()
    }

    #[must_use]
    pub const fn checkout_status(&self) -> CheckoutStatus {
        self.checkout.status()
    }

    /// Whether the checkout form can be opened.
    #[must_use]
    pub fn can_checkout(&self) -> bool {
        !self.cart.is_empty() && self.checkout.status().accepts_submit()
    }

    /// Push every view model to the surface.
    pub fn render_all(&mut self) {
        self.render_products();
        self.render_cart();
        self.render_wishlist();
    }

    // --- Catalog ---

    /// Load products from `source` and redraw the grid.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Catalog` if the load fails; the previous product
    /// list stays visible and the user is told they can retry.
    #[instrument(skip_all, fields(namespace = %self.namespace))]
    pub async fn refresh_catalog<S: ProductSource>(&mut self, source: &S) -> Result<usize> {
        match self.catalog.load(source).await {
            Ok(count) => {
                self.render_products();
                Ok(count)
            }
            Err(e) => Err(self.report(e)),
        }
    }

    /// Show only products in `category` (`"all"` for everything).
    pub fn show_category(&mut self, category: &str) {
        self.filter = ProductFilter::Category(category.to_string());
        self.render_products();
    }

    /// Show products whose title or category matches `query`.
    pub fn search(&mut self, query: &str) {
        self.filter = ProductFilter::Search(query.to_string());
        self.render_products();
    }

    /// Products the grid currently shows.
    #[must_use]
    pub fn visible_products(&self) -> Vec<Product> {
        match &self.filter {
            ProductFilter::Category(category) => self.catalog.filter_by_category(category),
            ProductFilter::Search(query) => self.catalog.search(query),
        }
    }

    /// Cards for the products the grid currently shows.
    #[must_use]
    pub fn product_cards(&self) -> Vec<ProductCardView> {
        ProductCardView::list(&self.visible_products(), &self.wishlist)
    }

    // --- Cart ---

    /// Add one unit of a catalog product to the cart.
    ///
    /// Returns the cart's new item count, or `None` if the product is not in
    /// the catalog.
    pub fn add_to_cart(&mut self, product_id: ProductId) -> Option<u64> {
        let Some(product) = self.catalog.get(product_id) else {
            debug!(product_id = %product_id, "Ignoring add for unknown product");
            return None;
        };
        let count = self.cart.add(&product);
        self.render_cart();
        self.notify(Notification::success("Added to cart!"));
        Some(count)
    }

    /// Change a line's quantity by `delta`, removing it at zero.
    pub fn update_quantity(&mut self, product_id: ProductId, delta: i64) -> LineChange {
        let change = self.cart.update_quantity(product_id, delta);
        match change {
            LineChange::Missing => {}
            LineChange::Updated { .. } => self.render_cart(),
            LineChange::Removed => {
                self.render_cart();
                self.notify(Notification::info("Removed from cart"));
            }
        }
        change
    }

    /// Remove a line. Returns whether one was removed.
    pub fn remove_from_cart(&mut self, product_id: ProductId) -> bool {
        let removed = self.cart.remove(product_id);
        if removed {
            self.render_cart();
            self.notify(Notification::info("Removed from cart"));
        }
        removed
    }

    /// Empty the cart.
    pub fn clear_cart(&mut self) {
        self.cart.clear();
        self.render_cart();
    }

    // --- Wishlist ---

    /// Like or unlike a product.
    ///
    /// Returns whether the product is liked afterwards, or `None` if it is
    /// neither in the catalog nor already on the wishlist.
    pub fn toggle_wishlist(&mut self, product_id: ProductId) -> Option<bool> {
        let product = self.catalog.get(product_id).or_else(|| {
            self.wishlist
                .entries()
                .iter()
                .find(|entry| entry.product.id == product_id)
                .map(|entry| entry.product.clone())
        });
        let Some(product) = product else {
            debug!(product_id = %product_id, "Ignoring wishlist toggle for unknown product");
            return None;
        };

        let liked = self.wishlist.toggle(&product);
        self.render_wishlist();
        self.render_products();
        if liked {
            self.notify(Notification::success("Added to wishlist! ❤️"));
        } else {
            self.notify(Notification::info("Removed from wishlist"));
        }
        Some(liked)
    }

    /// Unlike everything.
    pub fn clear_wishlist(&mut self) {
        if self.wishlist.count() == 0 {
            return;
        }
        self.wishlist.clear();
        self.render_wishlist();
        self.render_products();
        self.notify(Notification::info("Wishlist cleared"));
    }

    // --- Account ---

    /// Sign in.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Account` if the form is incomplete or the email is
    /// malformed.
    pub fn sign_in(&mut self, form: &LoginForm) -> Result<UserProfile> {
        match self.account.login(form) {
            Ok(profile) => {
                let profile = profile.clone();
                self.notify(Notification::success("Login successful! Welcome back! 🎉"));
                Ok(profile)
            }
            Err(e) => Err(self.report(e)),
        }
    }

    /// Create an account and sign in.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Account` if the form is incomplete, the email is
    /// malformed, or the password is too short.
    pub fn sign_up(&mut self, form: &SignupForm) -> Result<UserProfile> {
        match self.account.sign_up(form) {
            Ok(profile) => {
                let profile = profile.clone();
                self.notify(Notification::success("Account created successfully! 🎉"));
                Ok(profile)
            }
            Err(e) => Err(self.report(e)),
        }
    }

    /// Sign out. Returns whether someone was signed in.
    pub fn sign_out(&mut self) -> bool {
        let signed_out = self.account.sign_out();
        if signed_out {
            self.notify(Notification::info("You have been signed out"));
        }
        signed_out
    }

    // --- Forms ---

    /// Subscribe an email address to the newsletter.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Newsletter` for a blank or malformed address.
    pub fn subscribe_newsletter(&mut self, email: &str) -> Result<Email> {
        match newsletter::subscribe(email) {
            Ok(email) => {
                self.notify(Notification::success("Thank you for subscribing! 🎉"));
                Ok(email)
            }
            Err(e) => Err(self.report(e)),
        }
    }

    // --- Checkout ---

    /// Place an order for the cart's contents.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Checkout` if the cart is empty or the form is
    /// incomplete. The cart is untouched in that case.
    pub async fn checkout(&mut self, form: &ShippingForm) -> Result<OrderConfirmation> {
        self.checkout_until(form, std::future::pending()).await
    }

    /// Place an order, abandoning it if `cancel` resolves first.
    ///
    /// # Errors
    ///
    /// As [`Storefront::checkout`], plus `CheckoutError::Cancelled` when
    /// `cancel` wins.
    #[instrument(skip_all, fields(namespace = %self.namespace))]
    pub async fn checkout_until<C>(
        &mut self,
        form: &ShippingForm,
        cancel: C,
    ) -> Result<OrderConfirmation>
    where
        C: Future<Output = ()>,
    {
        if let Err(e) = self.checkout.begin(form, &self.cart) {
            self.surface.checkout_changed(self.checkout.status());
            return Err(self.report(e));
        }
        self.surface.checkout_changed(CheckoutStatus::Processing);

        let result = self.checkout.process(form, &mut self.cart, cancel).await;
        self.surface.checkout_changed(self.checkout.status());
        match result {
            Ok(confirmation) => {
                self.render_cart();
                self.notify(Notification::success(format!(
                    "Order #{} placed! Thank you for shopping with us.",
                    confirmation.order_number.short()
                )));
                Ok(confirmation)
            }
            Err(e) => Err(self.report(e)),
        }
    }

    // --- Rendering ---

    fn render_products(&mut self) {
        let cards = self.product_cards();
        self.surface.products_changed(&cards);
    }

    fn render_cart(&mut self) {
        let view = CartView::from(&self.cart);
        self.surface.cart_changed(&view);
    }

    fn render_wishlist(&mut self) {
        let view = WishlistView::from(&self.wishlist);
        self.surface.wishlist_changed(&view);
    }

    fn notify(&mut self, notification: Notification) {
        self.surface.notify(&notification);
    }

    /// Tell the user about `err` and hand it back for propagation.
    fn report(&mut self, err: impl Into<AppError>) -> AppError {
        let err = err.into();
        let notification = err.notification();
        self.surface.notify(&notification);
        err
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use markethub_core::NotificationKind;
    use secrecy::SecretString;

    use super::*;
    use crate::catalog::CatalogError;
    use crate::checkout::CheckoutError;
    use crate::models::product::fixtures::product;
    use crate::store::MemoryStore;

    #[derive(Debug, Clone, PartialEq)]
    enum Event {
        Products(usize),
        Cart(CartView),
        Wishlist(usize),
        Notify(Notification),
        Checkout(CheckoutStatus),
    }

    #[derive(Clone, Default)]
    struct Recorder(Arc<Mutex<Vec<Event>>>);

    impl Recorder {
        fn take(&self) -> Vec<Event> {
            std::mem::take(&mut *self.0.lock().unwrap())
        }
    }

    impl RenderSurface for Recorder {
        fn products_changed(&mut self, cards: &[ProductCardView]) {
            self.0.lock().unwrap().push(Event::Products(cards.len()));
        }

        fn cart_changed(&mut self, cart: &CartView) {
            self.0.lock().unwrap().push(Event::Cart(cart.clone()));
        }

        fn wishlist_changed(&mut self, wishlist: &WishlistView) {
            self.0.lock().unwrap().push(Event::Wishlist(wishlist.count));
        }

        fn notify(&mut self, notification: &Notification) {
            self.0.lock().unwrap().push(Event::Notify(notification.clone()));
        }

        fn checkout_changed(&mut self, status: CheckoutStatus) {
            self.0.lock().unwrap().push(Event::Checkout(status));
        }
    }

    struct FixedSource(std::result::Result<Vec<Product>, ()>);

    impl ProductSource for FixedSource {
        async fn fetch_products(&self) -> std::result::Result<Vec<Product>, CatalogError> {
            self.0
                .clone()
                .map_err(|()| CatalogError::Unavailable("offline".to_string()))
        }
    }

    fn products() -> Vec<Product> {
        let mut shirt = product(2, 2230);
        shirt.category = "men's clothing".to_string();
        shirt.title = "Slim Fit T-Shirt".to_string();
        vec![product(1, 10_995), shirt, product(3, 5599)]
    }

    async fn session() -> (Storefront, Recorder, MemoryStore) {
        let store = MemoryStore::new();
        let recorder = Recorder::default();
        let config = StorefrontConfig {
            checkout_delay: Duration::from_secs(2),
            ..StorefrontConfig::default()
        };
        let mut storefront =
            Storefront::open(&config, Arc::new(store.clone()), Box::new(recorder.clone()));
        storefront
            .refresh_catalog(&FixedSource(Ok(products())))
            .await
            .unwrap();
        recorder.take();
        (storefront, recorder, store)
    }

    fn form() -> ShippingForm {
        ShippingForm {
            name: "Grace Hopper".to_string(),
            address: "1 Compiler Way".to_string(),
            phone: "555-0199".to_string(),
        }
    }

    #[tokio::test]
    async fn test_add_to_cart_renders_and_notifies() {
        let (mut storefront, recorder, _) = session().await;

        assert_eq!(storefront.add_to_cart(ProductId::new(1)), Some(1));

        let events = recorder.take();
        assert!(matches!(events.first(), Some(Event::Cart(view)) if view.total == "$109.95"));
        assert_eq!(
            events.get(1),
            Some(&Event::Notify(Notification::success("Added to cart!")))
        );
    }

    #[tokio::test]
    async fn test_unknown_product_is_ignored() {
        let (mut storefront, recorder, store) = session().await;
        let writes = store.writes();

        assert_eq!(storefront.add_to_cart(ProductId::new(99)), None);
        assert_eq!(storefront.toggle_wishlist(ProductId::new(99)), None);

        assert!(recorder.take().is_empty());
        assert_eq!(store.writes(), writes);
    }

    #[tokio::test]
    async fn test_quantity_to_zero_removes_line() {
        let (mut storefront, recorder, _) = session().await;
        storefront.add_to_cart(ProductId::new(2));
        recorder.take();

        assert_eq!(
            storefront.update_quantity(ProductId::new(2), -1),
            LineChange::Removed
        );
        assert!(storefront.cart().is_empty());
        let events = recorder.take();
        assert_eq!(events.first(), Some(&Event::Cart(CartView::empty())));
        assert_eq!(
            events.get(1),
            Some(&Event::Notify(Notification::info("Removed from cart")))
        );
    }

    #[tokio::test]
    async fn test_toggle_wishlist_redraws_cards() {
        let (mut storefront, recorder, _) = session().await;

        assert_eq!(storefront.toggle_wishlist(ProductId::new(3)), Some(true));
        let events = recorder.take();
        assert_eq!(events.first(), Some(&Event::Wishlist(1)));
        assert_eq!(events.get(1), Some(&Event::Products(3)));
        assert!(storefront
            .product_cards()
            .iter()
            .any(|card| card.id == ProductId::new(3) && card.in_wishlist));

        assert_eq!(storefront.toggle_wishlist(ProductId::new(3)), Some(false));
        assert_eq!(storefront.wishlist().count(), 0);
    }

    #[tokio::test]
    async fn test_category_and_search_filters() {
        let (mut storefront, recorder, _) = session().await;

        storefront.show_category("clothing");
        assert_eq!(recorder.take(), vec![Event::Products(1)]);

        storefront.search("t-shirt");
        assert_eq!(storefront.visible_products().len(), 1);

        storefront.search("");
        assert_eq!(storefront.visible_products().len(), 3);

        storefront.show_category("ALL");
        assert_eq!(storefront.visible_products().len(), 3);
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_products_and_notifies() {
        let (mut storefront, recorder, _) = session().await;

        let err = storefront
            .refresh_catalog(&FixedSource(Err(())))
            .await
            .unwrap_err();

        assert!(err.is_retryable());
        assert_eq!(storefront.catalog().len(), 3);
        let events = recorder.take();
        assert!(matches!(
            events.as_slice(),
            [Event::Notify(note)] if note.kind == NotificationKind::Info
        ));
    }

    #[tokio::test]
    async fn test_sign_up_validation() {
        let (mut storefront, recorder, _) = session().await;
        let form = SignupForm {
            name: "Grace".to_string(),
            email: "grace@example.com".to_string(),
            password: SecretString::from("abc"),
        };

        assert!(storefront.sign_up(&form).is_err());
        assert_eq!(
            recorder.take(),
            vec![Event::Notify(Notification::info(
                "Password must be at least 6 characters"
            ))]
        );
        assert!(storefront.user().is_none());

        let form = SignupForm {
            password: SecretString::from("abcdef"),
            ..form
        };
        let profile = storefront.sign_up(&form).unwrap();
        assert_eq!(profile.display_name(), "Grace");
        assert!(storefront.sign_out());
        assert!(!storefront.sign_out());
    }

    #[tokio::test]
    async fn test_subscribe_newsletter() {
        let (mut storefront, recorder, _) = session().await;

        assert!(storefront.subscribe_newsletter("bad").is_err());
        assert!(storefront.subscribe_newsletter("fan@example.com").is_ok());
        let events = recorder.take();
        assert_eq!(
            events.get(1),
            Some(&Event::Notify(Notification::success(
                "Thank you for subscribing! 🎉"
            )))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_checkout_empties_cart() {
        let (mut storefront, recorder, _) = session().await;
        storefront.add_to_cart(ProductId::new(2));
        storefront.add_to_cart(ProductId::new(2));
        assert!(storefront.can_checkout());
        recorder.take();

        let confirmation = storefront.checkout(&form()).await.unwrap();

        assert_eq!(confirmation.total.display(), "$44.60");
        assert!(storefront.cart().is_empty());
        assert!(!storefront.can_checkout());
        assert_eq!(storefront.checkout_status(), CheckoutStatus::Completed);
        let events = recorder.take();
        assert_eq!(
            events.get(..3),
            Some(
                &[
                    Event::Checkout(CheckoutStatus::Processing),
                    Event::Checkout(CheckoutStatus::Completed),
                    Event::Cart(CartView::empty()),
                ][..]
            )
        );
        assert!(matches!(
            events.get(3),
            Some(Event::Notify(note)) if note.kind == NotificationKind::Success
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_incomplete_form_never_reaches_processing() {
        let (mut storefront, recorder, _) = session().await;
        storefront.add_to_cart(ProductId::new(2));
        recorder.take();
        let mut incomplete = form();
        incomplete.phone = "  ".to_string();

        let err = storefront.checkout(&incomplete).await.unwrap_err();

        assert!(matches!(err, AppError::Checkout(CheckoutError::MissingFields(_))));
        let events = recorder.take();
        assert_eq!(events.first(), Some(&Event::Checkout(CheckoutStatus::Rejected)));
        assert!(!events.contains(&Event::Checkout(CheckoutStatus::Processing)));
        assert_eq!(storefront.cart().item_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_checkout_reports_status() {
        let (mut storefront, recorder, _) = session().await;
        storefront.add_to_cart(ProductId::new(2));
        recorder.take();

        let cancel = tokio::time::sleep(Duration::from_millis(100));
        let err = storefront.checkout_until(&form(), cancel).await.unwrap_err();

        assert!(matches!(err, AppError::Checkout(CheckoutError::Cancelled)));
        let events = recorder.take();
        assert_eq!(
            events.get(..2),
            Some(
                &[
                    Event::Checkout(CheckoutStatus::Processing),
                    Event::Checkout(CheckoutStatus::Cancelled),
                ][..]
            )
        );
        assert_eq!(storefront.cart().item_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_checkout_on_empty_cart() {
        let (mut storefront, recorder, _) = session().await;
        assert!(!storefront.can_checkout());

        let err = storefront.checkout(&form()).await.unwrap_err();

        assert!(matches!(err, AppError::Checkout(CheckoutError::EmptyCart)));
        assert_eq!(
            recorder.take(),
            vec![
                Event::Checkout(CheckoutStatus::Rejected),
                Event::Notify(Notification::info("Your cart is empty!")),
            ]
        );
    }

    #[tokio::test]
    async fn test_clear_wishlist() {
        let (mut storefront, recorder, store) = session().await;
        storefront.toggle_wishlist(ProductId::new(1));
        storefront.toggle_wishlist(ProductId::new(3));
        recorder.take();

        storefront.clear_wishlist();

        assert_eq!(storefront.wishlist().count(), 0);
        let events = recorder.take();
        assert_eq!(events.first(), Some(&Event::Wishlist(0)));
        assert_eq!(
            events.last(),
            Some(&Event::Notify(Notification::info("Wishlist cleared")))
        );

        let writes = store.writes();
        storefront.clear_wishlist();
        assert!(recorder.take().is_empty());
        assert_eq!(store.writes(), writes);
    }

    #[tokio::test]
    async fn test_reopen_restores_state() {
        let (mut storefront, _, store) = session().await;
        storefront.add_to_cart(ProductId::new(1));
        storefront.toggle_wishlist(ProductId::new(3));

        let reopened = Storefront::open(
            &StorefrontConfig::default(),
            Arc::new(store),
            Box::new(NullSurface),
        );
        assert_eq!(reopened.cart().item_count(), 1);
        assert!(reopened.wishlist().contains(ProductId::new(3)));
        assert!(reopened.catalog().is_empty());
    }
}
