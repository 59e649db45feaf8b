//! Integration tests for MarketHub.
//!
//! Scenarios that cross module boundaries: a storefront session over a real
//! store backend, fed by an in-memory product source.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p markethub-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_properties` - Cart and wishlist laws
//! - `catalog_loading` - Fetch, failure and filtering behavior
//! - `checkout_flow` - Checkout through the storefront session
//! - `persistence` - File-backed state across sessions

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use rust_decimal::Decimal;

use markethub_core::ProductId;
use markethub_storefront::RenderSurface;
use markethub_storefront::catalog::{CatalogError, ProductSource};
use markethub_storefront::models::{Notification, Product};
use markethub_storefront::views::{CartView, ProductCardView, WishlistView};

/// A product with the given id and price in cents.
#[must_use]
pub fn product(id: i32, cents: i64) -> Product {
    Product {
        id: ProductId::new(id),
        title: format!("Product {id}"),
        price: Decimal::new(cents, 2),
        image: format!("https://fakestoreapi.com/img/{id}.jpg"),
        category: "electronics".to_string(),
        rating: 3.9,
        rating_count: 120,
        description: String::new(),
    }
}

/// Eight products shaped like the demo API's first page.
#[must_use]
pub fn demo_catalog() -> Vec<Product> {
    let rows: [(i32, &str, i64, &str); 8] = [
        (1, "Fjallraven - Foldsack No. 1 Backpack, Fits 15 Laptops", 10_995, "men's clothing"),
        (2, "Mens Casual Premium Slim Fit T-Shirts", 2230, "men's clothing"),
        (3, "Mens Cotton Jacket", 5599, "men's clothing"),
        (4, "Mens Casual Slim Fit", 1599, "men's clothing"),
        (5, "John Hardy Women's Legends Naga Bracelet", 69_500, "jewelery"),
        (6, "Solid Gold Petite Micropave", 16_800, "jewelery"),
        (7, "White Gold Plated Princess", 999, "jewelery"),
        (8, "Pierced Owl Rose Gold Plated Stainless Steel Double", 1099, "jewelery"),
    ];
    rows.into_iter()
        .map(|(id, title, cents, category)| Product {
            title: title.to_string(),
            category: category.to_string(),
            ..product(id, cents)
        })
        .collect()
}

/// An in-memory product source that can be switched to failing.
#[derive(Debug, Default)]
pub struct StaticSource {
    products: Vec<Product>,
    failing: AtomicBool,
    calls: AtomicUsize,
}

impl StaticSource {
    #[must_use]
    pub const fn new(products: Vec<Product>) -> Self {
        Self {
            products,
            failing: AtomicBool::new(false),
            calls: AtomicUsize::new(0),
        }
    }

    /// Make subsequent fetches fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of fetches attempted.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ProductSource for StaticSource {
    async fn fetch_products(&self) -> Result<Vec<Product>, CatalogError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(CatalogError::Unavailable("connection refused".to_string()));
        }
        Ok(self.products.clone())
    }
}

/// Everything a [`Recorder`] has seen.
#[derive(Debug, Default, Clone)]
pub struct Rendered {
    pub products: Vec<Vec<ProductCardView>>,
    pub carts: Vec<CartView>,
    pub wishlists: Vec<WishlistView>,
    pub notifications: Vec<Notification>,
}

/// A render surface that records every update for later inspection.
#[derive(Debug, Default, Clone)]
pub struct Recorder(Arc<Mutex<Rendered>>);

impl Recorder {
    /// Take everything recorded so far, leaving the recorder empty.
    #[must_use]
    pub fn take(&self) -> Rendered {
        std::mem::take(&mut *self.0.lock().unwrap_or_else(PoisonError::into_inner))
    }

    fn with(&self, f: impl FnOnce(&mut Rendered)) {
        f(&mut self.0.lock().unwrap_or_else(PoisonError::into_inner));
    }
}

impl RenderSurface for Recorder {
    fn products_changed(&mut self, cards: &[ProductCardView]) {
        self.with(|r| r.products.push(cards.to_vec()));
    }

    fn cart_changed(&mut self, cart: &CartView) {
        self.with(|r| r.carts.push(cart.clone()));
    }

    fn wishlist_changed(&mut self, wishlist: &WishlistView) {
        self.with(|r| r.wishlists.push(wishlist.clone()));
    }

    fn notify(&mut self, notification: &Notification) {
        self.with(|r| r.notifications.push(notification.clone()));
    }
}
