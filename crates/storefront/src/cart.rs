//! Shopping cart state.
//!
//! The cart is an ordered list of line items (first-added order), each a
//! product snapshot plus a quantity. Every mutation is written through to
//! the store under `<site>Cart`.
//!
//! # Invariants
//!
//! - No two lines share a product id
//! - Every line's quantity is at least 1
//!
//! Operations on ids that are not in the cart are silently ignored.

use std::collections::HashSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use markethub_core::{Price, ProductId, price::round_currency};

use crate::models::Product;
use crate::store::{self, Namespace, SharedStore, Slot, StoreError};

/// A line item: a product snapshot and how many of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    #[serde(flatten)]
    pub product: Product,
    pub quantity: u32,
}

impl CartLine {
    /// Unit price times quantity, unrounded.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.product.unit_price().times(self.quantity).amount
    }
}

/// Outcome of [`Cart::update_quantity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineChange {
    /// The line now holds `quantity` units.
    Updated { quantity: u32 },
    /// The quantity dropped to zero or below and the line was removed.
    Removed,
    /// No line exists for the product.
    Missing,
}

/// The cart manager.
pub struct Cart {
    lines: Vec<CartLine>,
    store: SharedStore,
    key: String,
}

impl std::fmt::Debug for Cart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cart")
            .field("key", &self.key)
            .field("lines", &self.lines)
            .finish_non_exhaustive()
    }
}

impl Cart {
    /// Create an empty cart without reading the store.
    #[must_use]
    pub fn new(store: SharedStore, namespace: &Namespace) -> Self {
        Self {
            lines: Vec::new(),
            store,
            key: namespace.key(Slot::Cart),
        }
    }

    /// Load the persisted cart.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Corrupt` if the stored lines do not match the
    /// cart schema or break its invariants, or any backend error.
    pub fn load(store: SharedStore, namespace: &Namespace) -> Result<Self, StoreError> {
        let mut cart = Self::new(store, namespace);
        let lines: Vec<CartLine> =
            store::load_json(cart.store.as_ref(), &cart.key)?.unwrap_or_default();
        validate_lines(&cart.key, &lines)?;
        cart.lines = lines;
        debug!(key = %cart.key, lines = cart.lines.len(), "Loaded cart");
        Ok(cart)
    }

    /// Load the persisted cart, starting empty if it cannot be read.
    ///
    /// Corrupt state is also deleted from the store.
    #[must_use]
    pub fn load_or_reset(store: SharedStore, namespace: &Namespace) -> Self {
        match Self::load(store.clone(), namespace) {
            Ok(cart) => cart,
            Err(e) => {
                let cart = Self::new(store, namespace);
                warn!(key = %cart.key, error = %e, "Discarding unreadable cart");
                if e.is_corrupt() {
                    store::forget(cart.store.as_ref(), &cart.key);
                }
                cart
            }
        }
    }

    /// Add one unit of `product`.
    ///
    /// Increments the existing line, or appends a snapshot of the product
    /// with quantity 1. Returns the cart's total item count afterwards.
    pub fn add(&mut self, product: &Product) -> u64 {
        if let Some(line) = self.line_mut(product.id) {
            line.quantity = line.quantity.saturating_add(1);
        } else {
            self.lines.push(CartLine {
                product: product.clone(),
                quantity: 1,
            });
        }
        debug!(product_id = %product.id, "Added to cart");
        self.save();
        self.item_count()
    }

    /// Change a line's quantity by `delta`.
    ///
    /// A resulting quantity of zero or less removes the line.
    pub fn update_quantity(&mut self, product_id: ProductId, delta: i64) -> LineChange {
        let Some(index) = self.position(product_id) else {
            debug!(%product_id, "Quantity update for product not in cart");
            return LineChange::Missing;
        };

        let current = self.lines.get(index).map_or(0, |line| line.quantity);
        let next = i64::from(current).saturating_add(delta);
        if next <= 0 {
            self.lines.remove(index);
            debug!(%product_id, "Removed line after quantity update");
            self.save();
            return LineChange::Removed;
        }

        let quantity = u32::try_from(next).unwrap_or(u32::MAX);
        if let Some(line) = self.lines.get_mut(index) {
            line.quantity = quantity;
        }
        if quantity != current {
            self.save();
        }
        LineChange::Updated { quantity }
    }

    /// Remove a line. Returns whether a line was removed.
    ///
    /// Removing a product that is not in the cart is a no-op.
    pub fn remove(&mut self, product_id: ProductId) -> bool {
        let before = self.lines.len();
        self.lines.retain(|line| line.product.id != product_id);
        let removed = self.lines.len() != before;
        if removed {
            debug!(%product_id, "Removed from cart");
            self.save();
        }
        removed
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.save();
    }

    /// Sum of price times quantity, rounded to cents.
    #[must_use]
    pub fn total(&self) -> Decimal {
        round_currency(self.lines.iter().map(CartLine::line_total).sum())
    }

    /// Total as a displayable price.
    #[must_use]
    pub fn total_price(&self) -> Price {
        Price::usd(self.total())
    }

    /// Sum of quantities.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Lines in first-added order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// The line for a product, if present.
    #[must_use]
    pub fn get(&self, product_id: ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.product.id == product_id)
    }

    #[must_use]
    pub fn contains(&self, product_id: ProductId) -> bool {
        self.get(product_id).is_some()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    fn position(&self, product_id: ProductId) -> Option<usize> {
        self.lines
            .iter()
            .position(|line| line.product.id == product_id)
    }

    fn line_mut(&mut self, product_id: ProductId) -> Option<&mut CartLine> {
        self.lines
            .iter_mut()
            .find(|line| line.product.id == product_id)
    }

    fn save(&self) {
        store::persist(self.store.as_ref(), &self.key, &self.lines);
    }
}

fn validate_lines(key: &str, lines: &[CartLine]) -> Result<(), StoreError> {
    let mut seen = HashSet::with_capacity(lines.len());
    for line in lines {
        if line.quantity == 0 {
            return Err(StoreError::corrupt(
                key,
                format!("product {} has quantity 0", line.product.id),
            ));
        }
        if !seen.insert(line.product.id) {
            return Err(StoreError::corrupt(
                key,
                format!("product {} appears more than once", line.product.id),
            ));
        }
        line.product
            .validate()
            .map_err(|reason| StoreError::corrupt(key, reason))?;
    }
    Ok(())
}
