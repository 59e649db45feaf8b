//! Wishlist state.
//!
//! A set of liked products, unique by id, kept in the order they were liked
//! and written through to the store under `<site>Wishlist`.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use markethub_core::ProductId;

use crate::models::Product;
use crate::store::{self, Namespace, SharedStore, Slot, StoreError};

/// A liked product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WishlistEntry {
    #[serde(flatten)]
    pub product: Product,
}

/// The wishlist manager.
pub struct Wishlist {
    entries: Vec<WishlistEntry>,
    store: SharedStore,
    key: String,
}

impl std::fmt::Debug for Wishlist {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wishlist")
            .field("key", &self.key)
            .field("entries", &self.entries)
            .finish_non_exhaustive()
    }
}

impl Wishlist {
    /// Create an empty wishlist without reading the store.
    #[must_use]
    pub fn new(store: SharedStore, namespace: &Namespace) -> Self {
        Self {
            entries: Vec::new(),
            store,
            key: namespace.key(Slot::Wishlist),
        }
    }

    /// Load the persisted wishlist.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Corrupt` if the stored entries do not decode or
    /// contain duplicate ids, or any backend error.
    pub fn load(store: SharedStore, namespace: &Namespace) -> Result<Self, StoreError> {
        let mut wishlist = Self::new(store, namespace);
        let entries: Vec<WishlistEntry> =
            store::load_json(wishlist.store.as_ref(), &wishlist.key)?.unwrap_or_default();

        let mut seen = HashSet::with_capacity(entries.len());
        for entry in &entries {
            if !seen.insert(entry.product.id) {
                return Err(StoreError::corrupt(
                    &wishlist.key,
                    format!("product {} appears more than once", entry.product.id),
                ));
            }
            entry
                .product
                .validate()
                .map_err(|reason| StoreError::corrupt(&wishlist.key, reason))?;
        }

        wishlist.entries = entries;
        Ok(wishlist)
    }

    /// Load the persisted wishlist, starting empty if it cannot be read.
    #[must_use]
    pub fn load_or_reset(store: SharedStore, namespace: &Namespace) -> Self {
        match Self::load(store.clone(), namespace) {
            Ok(wishlist) => wishlist,
            Err(e) => {
                let wishlist = Self::new(store, namespace);
                warn!(key = %wishlist.key, error = %e, "Discarding unreadable wishlist");
                if e.is_corrupt() {
                    store::forget(wishlist.store.as_ref(), &wishlist.key);
                }
                wishlist
            }
        }
    }

    /// Add the product if absent, remove it if present.
    ///
    /// Returns whether the product is on the wishlist afterwards.
    pub fn toggle(&mut self, product: &Product) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.product.id != product.id);
        let liked = self.entries.len() == before;
        if liked {
            self.entries.push(WishlistEntry {
                product: product.clone(),
            });
        }
        debug!(product_id = %product.id, liked, "Toggled wishlist");
        store::persist(self.store.as_ref(), &self.key, &self.entries);
        liked
    }

    #[must_use]
    pub fn contains(&self, product_id: ProductId) -> bool {
        self.entries.iter().any(|entry| entry.product.id == product_id)
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.entries.len()
    }

    /// Entries in the order they were liked.
    #[must_use]
    pub fn entries(&self) -> &[WishlistEntry] {
        &self.entries
    }

    /// Ids of every liked product.
    #[must_use]
    pub fn ids(&self) -> Vec<ProductId> {
        self.entries.iter().map(|entry| entry.product.id).collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        store::persist(self.store.as_ref(), &self.key, &self.entries);
    }
}
