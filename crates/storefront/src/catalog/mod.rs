//! Product catalog cache.
//!
//! Holds the last successfully fetched product list and answers category
//! filters and searches over it. Loading goes through a [`ProductSource`]
//! (the network in production, fixtures in tests).
//!
//! # Loading
//!
//! - Success replaces the whole list atomically
//! - Failure leaves the previous list untouched and returns a retryable error
//! - Only one load runs at a time; an overlapping call fails fast with
//!   [`CatalogError::LoadInFlight`]

mod client;
mod conversions;

use std::collections::HashSet;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use thiserror::Error;
use tracing::instrument;

use markethub_core::ProductId;

use crate::filters::format_category;
use crate::models::Product;

pub use client::FakeStoreClient;

/// Category filter value meaning "no filter".
pub const ALL_CATEGORIES: &str = "all";

/// Errors that can occur when loading the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The product API answered with a non-success status.
    #[error("product API returned {status}: {body}")]
    Status { status: u16, body: String },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A fetched product broke a catalog invariant.
    #[error("invalid product data: {0}")]
    InvalidProduct(String),

    /// The source could not be reached.
    #[error("product source unavailable: {0}")]
    Unavailable(String),

    /// Another load is already running.
    #[error("a catalog load is already in progress")]
    LoadInFlight,

    /// The configured endpoint is not a URL.
    #[error("invalid catalog endpoint: {0}")]
    InvalidEndpoint(#[from] url::ParseError),
}

impl CatalogError {
    /// Whether the user can simply try again.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        !matches!(self, Self::LoadInFlight | Self::InvalidEndpoint(_))
    }
}

/// Somewhere products can be fetched from.
pub trait ProductSource: Send + Sync {
    /// Fetch the full product list.
    fn fetch_products(&self) -> impl Future<Output = Result<Vec<Product>, CatalogError>> + Send;
}

/// The catalog cache.
///
/// Cheaply cloneable via `Arc`; clones share the same product list and the
/// same in-flight guard.
#[derive(Clone, Default)]
pub struct Catalog {
    inner: Arc<CatalogInner>,
}

#[derive(Default)]
struct CatalogInner {
    products: RwLock<Arc<[Product]>>,
    loading: AtomicBool,
}

/// Clears the in-flight flag when dropped, including on cancellation.
struct LoadGuard<'a>(&'a AtomicBool);

impl Drop for LoadGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Catalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch products from `source` and replace the cached list.
    ///
    /// Returns the number of products loaded.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::LoadInFlight` if another load is running, the
    /// source's error if the fetch fails, or `CatalogError::InvalidProduct`
    /// if the fetched data breaks an invariant. The cached list is unchanged
    /// in every error case.
    #[instrument(skip_all)]
    pub async fn load<S: ProductSource>(&self, source: &S) -> Result<usize, CatalogError> {
        if self
            .inner
            .loading
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::debug!("Catalog load already in flight");
            return Err(CatalogError::LoadInFlight);
        }
        let _guard = LoadGuard(&self.inner.loading);

        let products = match source.fetch_products().await {
            Ok(products) => products,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to fetch products");
                return Err(e);
            }
        };
        validate_products(&products)?;

        let count = products.len();
        *self
            .inner
            .products
            .write()
            .unwrap_or_else(PoisonError::into_inner) = products.into();

        tracing::info!(count, "Catalog loaded");
        Ok(count)
    }

    /// Whether a load is currently running.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.inner.loading.load(Ordering::Acquire)
    }

    /// Snapshot of every cached product, in fetch order.
    #[must_use]
    pub fn products(&self) -> Arc<[Product]> {
        self.inner
            .products
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products().is_empty()
    }

    /// Look up a product by id.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<Product> {
        self.products().iter().find(|p| p.id == id).cloned()
    }

    /// Products whose category matches `category`.
    ///
    /// Matching is case-insensitive and permissive in both directions: the
    /// product's category may contain the filter or the filter may contain
    /// it. The same test runs against the category's display label, so
    /// `"jewelry"` finds `"jewelery"` products and `"Fashion"` finds both
    /// clothing categories. `"all"` returns everything.
    #[must_use]
    pub fn filter_by_category(&self, category: &str) -> Vec<Product> {
        let products = self.products();
        let filter = category.trim().to_lowercase();
        if filter == ALL_CATEGORIES {
            return products.to_vec();
        }

        products
            .iter()
            .filter(|p| {
                let own = p.category.to_lowercase();
                let label = format_category(&p.category).to_lowercase();
                overlaps(&own, &filter) || overlaps(&label, &filter)
            })
            .cloned()
            .collect()
    }

    /// Products whose title or category contains `query`, ignoring case.
    ///
    /// An empty or whitespace-only query returns everything.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<Product> {
        let products = self.products();
        if query.trim().is_empty() {
            return products.to_vec();
        }

        let needle = query.to_lowercase();
        products
            .iter()
            .filter(|p| {
                p.title.to_lowercase().contains(&needle)
                    || p.category.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect()
    }

    /// Distinct categories in first-seen order.
    #[must_use]
    pub fn categories(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.products()
            .iter()
            .filter(|p| seen.insert(p.category.clone()))
            .map(|p| p.category.clone())
            .collect()
    }
}

fn overlaps(a: &str, b: &str) -> bool {
    a.contains(b) || b.contains(a)
}

fn validate_products(products: &[Product]) -> Result<(), CatalogError> {
    let mut seen = HashSet::with_capacity(products.len());
    for product in products {
        if !seen.insert(product.id) {
            return Err(CatalogError::InvalidProduct(format!(
                "duplicate product id {}",
                product.id
            )));
        }
        product.validate().map_err(CatalogError::InvalidProduct)?;
    }
    Ok(())
}
