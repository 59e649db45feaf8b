//! Command implementations.
//!
//! Every command opens a [`Session`]: the storefront state restored from the
//! file store plus the HTTP product source. Commands that need product data
//! (adding to the cart, liking a product) load the catalog first, since the
//! CLI keeps no catalog between invocations.

pub mod account;
pub mod checkout;
pub mod shop;
mod surface;

use std::sync::Arc;

use thiserror::Error;

use markethub_storefront::catalog::{CatalogError, FakeStoreClient};
use markethub_storefront::config::StorefrontConfig;
use markethub_storefront::store::{FileStore, SharedStore};
use markethub_storefront::{AppError, Storefront};

use surface::TerminalSurface;

/// Errors that can occur while setting up or running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The product source could not be created.
    #[error("Catalog setup failed: {0}")]
    Catalog(#[from] CatalogError),

    /// A storefront operation failed.
    #[error(transparent)]
    App(#[from] AppError),
}

/// Storefront state for one CLI invocation.
pub struct Session {
    pub storefront: Storefront,
    source: FakeStoreClient,
}

impl Session {
    /// Restore state from the configured state directory.
    ///
    /// # Errors
    ///
    /// Returns `CommandError::Catalog` if the HTTP client cannot be built.
    pub fn open(config: &StorefrontConfig) -> Result<Self, CommandError> {
        let store: SharedStore = Arc::new(FileStore::new(&config.state_dir));
        let source = FakeStoreClient::new(&config.catalog)?;
        tracing::debug!(
            site = %config.site,
            state_dir = %config.state_dir.display(),
            catalog = %source.url(),
            "Opening session"
        );

        Ok(Self {
            storefront: Storefront::open(config, store, Box::new(TerminalSurface)),
            source,
        })
    }

    /// Fetch the product list.
    ///
    /// # Errors
    ///
    /// Returns `CommandError::App` if the fetch fails.
    pub async fn load_catalog(&mut self) -> Result<usize, CommandError> {
        Ok(self.storefront.refresh_catalog(&self.source).await?)
    }
}
