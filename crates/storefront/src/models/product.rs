//! Catalog product type.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use markethub_core::{Price, ProductId};

/// Highest rating a product can carry.
pub const MAX_RATING: f32 = 5.0;

/// A product in the catalog.
///
/// Immutable once fetched. The catalog replaces its products wholesale on
/// every load; carts and wishlists keep their own snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    /// Unit price in USD.
    pub price: Decimal,
    /// Image URL.
    pub image: String,
    pub category: String,
    /// Average rating, 0 to 5.
    pub rating: f32,
    /// Number of ratings.
    pub rating_count: u32,
    pub description: String,
}

impl Product {
    /// Unit price as a [`Price`].
    #[must_use]
    pub const fn unit_price(&self) -> Price {
        Price::usd(self.price)
    }

    /// Check the invariants a stored or fetched product must hold.
    ///
    /// # Errors
    ///
    /// Returns a description of the first violated invariant.
    pub fn validate(&self) -> Result<(), String> {
        if self.price.is_sign_negative() {
            return Err(format!("product {} has a negative price", self.id));
        }
        if !(0.0..=MAX_RATING).contains(&self.rating) {
            return Err(format!(
                "product {} has rating {} outside 0-{MAX_RATING}",
                self.id, self.rating
            ));
        }
        Ok(())
    }
}
