//! Product grid and wishlist view models.

use rust_decimal::Decimal;
use serde::Serialize;

use markethub_core::{Price, ProductId};

use crate::filters::{TITLE_MAX_CHARS, format_category, format_stat, full_stars, truncate_text};
use crate::models::Product;
use crate::wishlist::Wishlist;

/// Products priced below this are shown as on sale.
pub const SALE_THRESHOLD: Decimal = Decimal::from_parts(50, 0, 0, false, 0);

/// Markup applied to a sale price to show the "was" price.
const WAS_PRICE_FACTOR: Decimal = Decimal::from_parts(15, 0, 0, false, 1);

/// Product card display data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductCardView {
    pub id: ProductId,
    pub title: String,
    pub image: String,
    pub category: String,
    pub price: String,
    /// Crossed-out price shown on sale items.
    pub old_price: Option<String>,
    pub on_sale: bool,
    pub full_stars: u8,
    /// Rating as the API reported it.
    pub rating: String,
    pub rating_count: u32,
    /// Review count abbreviated for the card ("1K+").
    pub reviews: String,
    pub in_wishlist: bool,
}

impl ProductCardView {
    /// Build a card, marking wishlist membership.
    #[must_use]
    pub fn new(product: &Product, in_wishlist: bool) -> Self {
        let on_sale = product.price < SALE_THRESHOLD;
        Self {
            id: product.id,
            title: truncate_text(&product.title, TITLE_MAX_CHARS),
            image: product.image.clone(),
            category: format_category(&product.category),
            price: product.unit_price().display(),
            old_price: on_sale.then(|| Price::usd(product.price * WAS_PRICE_FACTOR).display()),
            on_sale,
            full_stars: full_stars(product.rating),
            rating: product.rating.to_string(),
            rating_count: product.rating_count,
            reviews: format_stat(u64::from(product.rating_count)),
            in_wishlist,
        }
    }

    /// Cards for a product list, with wishlist membership looked up.
    #[must_use]
    pub fn list(products: &[Product], wishlist: &Wishlist) -> Vec<Self> {
        products
            .iter()
            .map(|p| Self::new(p, wishlist.contains(p.id)))
            .collect()
    }
}

/// Wishlist badge and membership data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WishlistView {
    pub count: usize,
    pub ids: Vec<ProductId>,
}

impl From<&Wishlist> for WishlistView {
    fn from(wishlist: &Wishlist) -> Self {
        Self {
            count: wishlist.count(),
            ids: wishlist.ids(),
        }
    }
}
