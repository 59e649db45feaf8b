//! Cart view models.

use serde::Serialize;

use markethub_core::{Price, ProductId};

use crate::cart::{Cart, CartLine};
use crate::filters::{TITLE_MAX_CHARS, truncate_text};

/// Cart line display data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartLineView {
    pub id: ProductId,
    pub title: String,
    pub image: String,
    pub quantity: u32,
    pub unit_price: String,
    pub line_price: String,
}

/// Cart display data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartView {
    pub items: Vec<CartLineView>,
    pub total: String,
    pub item_count: u64,
}

impl CartView {
    /// Create an empty cart.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total: "$0.00".to_string(),
            item_count: 0,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl From<&CartLine> for CartLineView {
    fn from(line: &CartLine) -> Self {
        let unit = line.product.unit_price();
        Self {
            id: line.product.id,
            title: truncate_text(&line.product.title, TITLE_MAX_CHARS),
            image: line.product.image.clone(),
            quantity: line.quantity,
            unit_price: unit.display(),
            line_price: Price::usd(line.line_total()).display(),
        }
    }
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        if cart.is_empty() {
            return Self::empty();
        }
        Self {
            items: cart.lines().iter().map(CartLineView::from).collect(),
            total: cart.total_price().display(),
            item_count: cart.item_count(),
        }
    }
}
