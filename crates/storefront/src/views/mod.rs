//! View models handed to the rendering surface.
//!
//! The core never produces markup. Each view here carries display-ready
//! strings (formatted prices, truncated titles, category labels) so any
//! front end can render them directly.

mod cart;
mod products;

pub use cart::{CartLineView, CartView};
pub use products::{ProductCardView, SALE_THRESHOLD, WishlistView};
