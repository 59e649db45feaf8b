//! Domain models for the storefront.
//!
//! - [`product`] - Catalog products as fetched from the product API
//! - [`user`] - The signed-in (simulated) account
//! - [`notification`] - User-facing messages pushed to the rendering surface

pub mod notification;
pub mod product;
pub mod user;

pub use notification::Notification;
pub use product::Product;
pub use user::UserProfile;
