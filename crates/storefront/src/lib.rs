//! MarketHub storefront state core.
//!
//! Client-side state for a small storefront: a product catalog fetched from a
//! REST endpoint, a cart and wishlist persisted through a key-value store, a
//! simulated account flow and a simulated checkout. Rendering is left to the
//! caller, which receives view models through [`state::RenderSurface`].
//!
//! # Modules
//!
//! - [`store`] - Key-value persistence (in-memory and file-backed)
//! - [`cart`] / [`wishlist`] - Persisted shopping state
//! - [`catalog`] - Product cache and the HTTP product source
//! - [`checkout`] - Simulated checkout state machine
//! - [`services`] - Account and newsletter forms
//! - [`views`] - Display-ready view models
//! - [`state`] - The [`Storefront`](state::Storefront) session tying it together

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod error;
pub mod filters;
pub mod models;
pub mod services;
pub mod state;
pub mod store;
pub mod views;
pub mod wishlist;

pub use error::{AppError, Result};
pub use state::{NullSurface, RenderSurface, Storefront};
