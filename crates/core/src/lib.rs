//! MarketHub Core - Shared domain types.
//!
//! This crate provides the types used across all MarketHub components:
//! - `storefront` - Cart, wishlist, catalog and checkout state
//! - `cli` - Terminal front end driving the storefront state
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no persistence, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails, and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
