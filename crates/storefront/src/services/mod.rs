//! Storefront services beyond cart and catalog state.
//!
//! # Services
//!
//! - `account` - Simulated sign-in / sign-up with a persisted profile
//! - `newsletter` - Newsletter subscription form handling

pub mod account;
pub mod newsletter;
