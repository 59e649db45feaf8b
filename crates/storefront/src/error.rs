//! Unified error handling.
//!
//! Every storefront operation returns `Result<T, AppError>`. Front ends turn
//! an error into a [`Notification`] with [`AppError::notification`], which
//! keeps storage and network details out of user-facing text.

use thiserror::Error;

use crate::catalog::CatalogError;
use crate::checkout::CheckoutError;
use crate::config::ConfigError;
use crate::models::Notification;
use crate::services::account::AccountError;
use crate::services::newsletter::NewsletterError;
use crate::store::StoreError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Persistent store operation failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Catalog load failed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Checkout did not complete.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Sign-in or sign-up form was rejected.
    #[error("Account error: {0}")]
    Account(#[from] AccountError),

    /// Newsletter form was rejected.
    #[error("Newsletter error: {0}")]
    Newsletter(#[from] NewsletterError),

    /// Configuration could not be loaded.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

impl AppError {
    /// The message to show the user for this error.
    ///
    /// Form and checkout errors carry their own wording. Infrastructure
    /// failures are logged and replaced with a generic message.
    #[must_use]
    pub fn notification(&self) -> Notification {
        let message = match self {
            Self::Checkout(err) => err.to_string(),
            Self::Account(err) => err.to_string(),
            Self::Newsletter(err) => err.to_string(),
            Self::Catalog(CatalogError::LoadInFlight) => "Products are still loading".to_string(),
            Self::Catalog(err) => {
                tracing::error!(error = %err, "Catalog load failed");
                "Couldn't load products. Please try again.".to_string()
            }
            Self::Store(err) => {
                tracing::error!(error = %err, "Store operation failed");
                "Something went wrong saving your data".to_string()
            }
            Self::Config(err) => {
                tracing::error!(error = %err, "Invalid configuration");
                "The store is misconfigured".to_string()
            }
        };
        Notification::info(message)
    }

    /// Whether retrying the same action may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Catalog(err) => err.is_retryable(),
            Self::Checkout(CheckoutError::Cancelled) | Self::Store(_) => true,
            _ => false,
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use markethub_core::NotificationKind;

    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::from(CheckoutError::EmptyCart);
        assert_eq!(err.to_string(), "Checkout error: Your cart is empty!");
    }

    #[test]
    fn test_form_errors_keep_their_message() {
        let note = AppError::from(AccountError::WeakPassword { min: 6 }).notification();
        assert_eq!(note.kind, NotificationKind::Info);
        assert_eq!(note.message, "Password must be at least 6 characters");

        let note = AppError::from(NewsletterError::Empty).notification();
        assert_eq!(note.message, "Please enter your email");
    }

    #[test]
    fn test_internal_details_are_hidden() {
        let err = AppError::from(CatalogError::Status {
            status: 503,
            body: "upstream trace id 42".to_string(),
        });
        let note = err.notification();
        assert!(!note.message.contains("503"));
        assert!(!note.message.contains("trace"));
        assert!(err.is_retryable());

        let err = AppError::from(StoreError::Unavailable("disk full".to_string()));
        assert!(!err.notification().message.contains("disk"));
    }

    #[test]
    fn test_retryable() {
        assert!(!AppError::from(CatalogError::LoadInFlight).is_retryable());
        assert!(AppError::from(CheckoutError::Cancelled).is_retryable());
        assert!(!AppError::from(CheckoutError::EmptyCart).is_retryable());
    }
}
