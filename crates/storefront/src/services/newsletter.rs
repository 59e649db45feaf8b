//! Newsletter subscription form.
//!
//! Subscriptions are acknowledged but not sent anywhere.

use thiserror::Error;

use markethub_core::{Email, EmailError};

/// Errors from the subscription form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NewsletterError {
    #[error("Please enter your email")]
    Empty,

    #[error("Please enter a valid email")]
    InvalidEmail(#[from] EmailError),
}

/// Validate a subscription request.
///
/// # Errors
///
/// Returns `NewsletterError::Empty` for a blank input and
/// `NewsletterError::InvalidEmail` for a malformed address.
pub fn subscribe(email: &str) -> Result<Email, NewsletterError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(NewsletterError::Empty);
    }
    let email = Email::parse(email)?;
    tracing::info!(domain = email.domain(), "Newsletter subscription");
    Ok(email)
}
