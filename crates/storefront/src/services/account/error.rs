//! Account error types.

use thiserror::Error;

/// Errors that can occur when signing in or up.
///
/// All of them are input problems the user can correct.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccountError {
    /// A required field was left blank.
    #[error("Please fill in all fields")]
    MissingFields,

    /// Invalid email format.
    #[error("Please enter a valid email")]
    InvalidEmail(#[from] markethub_core::EmailError),

    /// Password too short.
    #[error("Password must be at least {min} characters")]
    WeakPassword { min: usize },
}
