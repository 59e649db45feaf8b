//! Account domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use markethub_core::Email;

/// The signed-in account, as persisted under `<site>User`.
///
/// Authentication is simulated: no password or credential is ever stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Display name, present when the account came from sign-up.
    pub name: Option<String>,
    pub email: Email,
    pub signed_in_at: DateTime<Utc>,
}

impl UserProfile {
    /// Name to greet the user with, falling back to the email local part.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| self.email.local_part())
    }
}
