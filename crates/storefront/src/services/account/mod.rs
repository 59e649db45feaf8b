//! Simulated account service.
//!
//! Sign-in and sign-up only validate their forms; there is no credential
//! check and no password is ever stored. A successful attempt persists the
//! [`UserProfile`] under `<site>User` so the session survives restarts.

mod error;

pub use error::AccountError;

use chrono::Utc;
use secrecy::{ExposeSecret, SecretString};
use tracing::{info, warn};

use markethub_core::Email;

use crate::models::UserProfile;
use crate::store::{self, Namespace, SharedStore, Slot};

/// Minimum password length.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Sign-in form input.
#[derive(Debug, Clone)]
pub struct LoginForm {
    pub email: String,
    pub password: SecretString,
}

/// Sign-up form input.
#[derive(Debug, Clone)]
pub struct SignupForm {
    pub name: String,
    pub email: String,
    pub password: SecretString,
}

/// Holds the signed-in profile for one site.
pub struct AccountService {
    current: Option<UserProfile>,
    store: SharedStore,
    key: String,
}

impl AccountService {
    /// Create a signed-out service without reading the store.
    #[must_use]
    pub fn new(store: SharedStore, namespace: &Namespace) -> Self {
        Self {
            current: None,
            store,
            key: namespace.key(Slot::User),
        }
    }

    /// Restore the persisted profile, dropping it if it cannot be read.
    #[must_use]
    pub fn load_or_reset(store: SharedStore, namespace: &Namespace) -> Self {
        let mut service = Self::new(store, namespace);
        match store::load_json::<UserProfile>(service.store.as_ref(), &service.key) {
            Ok(profile) => service.current = profile,
            Err(e) => {
                warn!(key = %service.key, error = %e, "Discarding unreadable profile");
                if e.is_corrupt() {
                    store::forget(service.store.as_ref(), &service.key);
                }
            }
        }
        service
    }

    /// The signed-in profile, if any.
    #[must_use]
    pub const fn current(&self) -> Option<&UserProfile> {
        self.current.as_ref()
    }

    #[must_use]
    pub const fn is_signed_in(&self) -> bool {
        self.current.is_some()
    }

    /// Sign in with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::MissingFields` if a field is blank, or
    /// `AccountError::InvalidEmail` if the email is malformed.
    pub fn login(&mut self, form: &LoginForm) -> Result<&UserProfile, AccountError> {
        if is_blank(&form.email) || form.password.expose_secret().is_empty() {
            return Err(AccountError::MissingFields);
        }
        let email = Email::parse(form.email.trim())?;

        info!(domain = email.domain(), "Signed in");
        Ok(self.establish(None, email))
    }

    /// Create an account and sign in.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::MissingFields` if a field is blank,
    /// `AccountError::InvalidEmail` if the email is malformed, or
    /// `AccountError::WeakPassword` if the password is too short.
    pub fn sign_up(&mut self, form: &SignupForm) -> Result<&UserProfile, AccountError> {
        let password = form.password.expose_secret();
        if is_blank(&form.name) || is_blank(&form.email) || password.is_empty() {
            return Err(AccountError::MissingFields);
        }
        let email = Email::parse(form.email.trim())?;
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(AccountError::WeakPassword {
                min: MIN_PASSWORD_LENGTH,
            });
        }

        info!(domain = email.domain(), "Account created");
        Ok(self.establish(Some(form.name.trim().to_string()), email))
    }

    /// Sign out. Returns whether someone was signed in.
    pub fn sign_out(&mut self) -> bool {
        let was_signed_in = self.current.take().is_some();
        if was_signed_in {
            store::forget(self.store.as_ref(), &self.key);
        }
        was_signed_in
    }

    fn establish(&mut self, name: Option<String>, email: Email) -> &UserProfile {
        let profile = UserProfile {
            name,
            email,
            signed_in_at: Utc::now(),
        };
        store::persist(self.store.as_ref(), &self.key, &profile);
        self.current.insert(profile)
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::store::{KeyValueStore, MemoryStore};

    fn service() -> (AccountService, MemoryStore) {
        let store = MemoryStore::new();
        let service = AccountService::new(Arc::new(store.clone()), &Namespace::new("marvillyon"));
        (service, store)
    }

    fn login(email: &str, password: &str) -> LoginForm {
        LoginForm {
            email: email.to_string(),
            password: SecretString::from(password),
        }
    }

    fn signup(name: &str, email: &str, password: &str) -> SignupForm {
        SignupForm {
            name: name.to_string(),
            email: email.to_string(),
            password: SecretString::from(password),
        }
    }

    #[test]
    fn test_login_persists_profile() {
        let (mut service, store) = service();
        let profile = service.login(&login("ada@example.com", "pw")).unwrap();
        assert_eq!(profile.email.as_str(), "ada@example.com");
        assert!(profile.name.is_none());

        let stored = store.get("marvillyonUser").unwrap().unwrap();
        assert_eq!(stored["email"], "ada@example.com");
        assert!(stored.get("password").is_none());
    }

    #[test]
    fn test_login_requires_all_fields() {
        let (mut service, store) = service();
        assert_eq!(
            service.login(&login("", "pw")).unwrap_err(),
            AccountError::MissingFields
        );
        assert_eq!(
            service.login(&login("ada@example.com", "")).unwrap_err(),
            AccountError::MissingFields
        );
        assert_eq!(store.writes(), 0);
    }

    #[test]
    fn test_login_rejects_bad_email() {
        let (mut service, _) = service();
        let err = service.login(&login("ada@example", "pw")).unwrap_err();
        assert!(matches!(err, AccountError::InvalidEmail(_)));
        assert_eq!(err.to_string(), "Please enter a valid email");
        assert!(!service.is_signed_in());
    }

    #[test]
    fn test_sign_up_checks_password_length() {
        let (mut service, _) = service();
        let err = service
            .sign_up(&signup("Ada", "ada@example.com", "12345"))
            .unwrap_err();
        assert_eq!(err, AccountError::WeakPassword { min: 6 });
        assert_eq!(err.to_string(), "Password must be at least 6 characters");

        let profile = service
            .sign_up(&signup(" Ada ", "ada@example.com", "123456"))
            .unwrap();
        assert_eq!(profile.name.as_deref(), Some("Ada"));
    }

    #[test]
    fn test_sign_up_requires_name() {
        let (mut service, _) = service();
        assert_eq!(
            service
                .sign_up(&signup("  ", "ada@example.com", "secret123"))
                .unwrap_err(),
            AccountError::MissingFields
        );
    }

    #[test]
    fn test_profile_survives_reload() {
        let store = MemoryStore::new();
        let shared: SharedStore = Arc::new(store);
        let ns = Namespace::new("marvillyon");

        let mut service = AccountService::new(shared.clone(), &ns);
        service.login(&login("ada@example.com", "pw")).unwrap();

        let restored = AccountService::load_or_reset(shared, &ns);
        assert_eq!(
            restored.current().unwrap().email.as_str(),
            "ada@example.com"
        );
    }

    #[test]
    fn test_sign_out_forgets_profile() {
        let (mut service, store) = service();
        service.login(&login("ada@example.com", "pw")).unwrap();

        assert!(service.sign_out());
        assert!(!service.sign_out());
        assert!(store.get("marvillyonUser").unwrap().is_none());
    }

    #[test]
    fn test_corrupt_profile_is_dropped() {
        let store = MemoryStore::new();
        store
            .set("marvillyonUser", serde_json::json!({"email": "nope"}))
            .unwrap();
        let service =
            AccountService::load_or_reset(Arc::new(store.clone()), &Namespace::new("marvillyon"));
        assert!(!service.is_signed_in());
        assert!(store.get("marvillyonUser").unwrap().is_none());
    }
}
