//! Account commands.

use secrecy::SecretString;

use markethub_storefront::AppError;
use markethub_storefront::services::account::{LoginForm, SignupForm};

use super::Session;

/// Print the signed-in profile.
#[allow(clippy::print_stdout)]
pub fn show(session: &Session) {
    match session.storefront.user() {
        Some(user) => println!(
            "Signed in as {} <{}> since {}",
            user.display_name(),
            user.email,
            user.signed_in_at.format("%Y-%m-%d %H:%M UTC")
        ),
        None => println!("Not signed in"),
    }
}

/// Sign in.
///
/// # Errors
///
/// Returns `AppError::Account` if the form is rejected.
pub fn login(session: &mut Session, email: String, password: String) -> Result<(), AppError> {
    let form = LoginForm {
        email,
        password: SecretString::from(password),
    };
    session.storefront.sign_in(&form)?;
    Ok(())
}

/// Create an account.
///
/// # Errors
///
/// Returns `AppError::Account` if the form is rejected.
pub fn signup(
    session: &mut Session,
    name: String,
    email: String,
    password: String,
) -> Result<(), AppError> {
    let form = SignupForm {
        name,
        email,
        password: SecretString::from(password),
    };
    session.storefront.sign_up(&form)?;
    Ok(())
}

/// Sign out.
pub fn logout(session: &mut Session) {
    if !session.storefront.sign_out() {
        tracing::info!("Nobody was signed in");
    }
}
