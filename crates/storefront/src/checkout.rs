//! Simulated checkout.
//!
//! No payment is taken. A submitted shipping form is validated, a fixed
//! processing delay elapses, and the cart is cleared.
//!
//! ```text
//! Idle -> Validating -> Processing -> Completed
//!             |              |
//!             v              v
//!          Rejected      Cancelled
//! ```
//!
//! A rejected or cancelled checkout never touches the cart.

use std::future::Future;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, instrument};

use markethub_core::{CheckoutStatus, OrderNumber, Price};

use crate::cart::Cart;

/// Errors that end a checkout attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    /// Required shipping fields were left blank.
    #[error("Please fill in all fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    /// There is nothing to check out.
    #[error("Your cart is empty!")]
    EmptyCart,

    /// The processing delay was interrupted.
    #[error("Checkout was cancelled")]
    Cancelled,
}

/// Shipping details entered at checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingForm {
    pub name: String,
    pub address: String,
    pub phone: String,
}

impl ShippingForm {
    /// Names of the fields that are blank.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("name", &self.name),
            ("address", &self.address),
            ("phone", &self.phone),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect()
    }
}

/// Receipt for a completed checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderConfirmation {
    pub order_number: OrderNumber,
    pub total: Price,
    pub item_count: u64,
    pub ship_to: String,
    pub placed_at: DateTime<Utc>,
}

/// The checkout state machine.
#[derive(Debug, Clone)]
pub struct Checkout {
    status: CheckoutStatus,
    delay: Duration,
}

impl Checkout {
    /// Create a checkout whose processing step takes `delay`.
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self {
            status: CheckoutStatus::Idle,
            delay,
        }
    }

    #[must_use]
    pub const fn status(&self) -> CheckoutStatus {
        self.status
    }

    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Run a checkout to completion.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::MissingFields` or `CheckoutError::EmptyCart`
    /// when validation fails.
    pub async fn submit(
        &mut self,
        form: &ShippingForm,
        cart: &mut Cart,
    ) -> Result<OrderConfirmation, CheckoutError> {
        self.submit_until(form, cart, std::future::pending()).await
    }

    /// Run a checkout, aborting if `cancel` resolves before processing ends.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::MissingFields` or `CheckoutError::EmptyCart`
    /// when validation fails, and `CheckoutError::Cancelled` if `cancel`
    /// wins the race against the processing delay.
    pub async fn submit_until<C>(
        &mut self,
        form: &ShippingForm,
        cart: &mut Cart,
        cancel: C,
    ) -> Result<OrderConfirmation, CheckoutError>
    where
        C: Future<Output = ()>,
    {
        self.begin(form, cart)?;
        self.process(form, cart, cancel).await
    }

    /// Validate the form against the cart and move to `Processing`.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::EmptyCart` or `CheckoutError::MissingFields`
    /// and moves to `Rejected`.
    pub(crate) fn begin(
        &mut self,
        form: &ShippingForm,
        cart: &Cart,
    ) -> Result<(), CheckoutError> {
        if !self.status.accepts_submit() {
            // A previous attempt's future was dropped mid-flight.
            tracing::debug!(status = %self.status, "Restarting abandoned checkout");
        }

        self.status = CheckoutStatus::Validating;
        if let Err(e) = validate(form, cart) {
            self.status = CheckoutStatus::Rejected;
            info!(error = %e, "Checkout rejected");
            return Err(e);
        }

        self.status = CheckoutStatus::Processing;
        Ok(())
    }

    /// Wait out the processing delay, then place the order and clear the
    /// cart. Only valid after a successful [`Checkout::begin`].
    #[instrument(skip_all, fields(items = cart.item_count()))]
    pub(crate) async fn process<C>(
        &mut self,
        form: &ShippingForm,
        cart: &mut Cart,
        cancel: C,
    ) -> Result<OrderConfirmation, CheckoutError>
    where
        C: Future<Output = ()>,
    {
        debug_assert_eq!(self.status, CheckoutStatus::Processing);
        tokio::select! {
            () = tokio::time::sleep(self.delay) => {}
            () = cancel => {
                self.status = CheckoutStatus::Cancelled;
                info!("Checkout cancelled");
                return Err(CheckoutError::Cancelled);
            }
        }

        let confirmation = OrderConfirmation {
            order_number: OrderNumber::generate(),
            total: cart.total_price(),
            item_count: cart.item_count(),
            ship_to: form.name.trim().to_string(),
            placed_at: Utc::now(),
        };
        cart.clear();
        self.status = CheckoutStatus::Completed;

        info!(
            order_number = %confirmation.order_number,
            total = %confirmation.total,
            "Checkout completed"
        );
        Ok(confirmation)
    }
}

fn validate(form: &ShippingForm, cart: &Cart) -> Result<(), CheckoutError> {
    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }
    let missing = form.missing_fields();
    if !missing.is_empty() {
        return Err(CheckoutError::MissingFields(missing));
    }
    Ok(())
}
