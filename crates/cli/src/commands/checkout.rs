//! Checkout command.

use markethub_storefront::AppError;
use markethub_storefront::checkout::ShippingForm;

use super::Session;

/// Place an order for the cart. Ctrl-C during processing cancels it.
///
/// # Errors
///
/// Returns `AppError::Checkout` if the cart is empty, a field is blank, or
/// the order is cancelled.
pub async fn place_order(
    session: &mut Session,
    name: String,
    address: String,
    phone: String,
) -> Result<(), AppError> {
    let form = ShippingForm {
        name,
        address,
        phone,
    };

    let cancel = async {
        if tokio::signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }
    };

    let confirmation = session.storefront.checkout_until(&form, cancel).await?;

    #[allow(clippy::print_stdout)]
    {
        println!("Order number: {}", confirmation.order_number);
        println!(
            "{} item(s), {} charged, shipping to {}",
            confirmation.item_count, confirmation.total, confirmation.ship_to
        );
    }
    Ok(())
}
