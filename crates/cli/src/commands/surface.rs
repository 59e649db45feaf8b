//! Terminal rendering surface.

use markethub_core::CheckoutStatus;
use markethub_storefront::RenderSurface;
use markethub_storefront::models::Notification;
use markethub_storefront::views::{CartView, WishlistView};

/// Prints notifications and cart/wishlist summaries to stdout.
///
/// The product grid is printed by the `catalog` command itself so that
/// commands which only load the catalog to look a product up stay quiet.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalSurface;

#[allow(clippy::print_stdout)]
impl RenderSurface for TerminalSurface {
    fn cart_changed(&mut self, cart: &CartView) {
        println!("Cart: {} item(s), total {}", cart.item_count, cart.total);
    }

    fn wishlist_changed(&mut self, wishlist: &WishlistView) {
        println!("Wishlist: {} item(s)", wishlist.count);
    }

    fn notify(&mut self, notification: &Notification) {
        println!("{notification}");
    }

    fn checkout_changed(&mut self, status: CheckoutStatus) {
        if status == CheckoutStatus::Processing {
            println!("Processing payment...");
        }
    }
}
