//! Catalog, cart and wishlist commands.

use markethub_core::ProductId;
use markethub_storefront::filters::{STAR_SLOTS, format_category};
use markethub_storefront::views::{CartView, ProductCardView};

use super::{CommandError, Session};

/// List products, optionally filtered by category or search query.
///
/// # Errors
///
/// Returns an error if the catalog cannot be loaded.
pub async fn catalog(
    session: &mut Session,
    category: Option<&str>,
    search: Option<&str>,
) -> Result<(), CommandError> {
    session.load_catalog().await?;
    if let Some(query) = search {
        session.storefront.search(query);
    } else if let Some(category) = category {
        session.storefront.show_category(category);
    }

    let cards = session.storefront.product_cards();
    let categories: Vec<String> = session
        .storefront
        .catalog()
        .categories()
        .iter()
        .map(String::as_str)
        .map(format_category)
        .collect();

    #[allow(clippy::print_stdout)]
    {
        println!("Categories: {}", categories.join(", "));
        if cards.is_empty() {
            println!("No products found");
        }
        for card in &cards {
            print_card(card);
        }
    }
    Ok(())
}

#[allow(clippy::print_stdout)]
fn print_card(card: &ProductCardView) {
    let stars = "★".repeat(usize::from(card.full_stars))
        + &"☆".repeat(usize::from(STAR_SLOTS.saturating_sub(card.full_stars)));
    let heart = if card.in_wishlist { " ♥" } else { "" };
    let price = card.old_price.as_ref().map_or_else(
        || card.price.clone(),
        |old| format!("{} (was {old}, SALE)", card.price),
    );

    println!("#{:<3} {}{heart}", card.id.as_i32(), card.title);
    println!(
        "     {} | {price} | {stars} {} ({} reviews)",
        card.category, card.rating, card.reviews
    );
}

/// Print the cart.
pub fn show_cart(session: &Session) {
    let view = CartView::from(session.storefront.cart());

    #[allow(clippy::print_stdout)]
    {
        if view.is_empty() {
            println!("Your cart is empty");
            return;
        }
        for line in &view.items {
            println!(
                "#{:<3} {} x{} @ {} = {}",
                line.id.as_i32(), line.title, line.quantity, line.unit_price, line.line_price
            );
        }
        println!("Total: {} ({} items)", view.total, view.item_count);
    }
}

/// Add one unit of a product to the cart.
///
/// # Errors
///
/// Returns an error if the catalog cannot be loaded.
pub async fn add_to_cart(session: &mut Session, id: i32) -> Result<(), CommandError> {
    session.load_catalog().await?;
    if session.storefront.add_to_cart(ProductId::new(id)).is_none() {
        tracing::warn!(product_id = id, "No such product");
    }
    Ok(())
}

/// Change a cart line's quantity.
pub fn update_quantity(session: &mut Session, id: i32, delta: i64) {
    let change = session.storefront.update_quantity(ProductId::new(id), delta);
    tracing::debug!(product_id = id, ?change, "Quantity updated");
}

/// Remove a cart line.
pub fn remove_from_cart(session: &mut Session, id: i32) {
    if !session.storefront.remove_from_cart(ProductId::new(id)) {
        tracing::warn!(product_id = id, "Product is not in the cart");
    }
}

/// Print the wishlist.
pub fn show_wishlist(session: &Session) {
    let entries = session.storefront.wishlist().entries();

    #[allow(clippy::print_stdout)]
    {
        if entries.is_empty() {
            println!("Your wishlist is empty");
        }
        for entry in entries {
            let card = ProductCardView::new(&entry.product, true);
            println!("#{:<3} {} {}", card.id.as_i32(), card.title, card.price);
        }
    }
}

/// Like or unlike a product.
///
/// # Errors
///
/// Returns an error if the catalog cannot be loaded.
pub async fn toggle_wishlist(session: &mut Session, id: i32) -> Result<(), CommandError> {
    let product_id = ProductId::new(id);
    // Unliking a product that left the catalog needs no fetch
    if !session.storefront.wishlist().contains(product_id) {
        session.load_catalog().await?;
    }
    if session.storefront.toggle_wishlist(product_id).is_none() {
        tracing::warn!(product_id = id, "No such product");
    }
    Ok(())
}
