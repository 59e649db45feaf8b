//! Cart and wishlist laws over a shared in-memory store.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use rust_decimal::Decimal;

use markethub_core::ProductId;
use markethub_integration_tests::product;
use markethub_storefront::cart::{Cart, LineChange};
use markethub_storefront::store::{MemoryStore, Namespace};
use markethub_storefront::wishlist::Wishlist;

fn cart() -> (Cart, MemoryStore) {
    let store = MemoryStore::new();
    let cart = Cart::new(Arc::new(store.clone()), &Namespace::new("detrend"));
    (cart, store)
}

// =============================================================================
// Cart
// =============================================================================

#[test]
fn test_repeated_adds_accumulate() {
    for calls in 1..=12_u32 {
        let (mut cart, _) = cart();
        let p = product(7, 1999);
        for _ in 0..calls {
            cart.add(&p);
        }

        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.get(p.id).unwrap().quantity, calls);
        assert_eq!(cart.total(), Decimal::new(1999, 2) * Decimal::from(calls));
    }
}

#[test]
fn test_add_twice_scenario() {
    let (mut cart, _) = cart();
    let p = product(1, 1000);

    cart.add(&p);
    assert_eq!(cart.add(&p), 2);

    assert_eq!(cart.lines().len(), 1);
    assert_eq!(cart.get(p.id).unwrap().quantity, 2);
    assert_eq!(cart.total_price().display(), "$20.00");
}

#[test]
fn test_negative_full_quantity_removes_line() {
    let (mut cart, _) = cart();
    let p = product(3, 500);
    for _ in 0..4 {
        cart.add(&p);
    }

    assert_eq!(cart.update_quantity(p.id, -4), LineChange::Removed);
    assert!(!cart.contains(p.id));
    assert!(cart.is_empty());
}

#[test]
fn test_remove_is_idempotent() {
    let (mut once, _) = cart();
    let (mut twice, _) = cart();
    for c in [&mut once, &mut twice] {
        c.add(&product(1, 100));
        c.add(&product(2, 200));
    }

    once.remove(ProductId::new(1));
    twice.remove(ProductId::new(1));
    twice.remove(ProductId::new(1));

    assert_eq!(once.lines(), twice.lines());
    assert_eq!(once.total(), twice.total());
}

#[test]
fn test_lines_keep_first_added_order() {
    let (mut cart, _) = cart();
    for id in [4, 2, 9, 2, 4] {
        cart.add(&product(id, 100));
    }

    let ids: Vec<i32> = cart.lines().iter().map(|l| l.product.id.as_i32()).collect();
    assert_eq!(ids, vec![4, 2, 9]);
    assert_eq!(cart.item_count(), 5);
}

#[test]
fn test_total_rounds_to_cents() {
    let (mut cart, _) = cart();
    let mut p = product(1, 0);
    p.price = Decimal::new(3335, 3); // 3.335
    cart.add(&p);

    assert_eq!(cart.total(), Decimal::new(334, 2));
}

// =============================================================================
// Wishlist
// =============================================================================

#[test]
fn test_toggle_scenario() {
    let mut wishlist = Wishlist::new(Arc::new(MemoryStore::new()), &Namespace::new("marvillyon"));
    let p = product(5, 1000);

    assert!(wishlist.toggle(&p));
    assert!(wishlist.contains(p.id));
    assert_eq!(wishlist.count(), 1);

    assert!(!wishlist.toggle(&p));
    assert!(!wishlist.contains(p.id));
    assert_eq!(wishlist.count(), 0);
}

#[test]
fn test_toggle_is_its_own_inverse() {
    let mut wishlist = Wishlist::new(Arc::new(MemoryStore::new()), &Namespace::new("marvillyon"));
    for id in [1, 2, 3] {
        wishlist.toggle(&product(id, 100));
    }
    let before = wishlist.ids();

    for id in [2, 8] {
        let p = product(id, 100);
        wishlist.toggle(&p);
        wishlist.toggle(&p);
        assert_eq!(wishlist.ids().len(), before.len());
        for member in &before {
            assert!(wishlist.contains(*member));
        }
    }
}

#[test]
fn test_cart_and_wishlist_share_a_store_without_clashing() {
    let store = MemoryStore::new();
    let ns = Namespace::new("detrend");
    let mut cart = Cart::new(Arc::new(store.clone()), &ns);
    let mut wishlist = Wishlist::new(Arc::new(store.clone()), &ns);

    cart.add(&product(1, 100));
    wishlist.toggle(&product(2, 100));

    let cart = Cart::load(Arc::new(store.clone()), &ns).unwrap();
    let wishlist = Wishlist::load(Arc::new(store), &ns).unwrap();
    assert!(cart.contains(ProductId::new(1)));
    assert!(!cart.contains(ProductId::new(2)));
    assert!(wishlist.contains(ProductId::new(2)));
    assert!(!wishlist.contains(ProductId::new(1)));
}
