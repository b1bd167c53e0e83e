//! Availability and rotation behavior of the add-on widget.

#![allow(clippy::unwrap_used)]

use naked_pineapple_checkout::addon::availability::available_products;
use naked_pineapple_checkout::addon::rotation::{compute_next_index, select, wrap};
use naked_pineapple_checkout::addon::view::PLACEHOLDER_IMAGE_URL;
use naked_pineapple_checkout::{AddOutcome, AddonView};
use naked_pineapple_core::VariantId;
use naked_pineapple_integration_tests::{
    FakeCart, FakeCatalog, SnapshotSync, lettered, offered, product, snapshot, widget,
};
use proptest::prelude::*;

// =============================================================================
// Scenarios
// =============================================================================

#[tokio::test]
async fn test_initial_selection_is_first_product() {
    let widget = widget(FakeCatalog::new(lettered(3)), FakeCart::new(SnapshotSync::Immediate));
    widget.mount().await;

    assert_eq!(offered(&widget).as_deref(), Some("A"));
}

#[tokio::test]
async fn test_products_in_cart_are_skipped() {
    let cart = FakeCart::new(SnapshotSync::Immediate).with_lines(&["a1"]);
    let widget = widget(FakeCatalog::new(lettered(3)), cart);
    widget.mount().await;

    assert_eq!(offered(&widget).as_deref(), Some("B"));
}

#[tokio::test]
async fn test_only_product_already_in_cart_renders_nothing() {
    let cart = FakeCart::new(SnapshotSync::Immediate).with_lines(&["a1"]);
    let widget = widget(FakeCatalog::new(lettered(1)), cart);
    widget.mount().await;

    assert_eq!(widget.view(), AddonView::Hidden);
    assert!(widget.render_html().unwrap().is_empty());
}

#[tokio::test]
async fn test_added_product_is_not_offered_while_cart_lags() {
    let widget = widget(FakeCatalog::new(lettered(3)), FakeCart::new(SnapshotSync::Manual));
    widget.mount().await;

    let outcome = widget.add_current_selection().await;
    assert_eq!(
        outcome,
        AddOutcome::Added {
            merchandise_id: VariantId::new("a1")
        }
    );

    // Snapshot still empty.
    assert!(widget.cart().lines().contains(&VariantId::new("a1")));
    let lagging = offered(&widget);
    assert_eq!(lagging.as_deref(), Some("C"));

    widget.cart().sync();
    assert_eq!(offered(&widget), lagging);
}

#[tokio::test]
async fn test_two_products_added_one_not_offered_while_cart_lags() {
    let widget = widget(FakeCatalog::new(lettered(2)), FakeCart::new(SnapshotSync::Manual));
    widget.mount().await;

    widget.add_current_selection().await;
    assert_eq!(offered(&widget).as_deref(), Some("B"));
}

#[tokio::test]
async fn test_line_removed_before_cart_caught_up_is_offered_again() {
    let widget = widget(FakeCatalog::new(lettered(3)), FakeCart::new(SnapshotSync::Manual));
    widget.mount().await;

    widget.add_current_selection().await;
    widget.cart().remove("a1");
    assert!(widget.cart().lines().is_empty());

    // The first render cannot tell a removal from a late snapshot.
    widget.view();
    assert_eq!(widget.state().awaiting_cart(), vec![&VariantId::new("a1")]);
    widget.view();
    assert!(widget.state().awaiting_cart().is_empty());

    let available: Vec<_> = widget.available_products().into_iter().map(|p| p.title).collect();
    assert_eq!(available, vec!["A", "B", "C"]);
    assert_eq!(offered(&widget).as_deref(), Some("B"));

    // Adding B moves on to A.
    widget.add_current_selection().await;
    widget.cart().sync();
    assert_eq!(offered(&widget).as_deref(), Some("A"));
}

#[tokio::test]
async fn test_add_advances_one_step_in_remaining_products() {
    let widget = widget(FakeCatalog::new(lettered(3)), FakeCart::new(SnapshotSync::Immediate));
    widget.mount().await;

    widget.add_current_selection().await;
    // Remaining [B, C]; the pointer moves from 0 to 1.
    assert_eq!(widget.state().selected_index(), 1);
    assert_eq!(offered(&widget).as_deref(), Some("C"));

    widget.add_current_selection().await;
    assert_eq!(offered(&widget).as_deref(), Some("B"));

    widget.add_current_selection().await;
    assert_eq!(widget.view(), AddonView::Hidden);
    assert_eq!(widget.state().selected_index(), 0);
}

#[tokio::test]
async fn test_removed_product_is_offered_again() {
    let widget = widget(FakeCatalog::new(lettered(2)), FakeCart::new(SnapshotSync::Immediate));
    widget.mount().await;

    widget.add_current_selection().await;
    widget.add_current_selection().await;
    assert_eq!(widget.view(), AddonView::Hidden);

    widget.cart().remove("a1");
    assert_eq!(offered(&widget).as_deref(), Some("A"));
}

#[tokio::test]
async fn test_missing_image_uses_placeholder() {
    let mut products = lettered(3);
    products[2].featured_image = None;
    let cart = FakeCart::new(SnapshotSync::Immediate).with_lines(&["a1", "b1"]);
    let widget = widget(FakeCatalog::new(products), cart);
    widget.mount().await;

    let view = widget.view();
    let card = view.card().unwrap();
    assert_eq!(card.title, "C");
    assert_eq!(card.image_url, PLACEHOLDER_IMAGE_URL);
}

#[tokio::test]
async fn test_product_without_variant_is_never_offered() {
    let mut ghost = product("Ghost", "g1");
    ghost.primary_variant = None;
    let widget = widget(
        FakeCatalog::new(vec![ghost, product("Real", "r1")]),
        FakeCart::new(SnapshotSync::Immediate),
    );
    widget.mount().await;

    assert_eq!(offered(&widget).as_deref(), Some("Real"));
    let available: Vec<_> = widget.available_products().into_iter().map(|p| p.title).collect();
    assert_eq!(available, vec!["Real"]);
}

// =============================================================================
// Properties
// =============================================================================

fn cart_ids(mask: &[bool]) -> Vec<String> {
    mask.iter()
        .enumerate()
        .filter(|(_, in_cart)| **in_cart)
        .map(|(i, _)| format!("{}1", char::from(b'a' + u8::try_from(i).unwrap())))
        .collect()
}

proptest! {
    #[test]
    fn prop_filter_keeps_catalog_order(mask in proptest::collection::vec(any::<bool>(), 1..8)) {
        let products = lettered(mask.len());
        let ids = cart_ids(&mask);
        let cart = snapshot(&ids.iter().map(String::as_str).collect::<Vec<_>>());

        let available = available_products(&products, &cart);
        let expected: Vec<_> = products
            .iter()
            .zip(&mask)
            .filter(|(_, in_cart)| !**in_cart)
            .map(|(p, _)| p.title.clone())
            .collect();

        prop_assert_eq!(
            available.iter().map(|p| p.title.clone()).collect::<Vec<_>>(),
            expected
        );
    }

    #[test]
    fn prop_pointer_always_selects(len in 1..10usize, pointer in any::<usize>()) {
        let products = lettered(len);
        let available = available_products(&products, &snapshot(&[]));

        prop_assert!(wrap(pointer, len) < len);
        prop_assert!(select(&available, pointer).is_some());
    }

    #[test]
    fn prop_next_index_skips_added_product(
        mask in proptest::collection::vec(any::<bool>(), 1..8),
        prior in 0..16usize,
    ) {
        let products = lettered(mask.len());
        let ids = cart_ids(&mask);
        let before = snapshot(&ids.iter().map(String::as_str).collect::<Vec<_>>());
        let available = available_products(&products, &before);
        prop_assume!(!available.is_empty());

        let added = select(&available, prior).unwrap().primary_variant_id().unwrap().clone();
        let next = compute_next_index(&products, &before, &added, prior);

        let mut after_ids = ids.clone();
        after_ids.push(added.as_str().to_string());
        let after = snapshot(&after_ids.iter().map(String::as_str).collect::<Vec<_>>());
        let remaining = available_products(&products, &after);

        if remaining.is_empty() {
            prop_assert_eq!(next, 0);
        } else {
            prop_assert!(next < remaining.len());
            let chosen = select(&remaining, next).unwrap();
            prop_assert_ne!(chosen.primary_variant_id(), Some(&added));
        }
    }
}
