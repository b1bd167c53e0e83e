//! Rotation selector: a single pointer into the available products.
//!
//! The pointer is always read modulo the length of the *current* available
//! list, so it can never address a product that is already in the cart.

use naked_pineapple_core::VariantId;

use crate::host::CartSnapshot;
use crate::shopify::types::Product;

use super::availability::available_products_excluding;

/// The product shown for `pointer`, or `None` when nothing is available.
#[must_use]
pub fn select<'a>(available: &[&'a Product], pointer: usize) -> Option<&'a Product> {
    available.get(wrap(pointer, available.len())).copied()
}

/// `pointer mod max(1, len)`.
#[must_use]
pub const fn wrap(pointer: usize, len: usize) -> usize {
    if len == 0 { 0 } else { pointer % len }
}

/// Pointer to use after an add attempt for `just_added`.
///
/// The available list is recomputed as if `just_added` were already in the
/// cart, because `cart_after_mutation` may not reflect the mutation yet. The
/// pointer then advances exactly one step within that list, wrapping to the
/// start; an empty list resets it to zero.
#[must_use]
pub fn compute_next_index(
    products: &[Product],
    cart_after_mutation: &CartSnapshot,
    just_added: &VariantId,
    prior_index: usize,
) -> usize {
    let remaining = available_products_excluding(products, cart_after_mutation, just_added);

    if remaining.is_empty() {
        0
    } else {
        prior_index.wrapping_add(1) % remaining.len()
    }
}
