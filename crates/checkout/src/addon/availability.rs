//! Availability filter: which fetched products can still be offered.

use naked_pineapple_core::VariantId;

use crate::host::CartSnapshot;
use crate::shopify::types::Product;

/// Products whose primary variant is not already in the cart, in catalog order.
///
/// Products without a primary variant are never available. This is a pure
/// projection and is recomputed on every render.
#[must_use]
pub fn available_products<'a>(products: &'a [Product], cart: &CartSnapshot) -> Vec<&'a Product> {
    filter_products(products, cart, None)
}

/// Like [`available_products`], but also treats `pending` as already in the
/// cart. Used to look ahead past a mutation the snapshot has not caught up with.
#[must_use]
pub fn available_products_excluding<'a>(
    products: &'a [Product],
    cart: &CartSnapshot,
    pending: &VariantId,
) -> Vec<&'a Product> {
    filter_products(products, cart, Some(pending))
}

fn filter_products<'a>(
    products: &'a [Product],
    cart: &CartSnapshot,
    pending: Option<&VariantId>,
) -> Vec<&'a Product> {
    let in_cart = cart.id_set();

    products
        .iter()
        .filter(|product| {
            product.primary_variant_id().is_some_and(|variant_id| {
                !in_cart.contains(variant_id) && pending != Some(variant_id)
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::addon::test_support::{cart, product, product_without_variant};

    fn titles(products: &[&Product]) -> Vec<String> {
        products.iter().map(|p| p.title.clone()).collect()
    }

    #[test]
    fn test_empty_cart_keeps_everything_in_order() {
        let products = vec![product("A", "a1"), product("B", "b1"), product("C", "c1")];
        let available = available_products(&products, &cart(&[]));
        assert_eq!(titles(&available), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_excludes_products_in_cart() {
        let products = vec![product("A", "a1"), product("B", "b1"), product("C", "c1")];
        let available = available_products(&products, &cart(&["c1", "a1"]));
        assert_eq!(titles(&available), vec!["B"]);
    }

    #[test]
    fn test_product_without_variant_is_never_available() {
        let products = vec![product_without_variant("Ghost"), product("B", "b1")];
        let available = available_products(&products, &cart(&[]));
        assert_eq!(titles(&available), vec!["B"]);
    }

    #[test]
    fn test_unrelated_cart_lines_are_ignored() {
        let products = vec![product("A", "a1")];
        let available = available_products(&products, &cart(&["zz9"]));
        assert_eq!(titles(&available), vec!["A"]);
    }

    #[test]
    fn test_excluding_pending_mutation() {
        let products = vec![product("A", "a1"), product("B", "b1"), product("C", "c1")];
        let pending = VariantId::from("b1");
        let available = available_products_excluding(&products, &cart(&["a1"]), &pending);
        assert_eq!(titles(&available), vec!["C"]);
    }

    #[test]
    fn test_duplicate_variant_ids_filter_together() {
        let products = vec![product("A", "a1"), product("A again", "a1")];
        assert!(available_products(&products, &cart(&["a1"])).is_empty());
    }
}
