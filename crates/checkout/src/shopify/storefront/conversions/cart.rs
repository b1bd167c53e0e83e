//! Cart type conversion functions.

use naked_pineapple_core::{CartId, CartLineId, VariantId};
use tracing::warn;

use crate::shopify::types::{Cart, CartLine, CartUserError};

use super::super::queries::{add_checkout_cart_lines, cart_fields};

pub fn convert_cart(cart: cart_fields::CartNode) -> Cart {
    Cart {
        id: CartId::new(cart.id),
        total_quantity: cart.total_quantity,
        lines: cart
            .lines
            .into_nodes()
            .filter_map(convert_cart_line)
            .collect(),
    }
}

fn convert_cart_line(line: cart_fields::CartLineNode) -> Option<CartLine> {
    let Some(merchandise_id) = line.merchandise.id else {
        warn!(line_id = %line.id, "Cart line merchandise is not a product variant, skipping");
        return None;
    };

    Some(CartLine {
        id: CartLineId::new(line.id),
        merchandise_id: VariantId::new(merchandise_id),
        quantity: line.quantity,
    })
}

pub fn convert_user_error(error: add_checkout_cart_lines::UserError) -> CartUserError {
    CartUserError {
        code: error.code,
        field: error.field,
        message: error.message,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_cart_keeps_line_order() {
        let node: cart_fields::CartNode = serde_json::from_value(serde_json::json!({
            "id": "gid://shopify/Cart/c1?key=k",
            "totalQuantity": 3,
            "lines": { "edges": [
                { "node": { "id": "gid://shopify/CartLine/1", "quantity": 2,
                    "merchandise": { "id": "gid://shopify/ProductVariant/20" } } },
                { "node": { "id": "gid://shopify/CartLine/2", "quantity": 1,
                    "merchandise": { "id": "gid://shopify/ProductVariant/10" } } }
            ]}
        }))
        .unwrap();

        let cart = convert_cart(node);
        assert_eq!(cart.total_quantity, 3);
        let ids: Vec<_> = cart.lines.iter().map(|l| l.merchandise_id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["gid://shopify/ProductVariant/20", "gid://shopify/ProductVariant/10"]
        );
    }

    #[test]
    fn test_non_variant_merchandise_is_skipped() {
        let node: cart_fields::CartNode = serde_json::from_value(serde_json::json!({
            "id": "gid://shopify/Cart/c2",
            "totalQuantity": 1,
            "lines": { "edges": [
                { "node": { "id": "gid://shopify/CartLine/1", "quantity": 1, "merchandise": {} } }
            ]}
        }))
        .unwrap();

        assert!(convert_cart(node).lines.is_empty());
    }
}
