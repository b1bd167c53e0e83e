//! Product type conversion functions.

use naked_pineapple_core::{Price, ProductId, VariantId};
use tracing::warn;

use crate::shopify::types::{Image, PrimaryVariant, Product};

use super::super::queries::{common, get_checkout_products};

pub fn convert_image(image: common::Image) -> Image {
    Image {
        url: image.url,
        alt_text: image.alt_text.filter(|alt| !alt.trim().is_empty()),
    }
}

/// Convert the first variant edge into a [`PrimaryVariant`].
///
/// A variant whose price cannot be parsed is dropped, which makes the product
/// unavailable to the recommender rather than showing a broken price.
fn convert_primary_variant(
    product_id: &str,
    variants: get_checkout_products::Connection<get_checkout_products::VariantNode>,
) -> Option<PrimaryVariant> {
    let variant = variants.into_nodes().next()?;

    match Price::parse(&variant.price.amount, &variant.price.currency_code) {
        Ok(price) => Some(PrimaryVariant {
            id: VariantId::new(variant.id),
            price,
        }),
        Err(e) => {
            warn!(
                product_id = %product_id,
                variant_id = %variant.id,
                error = %e,
                "Dropping variant with unparseable price"
            );
            None
        }
    }
}

pub fn convert_product(product: get_checkout_products::ProductNode) -> Product {
    let primary_variant = convert_primary_variant(&product.id, product.variants);

    Product {
        id: ProductId::new(product.id),
        title: product.title,
        handle: product.handle,
        tags: product.tags,
        featured_image: product.featured_image.map(convert_image),
        primary_variant,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use naked_pineapple_core::CurrencyCode;
    use rust_decimal::Decimal;

    use super::*;

    fn node(variants: serde_json::Value) -> get_checkout_products::ProductNode {
        serde_json::from_value(serde_json::json!({
            "id": "gid://shopify/Product/9",
            "title": "Gift Wrap",
            "handle": "gift-wrap",
            "tags": ["checkout-product", "gift"],
            "featuredImage": { "url": "https://cdn.example.com/wrap.png", "altText": "" },
            "variants": variants
        }))
        .unwrap()
    }

    #[test]
    fn test_convert_product_with_variant() {
        let product = convert_product(node(serde_json::json!({
            "edges": [{ "node": {
                "id": "gid://shopify/ProductVariant/91",
                "price": { "amount": "3.50", "currencyCode": "EUR" }
            }}]
        })));

        let variant = product.primary_variant.unwrap();
        assert_eq!(variant.id.as_str(), "gid://shopify/ProductVariant/91");
        assert_eq!(variant.price.amount, Decimal::new(350, 2));
        assert_eq!(variant.price.currency_code, CurrencyCode::EUR);
        assert_eq!(product.tags, vec!["checkout-product", "gift"]);
    }

    #[test]
    fn test_blank_alt_text_becomes_none() {
        let product = convert_product(node(serde_json::json!({ "edges": [] })));
        let image = product.featured_image.unwrap();
        assert_eq!(image.url, "https://cdn.example.com/wrap.png");
        assert!(image.alt_text.is_none());
    }

    #[test]
    fn test_product_without_variants() {
        let product = convert_product(node(serde_json::json!({ "edges": [] })));
        assert!(product.primary_variant.is_none());
        assert!(product.primary_variant_id().is_none());
    }

    #[test]
    fn test_unparseable_price_drops_variant() {
        let product = convert_product(node(serde_json::json!({
            "edges": [{ "node": {
                "id": "gid://shopify/ProductVariant/92",
                "price": { "amount": "free", "currencyCode": "USD" }
            }}]
        })));
        assert!(product.primary_variant.is_none());
    }
}
