//! Domain types for the checkout widgets.
//!
//! These types provide a clean, ergonomic API separate from the raw
//! GraphQL response structs in `storefront::queries`.

use naked_pineapple_core::{CartId, CartLineId, MetaobjectId, Price, ProductId, VariantId};
use serde::{Deserialize, Serialize};

// =============================================================================
// Image Types
// =============================================================================

/// Product or media image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    /// Image URL.
    pub url: String,
    /// Alt text for accessibility.
    pub alt_text: Option<String>,
}

// =============================================================================
// Product Types
// =============================================================================

/// The first purchasable variant of a product.
///
/// The checkout recommender only queries one variant per product, so this is
/// the variant that gets added to the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimaryVariant {
    /// Merchandise id passed to cart mutations.
    pub id: VariantId,
    /// Variant price.
    pub price: Price,
}

/// A product offered as a checkout add-on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Shopify product ID.
    pub id: ProductId,
    /// Product title.
    pub title: String,
    /// URL handle.
    pub handle: String,
    /// Product tags.
    pub tags: Vec<String>,
    /// Featured image, if the product has one.
    pub featured_image: Option<Image>,
    /// First variant; `None` when the product has no purchasable variant.
    pub primary_variant: Option<PrimaryVariant>,
}

impl Product {
    /// Merchandise id of the primary variant.
    #[must_use]
    pub fn primary_variant_id(&self) -> Option<&VariantId> {
        self.primary_variant.as_ref().map(|variant| &variant.id)
    }
}

// =============================================================================
// Cart Types
// =============================================================================

/// A line in the shopper's cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Cart line ID.
    pub id: CartLineId,
    /// Merchandise (variant) on this line.
    pub merchandise_id: VariantId,
    /// Quantity.
    pub quantity: i64,
}

/// A shopping cart as seen by the checkout widgets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    /// Cart ID.
    pub id: CartId,
    /// Total item count.
    pub total_quantity: i64,
    /// Cart lines, in cart order.
    pub lines: Vec<CartLine>,
}

/// Input for adding a line to a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineInput {
    /// Variant ID to add.
    pub merchandise_id: VariantId,
    /// Quantity to add.
    pub quantity: i64,
}

/// User error returned by a cart mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartUserError {
    /// Error code, if provided.
    pub code: Option<String>,
    /// Field path that caused the error.
    pub field: Option<Vec<String>>,
    /// Error message.
    pub message: String,
}

// =============================================================================
// Metaobject Types
// =============================================================================

/// A field on a metaobject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaobjectField {
    /// Field key (e.g. `benefit_name`).
    pub key: String,
    /// Raw field value.
    pub value: Option<String>,
    /// Image, when the field references a media image.
    pub image: Option<Image>,
}

/// A merchant-defined metaobject entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metaobject {
    /// Metaobject ID.
    pub id: MetaobjectId,
    /// Fields in definition order.
    pub fields: Vec<MetaobjectField>,
}

impl Metaobject {
    /// Look up a field by key.
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&MetaobjectField> {
        self.fields.iter().find(|field| field.key == key)
    }
}
