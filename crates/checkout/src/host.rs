//! Interfaces the checkout host provides to the widgets.
//!
//! A widget never talks to the network directly. It reads the catalog through
//! a [`CatalogSource`], reads and mutates the cart through a [`CartHost`], and
//! loads merchant content through a [`BenefitSource`]. The Storefront API
//! client implements all three; tests use in-memory fakes.

use std::collections::HashSet;
use std::future::Future;

use naked_pineapple_core::VariantId;
use serde::{Deserialize, Serialize};

use crate::shopify::types::{CartLine, Metaobject, Product};

// =============================================================================
// Cart snapshot
// =============================================================================

/// Merchandise ids currently in the shopper's cart, in cart order.
///
/// The snapshot is owned by the cart subsystem; widgets only read it. It may
/// lag the most recent mutation by one round-trip.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CartSnapshot(Vec<VariantId>);

impl CartSnapshot {
    /// Create a snapshot from merchandise ids.
    #[must_use]
    pub const fn new(merchandise_ids: Vec<VariantId>) -> Self {
        Self(merchandise_ids)
    }

    /// Snapshot of the merchandise on the given cart lines.
    #[must_use]
    pub fn from_lines(lines: &[CartLine]) -> Self {
        lines.iter().map(|line| line.merchandise_id.clone()).collect()
    }

    /// Merchandise ids in cart order.
    #[must_use]
    pub fn merchandise_ids(&self) -> &[VariantId] {
        &self.0
    }

    /// Whether the cart holds the given merchandise.
    #[must_use]
    pub fn contains(&self, merchandise_id: &VariantId) -> bool {
        self.0.contains(merchandise_id)
    }

    /// The merchandise ids as a set, for repeated membership checks.
    #[must_use]
    pub fn id_set(&self) -> HashSet<&VariantId> {
        self.0.iter().collect()
    }

    /// Number of lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the cart is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<VariantId> for CartSnapshot {
    fn from_iter<I: IntoIterator<Item = VariantId>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

// =============================================================================
// Cart changes
// =============================================================================

/// A change request for the host's cart-mutation API.
///
/// Serializes to the host's wire shape, e.g.
/// `{"type":"addCartLine","merchandiseId":"gid://...","quantity":1}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum CartLineChange {
    /// Add `quantity` of a variant as a cart line.
    AddCartLine {
        merchandise_id: VariantId,
        quantity: u32,
    },
}

impl CartLineChange {
    /// Add a single unit of `merchandise_id`.
    #[must_use]
    pub const fn add_one(merchandise_id: VariantId) -> Self {
        Self::AddCartLine {
            merchandise_id,
            quantity: 1,
        }
    }
}

/// Outcome of a cart change, as reported by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum CartChangeResult {
    /// The change was applied.
    Success,
    /// The change was rejected; `message` is for operators, not shoppers.
    Error { message: String },
}

// =============================================================================
// Host traits
// =============================================================================

/// Read access to the product catalog.
pub trait CatalogSource: Send + Sync {
    /// Error returned when the catalog cannot be read.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Up to `first` products carrying `tag`, in server order.
    fn tagged_products(
        &self,
        tag: &str,
        first: usize,
    ) -> impl Future<Output = Result<Vec<Product>, Self::Error>> + Send;
}

/// Live read access to the cart plus its mutation API.
pub trait CartHost: Send + Sync {
    /// Current cart contents. Called once per render pass.
    fn cart_lines(&self) -> CartSnapshot;

    /// Apply a change to the cart. Always settles; there is no cancellation.
    fn apply_cart_lines_change(
        &self,
        change: CartLineChange,
    ) -> impl Future<Output = CartChangeResult> + Send;
}

/// Read access to merchant-defined metaobjects.
pub trait BenefitSource: Send + Sync {
    /// Error returned when the metaobjects cannot be read.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Up to `first` metaobjects of `metaobject_type`.
    fn metaobjects(
        &self,
        metaobject_type: &str,
        first: usize,
    ) -> impl Future<Output = Result<Vec<Metaobject>, Self::Error>> + Send;
}

// =============================================================================
// Storefront implementations
// =============================================================================

/// Saturating conversion for the GraphQL `Int` page sizes.
fn page_size(first: usize) -> i64 {
    i64::try_from(first).unwrap_or(i64::MAX)
}

impl CatalogSource for crate::shopify::StorefrontClient {
    type Error = crate::shopify::ShopifyError;

    async fn tagged_products(&self, tag: &str, first: usize) -> Result<Vec<Product>, Self::Error> {
        self.get_tagged_products(tag, page_size(first)).await
    }
}

impl BenefitSource for crate::shopify::StorefrontClient {
    type Error = crate::shopify::ShopifyError;

    async fn metaobjects(
        &self,
        metaobject_type: &str,
        first: usize,
    ) -> Result<Vec<Metaobject>, Self::Error> {
        self.get_metaobjects(metaobject_type, page_size(first)).await
    }
}
