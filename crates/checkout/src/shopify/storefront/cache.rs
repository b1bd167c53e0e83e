//! Cache types for Storefront API responses.

use crate::shopify::types::{Metaobject, Product};

/// Cache key for catalog and metaobject reads.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    TaggedProducts { query: String, first: i64 },
    Metaobjects { metaobject_type: String, first: i64 },
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Products(Vec<Product>),
    Metaobjects(Vec<Metaobject>),
}
