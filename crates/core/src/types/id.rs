//! Newtype IDs for Shopify global identifiers.
//!
//! Shopify addresses every resource with a global id of the form
//! `gid://shopify/<Resource>/<id>`. Use the `define_gid!` macro to create
//! type-safe wrappers so a product id can never be passed where a
//! merchandise (variant) id is expected.

/// Prefix shared by all Shopify global ids.
pub const GID_PREFIX: &str = "gid://shopify/";

/// Macro to define a type-safe Shopify global id wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `new()`, `from_resource_id()`, `as_str()`, `resource_id()`
/// - `From<String>`, `From<&str>`, `AsRef<str>` and `Display` implementations
///
/// Ids are opaque: `new()` accepts any string so fixtures and host-provided
/// ids round-trip unchanged.
///
/// # Example
///
/// ```rust
/// # use naked_pineapple_core::define_gid;
/// define_gid!(ProductId, "Product");
/// define_gid!(VariantId, "ProductVariant");
///
/// let product_id = ProductId::from_resource_id("42");
/// assert_eq!(product_id.as_str(), "gid://shopify/Product/42");
/// assert_eq!(product_id.resource_id(), "42");
///
/// // These are different types, so this won't compile:
/// // let _: VariantId = product_id;
/// ```
#[macro_export]
macro_rules! define_gid {
    ($name:ident, $resource:literal) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Shopify resource name used in the global id.
            pub const RESOURCE: &'static str = $resource;

            /// Create an id from a full global id string.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Create an id from the trailing resource id (e.g. `"42"`).
            #[must_use]
            pub fn from_resource_id(id: impl ::core::fmt::Display) -> Self {
                Self(format!("{}{}/{}", $crate::types::id::GID_PREFIX, $resource, id))
            }

            /// Get the underlying global id string.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the id and return the underlying string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }

            /// Returns the trailing resource id, without any query string.
            ///
            /// `gid://shopify/Cart/abc?key=1` yields `abc`.
            #[must_use]
            pub fn resource_id(&self) -> &str {
                let path = self.0.split('?').next().unwrap_or_default();
                path.rsplit('/').next().unwrap_or_default()
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_gid!(ProductId, "Product");
define_gid!(VariantId, "ProductVariant");
define_gid!(CartId, "Cart");
define_gid!(CartLineId, "CartLine");
define_gid!(MetaobjectId, "Metaobject");
define_gid!(MediaImageId, "MediaImage");
