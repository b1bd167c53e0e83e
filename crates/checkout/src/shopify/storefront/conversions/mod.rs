//! Type conversion functions for Shopify Storefront API responses.

pub mod cart;
pub mod metaobjects;
pub mod products;

pub use cart::{convert_cart, convert_user_error};
pub use metaobjects::convert_metaobject;
pub use products::convert_product;
