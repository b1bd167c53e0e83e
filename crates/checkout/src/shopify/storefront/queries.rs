//! GraphQL operation definitions for the checkout widgets.
//!
//! The Storefront schema is not vendored into this crate, so each operation
//! implements [`GraphQLQuery`] by hand: the document comes from
//! `graphql/storefront/queries/`, and the response structs mirror exactly the
//! selection set of that document.

use graphql_client::{GraphQLQuery, QueryBody};

const PRODUCTS_DOCUMENT: &str =
    include_str!("../../../graphql/storefront/queries/products.graphql");
const CART_DOCUMENT: &str = include_str!("../../../graphql/storefront/queries/cart.graphql");
const METAOBJECTS_DOCUMENT: &str =
    include_str!("../../../graphql/storefront/queries/metaobjects.graphql");

/// Shared selection for `MoneyV2` and `Image`.
pub mod common {
    use serde::Deserialize;

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct MoneyV2 {
        pub amount: String,
        pub currency_code: String,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Image {
        pub url: String,
        pub alt_text: Option<String>,
    }

    /// Relay-style connection with only `edges { node }` selected.
    #[derive(Debug, Clone, Deserialize)]
    pub struct Connection<T> {
        pub edges: Vec<Edge<T>>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct Edge<T> {
        pub node: T,
    }

    impl<T> Connection<T> {
        /// Unwrap the edges into their nodes, preserving order.
        pub fn into_nodes(self) -> impl Iterator<Item = T> {
            self.edges.into_iter().map(|edge| edge.node)
        }
    }
}

// =============================================================================
// Products
// =============================================================================

pub struct GetCheckoutProducts;

pub mod get_checkout_products {
    use serde::{Deserialize, Serialize};

    pub use super::common::{Connection, Image, MoneyV2};

    pub const OPERATION_NAME: &str = "GetCheckoutProducts";

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub first: i64,
        pub query: String,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub products: Connection<ProductNode>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ProductNode {
        pub id: String,
        pub title: String,
        pub handle: String,
        #[serde(default)]
        pub tags: Vec<String>,
        pub featured_image: Option<Image>,
        pub variants: Connection<VariantNode>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct VariantNode {
        pub id: String,
        pub price: MoneyV2,
    }
}

impl GraphQLQuery for GetCheckoutProducts {
    type Variables = get_checkout_products::Variables;
    type ResponseData = get_checkout_products::ResponseData;

    fn build_query(variables: Self::Variables) -> QueryBody<Self::Variables> {
        QueryBody {
            variables,
            query: PRODUCTS_DOCUMENT,
            operation_name: get_checkout_products::OPERATION_NAME,
        }
    }
}

// =============================================================================
// Cart
// =============================================================================

/// Cart selection shared by the cart query and mutation (`CheckoutCartFields`).
pub mod cart_fields {
    use serde::Deserialize;

    pub use super::common::Connection;

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CartNode {
        pub id: String,
        pub total_quantity: i64,
        pub lines: Connection<CartLineNode>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct CartLineNode {
        pub id: String,
        pub quantity: i64,
        pub merchandise: MerchandiseNode,
    }

    /// `Merchandise` is a union; only `ProductVariant` exists today, and it is
    /// the only member selected.
    #[derive(Debug, Clone, Deserialize)]
    pub struct MerchandiseNode {
        pub id: Option<String>,
    }
}

pub struct GetCheckoutCart;

pub mod get_checkout_cart {
    use serde::{Deserialize, Serialize};

    pub use super::cart_fields::CartNode;

    pub const OPERATION_NAME: &str = "GetCheckoutCart";

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub cart_id: String,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub cart: Option<CartNode>,
    }
}

impl GraphQLQuery for GetCheckoutCart {
    type Variables = get_checkout_cart::Variables;
    type ResponseData = get_checkout_cart::ResponseData;

    fn build_query(variables: Self::Variables) -> QueryBody<Self::Variables> {
        QueryBody {
            variables,
            query: CART_DOCUMENT,
            operation_name: get_checkout_cart::OPERATION_NAME,
        }
    }
}

pub struct AddCheckoutCartLines;

pub mod add_checkout_cart_lines {
    use serde::{Deserialize, Serialize};

    pub use super::cart_fields::CartNode;

    pub const OPERATION_NAME: &str = "AddCheckoutCartLines";

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub cart_id: String,
        pub lines: Vec<CartLineInput>,
    }

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CartLineInput {
        pub merchandise_id: String,
        pub quantity: Option<i64>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub cart_lines_add: Option<CartLinesAddPayload>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CartLinesAddPayload {
        pub cart: Option<CartNode>,
        pub user_errors: Vec<UserError>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct UserError {
        pub field: Option<Vec<String>>,
        pub message: String,
        pub code: Option<String>,
    }
}

impl GraphQLQuery for AddCheckoutCartLines {
    type Variables = add_checkout_cart_lines::Variables;
    type ResponseData = add_checkout_cart_lines::ResponseData;

    fn build_query(variables: Self::Variables) -> QueryBody<Self::Variables> {
        QueryBody {
            variables,
            query: CART_DOCUMENT,
            operation_name: add_checkout_cart_lines::OPERATION_NAME,
        }
    }
}

// =============================================================================
// Metaobjects
// =============================================================================

pub struct GetCheckoutBenefits;

pub mod get_checkout_benefits {
    use serde::{Deserialize, Serialize};

    pub use super::common::{Connection, Image};

    pub const OPERATION_NAME: &str = "GetCheckoutBenefits";

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub first: i64,
        #[serde(rename = "type")]
        pub metaobject_type: String,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub metaobjects: Connection<MetaobjectNode>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct MetaobjectNode {
        pub id: String,
        pub fields: Vec<FieldNode>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct FieldNode {
        pub key: String,
        pub value: Option<String>,
        pub reference: Option<ReferenceNode>,
    }

    /// `MetafieldReference` union; only `MediaImage` is selected, so any other
    /// member deserializes with `image: None`.
    #[derive(Debug, Clone, Deserialize)]
    pub struct ReferenceNode {
        pub image: Option<Image>,
    }
}

impl GraphQLQuery for GetCheckoutBenefits {
    type Variables = get_checkout_benefits::Variables;
    type ResponseData = get_checkout_benefits::ResponseData;

    fn build_query(variables: Self::Variables) -> QueryBody<Self::Variables> {
        QueryBody {
            variables,
            query: METAOBJECTS_DOCUMENT,
            operation_name: get_checkout_benefits::OPERATION_NAME,
        }
    }
}
