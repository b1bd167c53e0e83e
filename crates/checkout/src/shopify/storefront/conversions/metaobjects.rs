//! Metaobject type conversion functions.

use naked_pineapple_core::MetaobjectId;

use crate::shopify::types::{Metaobject, MetaobjectField};

use super::super::queries::get_checkout_benefits;
use super::products::convert_image;

pub fn convert_metaobject(node: get_checkout_benefits::MetaobjectNode) -> Metaobject {
    Metaobject {
        id: MetaobjectId::new(node.id),
        fields: node
            .fields
            .into_iter()
            .map(|field| MetaobjectField {
                key: field.key,
                value: field.value,
                image: field
                    .reference
                    .and_then(|reference| reference.image)
                    .map(convert_image),
            })
            .collect(),
    }
}
