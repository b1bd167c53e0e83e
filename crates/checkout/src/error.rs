//! Crate-level error type and Sentry helpers.
//!
//! Widgets absorb their own failures (see [`crate::addon`]); `CheckoutError`
//! is for the setup path a host or the CLI runs before any widget renders.

use naked_pineapple_core::VariantId;
use thiserror::Error;

use crate::config::ConfigError;
use crate::shopify::ShopifyError;

/// Errors from configuring and wiring the checkout widgets.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Shopify API operation failed.
    #[error("Shopify error: {0}")]
    Shopify(#[from] ShopifyError),

    /// A view failed to render.
    #[error("Render error: {0}")]
    Render(#[from] askama::Error),
}

/// Result type alias for `CheckoutError`.
pub type Result<T> = std::result::Result<T, CheckoutError>;

/// Add a breadcrumb for shopper actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of actions
/// leading up to an error. Without an initialized Sentry client this is a
/// no-op.
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

/// Record that the shopper asked to add `merchandise_id` to the cart.
pub(crate) fn cart_add_breadcrumb(merchandise_id: &VariantId) {
    add_breadcrumb(
        "cart",
        "Add-on add to cart",
        Some(&[("merchandise_id", merchandise_id.as_str())]),
    );
}

/// Report a cart mutation the host rejected.
///
/// The message is for operators only; shoppers see a fixed banner.
pub(crate) fn report_cart_failure(merchandise_id: &VariantId, message: &str) {
    tracing::error!(
        merchandise_id = %merchandise_id,
        host_message = %message,
        "Add-on cart line change failed"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checkout_error_display() {
        let err = CheckoutError::from(ConfigError::MissingEnvVar("SHOPIFY_STORE".to_string()));
        assert_eq!(
            err.to_string(),
            "Configuration error: Missing environment variable: SHOPIFY_STORE"
        );

        let err = CheckoutError::from(ShopifyError::NotFound("Cart not found: c1".to_string()));
        assert_eq!(err.to_string(), "Shopify error: Not found: Cart not found: c1");
    }

    #[test]
    fn test_breadcrumb_without_client_is_noop() {
        add_breadcrumb("cart", "test", Some(&[("k", "v")]));
        cart_add_breadcrumb(&VariantId::from("gid://shopify/ProductVariant/1"));
    }
}
