//! Add-on recommender commands.
//!
//! # Environment Variables
//!
//! - `SHOPIFY_STORE`, `SHOPIFY_STOREFRONT_PRIVATE_TOKEN` - Storefront access
//! - `CHECKOUT_PRODUCT_TAG` - Tag selecting add-on products
//! - `CHECKOUT_CURRENCY`, `CHECKOUT_LOCALE` - Price formatting

use naked_pineapple_checkout::host::CartHost;
use naked_pineapple_checkout::shopify::{StorefrontCart, StorefrontClient};
use naked_pineapple_checkout::{AddOutcome, AddonWidget, CheckoutConfig, ShopperCurrencyFormatter};
use naked_pineapple_core::CartId;

use super::{CommandError, OutputFormat, emit, say};

type StorefrontWidget = AddonWidget<StorefrontClient, StorefrontCart, ShopperCurrencyFormatter>;

/// Load config, bind the cart and mount the widget.
async fn mount(cart_id: &str) -> Result<StorefrontWidget, CommandError> {
    let config = CheckoutConfig::from_env()?;
    let client = StorefrontClient::new(&config.shopify)?;

    tracing::info!(endpoint = %client.endpoint(), cart_id, "Loading cart");
    let cart = StorefrontCart::load(client.clone(), CartId::new(cart_id)).await?;
    tracing::debug!(cart_id = %cart.cart_id(), lines = ?cart.cart_lines(), "Cart loaded");

    let widget = AddonWidget::new(
        client,
        cart,
        config.currency_formatter(),
        config.addon,
    );
    widget.mount().await;
    Ok(widget)
}

fn print_view(widget: &StorefrontWidget, format: OutputFormat) -> Result<(), CommandError> {
    let view = widget.view();
    emit(
        format,
        &view,
        || view.to_string(),
        || view.render_html(&widget.settings().heading),
    )
}

/// Print the current recommendation for `cart_id`.
///
/// # Errors
///
/// Returns an error if configuration is invalid or the cart cannot be loaded.
pub async fn recommend(cart_id: &str, format: OutputFormat) -> Result<(), CommandError> {
    let widget = mount(cart_id).await?;
    print_view(&widget, format)
}

/// Add the current recommendation to `cart_id` and print what comes next.
///
/// The cart is re-read before the next view so lines changed elsewhere are
/// taken into account. A rejected cart change is reported but is not a
/// command failure; the widget shows its error banner instead.
///
/// # Errors
///
/// Returns an error if configuration is invalid or the cart cannot be loaded.
pub async fn add(cart_id: &str, format: OutputFormat) -> Result<(), CommandError> {
    let widget = mount(cart_id).await?;

    match widget.add_current_selection().await {
        AddOutcome::Added { merchandise_id } => {
            say(&format!("Added {merchandise_id}"))?;
        }
        AddOutcome::Failed {
            merchandise_id,
            message,
        } => {
            say(&format!("Could not add {merchandise_id}: {message}"))?;
        }
        AddOutcome::Busy => say("Another add is in progress")?,
        AddOutcome::NothingSelected => say("Nothing to add")?,
    }

    if let Err(e) = widget.cart().refresh().await {
        tracing::warn!(error = %e, "Cart refresh failed, showing last known lines");
    }

    print_view(&widget, format)
}
