//! Presentation of the add-on widget.

use std::fmt;

use askama::Template;
use naked_pineapple_core::{ProductId, VariantId};
use serde::Serialize;

use crate::format::CurrencyFormatter;
use crate::host::CartSnapshot;
use crate::shopify::types::{PrimaryVariant, Product};

use super::state::{Phase, WidgetState};

/// Image shown when a product has no featured image.
pub const PLACEHOLDER_IMAGE_URL: &str = "https://cdn.shopify.com/s/files/1/0533/2089/files/placeholder-images-image_medium.png?format=webp&v=1530129081";

/// The only failure text shoppers ever see.
pub const ADD_TO_CART_ERROR_MESSAGE: &str =
    "There was an issue adding this product. Please try again.";

/// Display fields for the recommended product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddonCard {
    pub product_id: ProductId,
    pub merchandise_id: VariantId,
    pub title: String,
    pub image_url: String,
    pub image_alt: String,
    /// Price in the shopper's currency, e.g. `$24.00`.
    pub price: String,
    /// `Add – $24.00`
    pub button_label: String,
    /// `Add Wax Refill to cart`
    pub accessibility_label: String,
    /// Button shows a spinner and ignores presses.
    pub adding: bool,
    pub error_message: Option<&'static str>,
}

impl AddonCard {
    /// Card for `product` priced by `formatter`.
    pub fn new(
        product: &Product,
        variant: &PrimaryVariant,
        formatter: &impl CurrencyFormatter,
        adding: bool,
        error: bool,
    ) -> Self {
        let price = formatter.format(variant.price.amount);
        let (image_url, image_alt) = product.featured_image.as_ref().map_or_else(
            || (PLACEHOLDER_IMAGE_URL.to_string(), product.title.clone()),
            |image| {
                (
                    image.url.clone(),
                    image.alt_text.clone().unwrap_or_else(|| product.title.clone()),
                )
            },
        );

        Self {
            product_id: product.id.clone(),
            merchandise_id: variant.id.clone(),
            title: product.title.clone(),
            image_url,
            image_alt,
            button_label: format!("Add \u{2013} {price}"),
            accessibility_label: format!("Add {} to cart", product.title),
            price,
            adding,
            error_message: error.then_some(ADD_TO_CART_ERROR_MESSAGE),
        }
    }
}

/// What the widget shows for one render pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum AddonView {
    /// Catalog fetch not complete.
    Loading,
    /// Nothing to offer.
    Hidden,
    /// A product to offer.
    Card(AddonCard),
}

impl AddonView {
    /// Build the view for `state` against the live `cart`.
    ///
    /// Priority: loading skeleton, then nothing for an empty catalog, then
    /// nothing when every product is already in the cart, then the card.
    pub fn build(
        state: &WidgetState,
        cart: &CartSnapshot,
        formatter: &impl CurrencyFormatter,
    ) -> Self {
        if state.phase() != Phase::Ready {
            return Self::Loading;
        }
        if state.products().is_empty() {
            return Self::Hidden;
        }

        state
            .selected(cart)
            .and_then(|product| {
                product.primary_variant.as_ref().map(|variant| {
                    AddonCard::new(
                        product,
                        variant,
                        formatter,
                        state.is_adding(),
                        state.has_error(),
                    )
                })
            })
            .map_or(Self::Hidden, Self::Card)
    }

    /// The card, when one is shown.
    #[must_use]
    pub const fn card(&self) -> Option<&AddonCard> {
        match self {
            Self::Card(card) => Some(card),
            Self::Loading | Self::Hidden => None,
        }
    }

    /// Render as an HTML fragment. `Hidden` renders as an empty string.
    ///
    /// # Errors
    ///
    /// Returns an error if template rendering fails.
    pub fn render_html(&self, heading: &str) -> Result<String, askama::Error> {
        match self {
            Self::Loading => AddonSkeletonTemplate { heading }.render(),
            Self::Hidden => Ok(String::new()),
            Self::Card(card) => AddonCardTemplate { heading, card }.render(),
        }
    }
}

impl fmt::Display for AddonView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Loading => write!(f, "(loading)"),
            Self::Hidden => write!(f, "(nothing to offer)"),
            Self::Card(card) => {
                write!(f, "{}  [{}]", card.title, card.button_label)?;
                if card.adding {
                    write!(f, "  (adding...)")?;
                }
                if let Some(message) = card.error_message {
                    write!(f, "\n! {message}")?;
                }
                Ok(())
            }
        }
    }
}

#[derive(Template)]
#[template(path = "partials/addon_card.html")]
struct AddonCardTemplate<'a> {
    heading: &'a str,
    card: &'a AddonCard,
}

#[derive(Template)]
#[template(path = "partials/addon_skeleton.html")]
struct AddonSkeletonTemplate<'a> {
    heading: &'a str,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::addon::state::WidgetAction;
    use crate::addon::test_support::{cart, product, product_without_variant};
    use crate::format::ShopperCurrencyFormatter;

    fn ready(products: Vec<Product>) -> WidgetState {
        let mut state = WidgetState::new();
        state.reduce(WidgetAction::MountRequested);
        state.reduce(WidgetAction::FetchSucceeded(products));
        state
    }

    fn fmt() -> ShopperCurrencyFormatter {
        ShopperCurrencyFormatter::default()
    }

    #[test]
    fn test_loading_before_fetch_completes() {
        let mut state = WidgetState::new();
        assert_eq!(AddonView::build(&state, &cart(&[]), &fmt()), AddonView::Loading);
        state.reduce(WidgetAction::MountRequested);
        assert_eq!(AddonView::build(&state, &cart(&[]), &fmt()), AddonView::Loading);
    }

    #[test]
    fn test_hidden_for_empty_catalog() {
        let state = ready(vec![]);
        assert_eq!(AddonView::build(&state, &cart(&[]), &fmt()), AddonView::Hidden);
    }

    #[test]
    fn test_hidden_when_everything_is_in_cart() {
        let state = ready(vec![product("A", "a1"), product_without_variant("B")]);
        assert_eq!(
            AddonView::build(&state, &cart(&["a1"]), &fmt()),
            AddonView::Hidden
        );
    }

    #[test]
    fn test_card_fields() {
        let state = ready(vec![product("Wax Refill", "w1")]);
        let view = AddonView::build(&state, &cart(&[]), &fmt());
        let card = view.card().unwrap();

        assert_eq!(card.title, "Wax Refill");
        assert_eq!(card.price, "$10.00");
        assert_eq!(card.button_label, "Add \u{2013} $10.00");
        assert_eq!(card.accessibility_label, "Add Wax Refill to cart");
        assert_eq!(card.image_alt, "Wax Refill photo");
        assert!(!card.adding);
        assert!(card.error_message.is_none());
    }

    #[test]
    fn test_placeholder_image() {
        let mut p = product("Plain", "p1");
        p.featured_image = None;
        let state = ready(vec![p]);
        let view = AddonView::build(&state, &cart(&[]), &fmt());
        let card = view.card().unwrap();

        assert_eq!(card.image_url, PLACEHOLDER_IMAGE_URL);
        assert_eq!(card.image_alt, "Plain");
    }

    #[test]
    fn test_error_banner_is_generic() {
        let mut state = ready(vec![product("A", "a1"), product("B", "b1")]);
        state.reduce(WidgetAction::AddStarted { cart: cart(&[]) });
        state.reduce(WidgetAction::AddFailed {
            merchandise_id: VariantId::from("a1"),
            cart: cart(&[]),
        });

        let view = AddonView::build(&state, &cart(&[]), &fmt());
        assert_eq!(
            view.card().unwrap().error_message,
            Some(ADD_TO_CART_ERROR_MESSAGE)
        );

        let html = view.render_html("Best selling add-ons").unwrap();
        assert!(html.contains("There was an issue adding this product. Please try again."));
        assert!(html.contains("role=\"alert\""));
    }

    #[test]
    fn test_render_card_html() {
        let state = ready(vec![product("A", "a1")]);
        let html = AddonView::build(&state, &cart(&[]), &fmt())
            .render_html("Best selling add-ons")
            .unwrap();

        assert!(html.contains("Best selling add-ons"));
        assert!(html.contains("aria-label=\"Add A to cart\""));
        assert!(html.contains("$10.00"));
        assert!(!html.contains("disabled"));
        assert!(!html.contains("role=\"alert\""));
    }

    #[test]
    fn test_render_adding_disables_button() {
        let mut state = ready(vec![product("A", "a1")]);
        state.reduce(WidgetAction::AddStarted { cart: cart(&[]) });
        let html = AddonView::build(&state, &cart(&[]), &fmt())
            .render_html("Add-ons")
            .unwrap();

        assert!(html.contains("aria-busy=\"true\" disabled"));
    }

    #[test]
    fn test_render_skeleton_and_hidden() {
        let skeleton = AddonView::Loading.render_html("Best selling add-ons").unwrap();
        assert!(skeleton.contains("addon--loading"));
        assert!(skeleton.contains("Best selling add-ons"));

        assert!(AddonView::Hidden.render_html("x").unwrap().is_empty());
    }

    #[test]
    fn test_view_serializes_with_state_tag() {
        let json = serde_json::to_value(AddonView::Hidden).unwrap();
        assert_eq!(json, serde_json::json!({ "state": "hidden" }));
    }
}
