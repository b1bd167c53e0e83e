//! Add-on recommender widget.
//!
//! Shows one tagged product at a time that is not yet in the shopper's cart
//! and lets them add it with a single press. The pieces are layered:
//!
//! - [`availability`]: which fetched products can still be offered
//! - [`rotation`]: which of those is shown, and where the pointer goes next
//! - [`state`]: the pure reducer holding phase, products and flags
//! - [`widget`]: [`AddonWidget`], wiring the reducer to the host
//! - [`view`]: display fields and HTML rendering

pub mod availability;
pub mod rotation;
pub mod state;
pub mod view;
pub mod widget;

pub use state::{AddRejection, Effect, Phase, WidgetAction, WidgetState};
pub use view::{AddonCard, AddonView};
pub use widget::{AddOutcome, AddonWidget};

/// Tag selecting add-on products when none is configured.
pub const DEFAULT_PRODUCT_TAG: &str = "checkout-product";

/// Products requested by the one-shot catalog query.
pub const CATALOG_PAGE_SIZE: usize = 10;

/// Heading shown above the recommendation.
pub const DEFAULT_HEADING: &str = "Best selling add-ons";

/// Add-on widget settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddonSettings {
    /// Products carrying this tag are offered.
    pub product_tag: String,
    /// Heading shown above the card and the skeleton.
    pub heading: String,
}

impl Default for AddonSettings {
    fn default() -> Self {
        Self {
            product_tag: DEFAULT_PRODUCT_TAG.to_string(),
            heading: DEFAULT_HEADING.to_string(),
        }
    }
}

impl AddonSettings {
    /// Settings for a custom tag, keeping the default heading.
    #[must_use]
    pub fn with_tag(product_tag: impl Into<String>) -> Self {
        Self {
            product_tag: product_tag.into(),
            ..Self::default()
        }
    }
}
