//! Naked Pineapple Checkout - widgets rendered inside Shopify checkout.
//!
//! # Widgets
//!
//! - [`addon`] - recommends one tagged product not yet in the cart and adds
//!   it with a single press
//! - [`countdown`] - a cosmetic 15 minute reservation countdown
//! - [`benefits`] - merchant-managed benefit icons in a two column grid
//!
//! # Architecture
//!
//! Widgets only talk to the checkout through the traits in [`host`]. The
//! [`shopify`] module implements them against the Storefront API so the
//! widgets can also be driven outside a checkout (see the `np-checkout` CLI).
//! Views are plain data and render to HTML fragments through askama.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod addon;
pub mod benefits;
pub mod config;
pub mod countdown;
pub mod error;
pub mod format;
pub mod host;
pub mod shopify;

pub use addon::{AddOutcome, AddonSettings, AddonView, AddonWidget};
pub use benefits::{BenefitsGrid, BenefitsSettings, load_benefits};
pub use config::{CheckoutConfig, ConfigError, ShopifyStorefrontConfig, TelemetryConfig};
pub use countdown::{CountdownSettings, CountdownView, spawn_countdown};
pub use error::{CheckoutError, Result};
pub use format::{CurrencyFormatter, ShopperCurrencyFormatter};
pub use host::{BenefitSource, CartChangeResult, CartHost, CartLineChange, CartSnapshot, CatalogSource};
