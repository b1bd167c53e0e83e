//! Checkout widget configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SHOPIFY_STORE` - Shopify store domain (e.g., your-store.myshopify.com)
//! - `SHOPIFY_STOREFRONT_PRIVATE_TOKEN` - Storefront API private access token
//!
//! ## Optional
//! - `SHOPIFY_API_VERSION` - API version (default: 2026-01)
//! - `CHECKOUT_PRODUCT_TAG` - Tag selecting add-on products (default: checkout-product)
//! - `CHECKOUT_FEATURES_TITLE` - Heading of the benefits grid
//! - `CHECKOUT_CURRENCY` - Shopper presentment currency (default: USD)
//! - `CHECKOUT_LOCALE` - Shopper locale for number formatting (default: en-US)
//! - `CHECKOUT_COUNTDOWN_SECONDS` - Countdown start value (default: 900)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::collections::HashMap;

use naked_pineapple_core::CurrencyCode;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

use crate::addon::AddonSettings;
use crate::benefits::BenefitsSettings;
use crate::countdown::CountdownSettings;
use crate::format::ShopperCurrencyFormatter;

const MIN_TOKEN_LENGTH: usize = 32;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Settings for the widgets that talk to Shopify.
///
/// The countdown and telemetry need no credentials and are loaded on their
/// own by [`countdown_from_env`] and [`TelemetryConfig::from_env`].
#[derive(Debug, Clone)]
pub struct CheckoutConfig {
    /// Shopify Storefront API configuration
    pub shopify: ShopifyStorefrontConfig,
    pub addon: AddonSettings,
    pub benefits: BenefitsSettings,
    /// Shopper presentment currency
    pub currency: CurrencyCode,
    /// Shopper locale, e.g. `en-US`
    pub locale: String,
}

/// Error tracking settings. Loadable without Shopify credentials.
#[derive(Debug, Clone, Default)]
pub struct TelemetryConfig {
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g. production, staging)
    pub sentry_environment: Option<String>,
}

impl TelemetryConfig {
    /// Read `SENTRY_DSN` and `SENTRY_ENVIRONMENT`.
    #[must_use]
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();

        Self {
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        }
    }
}

/// Countdown settings with `CHECKOUT_COUNTDOWN_SECONDS` applied.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` if the value is not a whole number.
pub fn countdown_from_env() -> Result<CountdownSettings, ConfigError> {
    let _ = dotenvy::dotenv();

    let mut countdown = CountdownSettings::default();
    if let Some(raw) = get_optional_env("CHECKOUT_COUNTDOWN_SECONDS") {
        countdown.seconds = raw.trim().parse::<u64>().map_err(|e| {
            ConfigError::InvalidEnvVar("CHECKOUT_COUNTDOWN_SECONDS".to_string(), e.to_string())
        })?;
    }
    Ok(countdown)
}

/// Shopify Storefront API configuration.
///
/// Implements `Debug` manually to redact secret fields.
#[derive(Clone)]
pub struct ShopifyStorefrontConfig {
    /// Shopify store domain (e.g., your-store.myshopify.com)
    pub store: String,
    /// Shopify API version (e.g., 2026-01)
    pub api_version: String,
    /// Storefront API private access token (server-side only)
    pub storefront_private_token: SecretString,
}

impl std::fmt::Debug for ShopifyStorefrontConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopifyStorefrontConfig")
            .field("store", &self.store)
            .field("api_version", &self.api_version)
            .field("storefront_private_token", &"[REDACTED]")
            .finish()
    }
}

impl ShopifyStorefrontConfig {
    /// Storefront GraphQL endpoint, `https://<store>/api/<version>/graphql.json`.
    ///
    /// A scheme or trailing slash on the store domain is ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the store and version do not form a valid URL.
    pub fn endpoint(&self) -> Result<url::Url, url::ParseError> {
        let store = self
            .store
            .trim()
            .trim_start_matches("https://")
            .trim_start_matches("http://")
            .trim_end_matches('/');

        url::Url::parse(&format!(
            "https://{store}/api/{}/graphql.json",
            self.api_version.trim()
        ))
    }

    fn from_env() -> Result<Self, ConfigError> {
        let storefront_private_token = get_validated_secret("SHOPIFY_STOREFRONT_PRIVATE_TOKEN")?;
        validate_token_length(&storefront_private_token, "SHOPIFY_STOREFRONT_PRIVATE_TOKEN")?;

        Ok(Self {
            store: get_required_env("SHOPIFY_STORE")?,
            api_version: get_env_or_default("SHOPIFY_API_VERSION", "2026-01"),
            storefront_private_token,
        })
    }
}

impl CheckoutConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if the access token fails validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let shopify = ShopifyStorefrontConfig::from_env()?;

        let addon = get_optional_env("CHECKOUT_PRODUCT_TAG")
            .map_or_else(AddonSettings::default, AddonSettings::with_tag);

        let benefits = BenefitsSettings::new(get_optional_env("CHECKOUT_FEATURES_TITLE"));

        let currency = get_env_or_default("CHECKOUT_CURRENCY", "USD")
            .parse::<CurrencyCode>()
            .map_err(|e| ConfigError::InvalidEnvVar("CHECKOUT_CURRENCY".to_string(), e.to_string()))?;

        Ok(Self {
            shopify,
            addon,
            benefits,
            currency,
            locale: get_env_or_default("CHECKOUT_LOCALE", "en-US"),
        })
    }

    /// Price formatter for the configured currency and locale.
    #[must_use]
    pub fn currency_formatter(&self) -> ShopperCurrencyFormatter {
        ShopperCurrencyFormatter::new(self.currency.clone(), &self.locale)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable. Blank values count as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

fn validate_token_length(secret: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    let value = secret.expose_secret();
    if value.len() < MIN_TOKEN_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {} characters (got {})",
                MIN_TOKEN_LENGTH,
                value.len()
            ),
        ));
    }
    Ok(())
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)]
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Copy the token from the Shopify admin."
            ),
        ));
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}
