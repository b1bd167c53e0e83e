//! Shopify Storefront API client implementation.
//!
//! Uses `graphql_client` for the query/response envelope with `reqwest` 0.13
//! for HTTP. Caches catalog and metaobject reads using `moka` (5-minute TTL).

mod cache;
mod cart;
mod conversions;

pub mod queries;

use std::sync::Arc;
use std::time::Duration;

use graphql_client::{GraphQLQuery, Response};
use moka::future::Cache;
use naked_pineapple_core::CartId;
use secrecy::ExposeSecret;
use tracing::{debug, instrument};

use crate::config::ShopifyStorefrontConfig;
use crate::shopify::types::{Cart, CartLineInput, CartUserError, Metaobject, Product};
use crate::shopify::{GraphQLError, GraphQLErrorLocation, ShopifyError};

pub use cart::StorefrontCart;

use cache::{CacheKey, CacheValue};
use conversions::{convert_cart, convert_metaobject, convert_product, convert_user_error};
use queries::{
    AddCheckoutCartLines, GetCheckoutBenefits, GetCheckoutCart, GetCheckoutProducts,
    add_checkout_cart_lines, get_checkout_benefits, get_checkout_cart, get_checkout_products,
};

/// Longest response body excerpt written to logs.
const LOG_BODY_LIMIT: usize = 500;

/// Build the Storefront search query selecting products by tag.
///
/// Tags containing whitespace or quotes are quoted so the search syntax
/// treats them as a single term.
///
/// ```
/// use naked_pineapple_checkout::shopify::tag_search_query;
///
/// assert_eq!(tag_search_query("checkout-product"), "tag:checkout-product");
/// assert_eq!(tag_search_query("add on"), "tag:\"add on\"");
/// ```
#[must_use]
pub fn tag_search_query(tag: &str) -> String {
    let tag = tag.trim();
    if tag.chars().any(|c| c.is_whitespace() || c == '"' || c == '\'') {
        format!("tag:\"{}\"", tag.replace('\\', "\\\\").replace('"', "\\\""))
    } else {
        format!("tag:{tag}")
    }
}

fn snippet(body: &str) -> String {
    body.chars().take(LOG_BODY_LIMIT).collect()
}

fn join_user_errors(errors: Vec<CartUserError>) -> String {
    errors
        .into_iter()
        .map(|e| e.message)
        .collect::<Vec<_>>()
        .join("; ")
}

// =============================================================================
// StorefrontClient
// =============================================================================

/// Client for the Shopify Storefront API.
///
/// Provides the catalog, metaobject and cart operations the checkout widgets
/// need. Catalog and metaobject reads are cached for 5 minutes.
#[derive(Clone)]
pub struct StorefrontClient {
    inner: Arc<StorefrontClientInner>,
}

struct StorefrontClientInner {
    client: reqwest::Client,
    endpoint: url::Url,
    access_token: String,
    cache: Cache<CacheKey, CacheValue>,
}

impl StorefrontClient {
    /// Create a new Storefront API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the store domain and API version do not form a
    /// valid endpoint URL.
    pub fn new(config: &ShopifyStorefrontConfig) -> Result<Self, ShopifyError> {
        let cache = Cache::builder()
            .max_capacity(100)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Ok(Self {
            inner: Arc::new(StorefrontClientInner {
                client: reqwest::Client::new(),
                endpoint: config.endpoint()?,
                access_token: config.storefront_private_token.expose_secret().to_string(),
                cache,
            }),
        })
    }

    /// The GraphQL endpoint requests are sent to.
    #[must_use]
    pub fn endpoint(&self) -> &url::Url {
        &self.inner.endpoint
    }

    /// Execute a GraphQL operation.
    async fn execute<Q: GraphQLQuery>(
        &self,
        variables: Q::Variables,
    ) -> Result<Q::ResponseData, ShopifyError> {
        let request_body = Q::build_query(variables);

        let response = self
            .inner
            .client
            .post(self.inner.endpoint.clone())
            .header(
                "Shopify-Storefront-Private-Token",
                &self.inner.access_token,
            )
            .header("Content-Type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(ShopifyError::RateLimited(retry_after));
        }

        // Read the body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                operation = request_body.operation_name,
                body = %snippet(&response_text),
                "Shopify API returned non-success status"
            );
            return Err(ShopifyError::graphql_message(format!(
                "HTTP {status}: {}",
                response_text.chars().take(200).collect::<String>()
            )));
        }

        debug!(
            operation = request_body.operation_name,
            body = %snippet(&response_text),
            "Shopify GraphQL response"
        );

        let response: Response<Q::ResponseData> = match serde_json::from_str(&response_text) {
            Ok(r) => r,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    operation = request_body.operation_name,
                    body = %snippet(&response_text),
                    "Failed to parse Shopify GraphQL response"
                );
                return Err(ShopifyError::Parse(e));
            }
        };

        if let Some(errors) = response.errors
            && !errors.is_empty()
        {
            debug!(errors = ?errors, "GraphQL errors in response");

            return Err(ShopifyError::GraphQL(
                errors
                    .into_iter()
                    .map(|e| GraphQLError {
                        message: e.message,
                        locations: e.locations.map_or_else(Vec::new, |locs| {
                            locs.into_iter()
                                .map(|l| GraphQLErrorLocation {
                                    line: i64::from(l.line),
                                    column: i64::from(l.column),
                                })
                                .collect()
                        }),
                        path: e.path.map_or_else(Vec::new, |p| {
                            p.into_iter()
                                .map(|fragment| match fragment {
                                    graphql_client::PathFragment::Key(s) => {
                                        serde_json::Value::String(s)
                                    }
                                    graphql_client::PathFragment::Index(i) => {
                                        serde_json::Value::Number(i.into())
                                    }
                                })
                                .collect()
                        }),
                    })
                    .collect(),
            ));
        }

        response.data.ok_or_else(|| {
            tracing::error!(
                operation = request_body.operation_name,
                body = %snippet(&response_text),
                "Shopify GraphQL response has no data and no errors"
            );
            ShopifyError::graphql_message("No data in response")
        })
    }

    // =========================================================================
    // Catalog Methods
    // =========================================================================

    /// Get up to `first` products carrying `tag`, in server order.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn get_tagged_products(
        &self,
        tag: &str,
        first: i64,
    ) -> Result<Vec<Product>, ShopifyError> {
        let query = tag_search_query(tag);
        let cache_key = CacheKey::TaggedProducts {
            query: query.clone(),
            first,
        };

        if let Some(CacheValue::Products(products)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for tagged products");
            return Ok(products);
        }

        let data = self
            .execute::<GetCheckoutProducts>(get_checkout_products::Variables { first, query })
            .await?;

        let products: Vec<Product> = data.products.into_nodes().map(convert_product).collect();

        self.inner
            .cache
            .insert(cache_key, CacheValue::Products(products.clone()))
            .await;

        Ok(products)
    }

    /// Get up to `first` metaobjects of the given type.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn get_metaobjects(
        &self,
        metaobject_type: &str,
        first: i64,
    ) -> Result<Vec<Metaobject>, ShopifyError> {
        let cache_key = CacheKey::Metaobjects {
            metaobject_type: metaobject_type.to_string(),
            first,
        };

        if let Some(CacheValue::Metaobjects(metaobjects)) = self.inner.cache.get(&cache_key).await
        {
            debug!("Cache hit for metaobjects");
            return Ok(metaobjects);
        }

        let data = self
            .execute::<GetCheckoutBenefits>(get_checkout_benefits::Variables {
                first,
                metaobject_type: metaobject_type.to_string(),
            })
            .await?;

        let metaobjects: Vec<Metaobject> = data
            .metaobjects
            .into_nodes()
            .map(convert_metaobject)
            .collect();

        self.inner
            .cache
            .insert(cache_key, CacheValue::Metaobjects(metaobjects.clone()))
            .await;

        Ok(metaobjects)
    }

    // =========================================================================
    // Cart Methods (not cached - mutable state)
    // =========================================================================

    /// Get an existing cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart is not found or the API request fails.
    #[instrument(skip(self), fields(cart_id = %cart_id))]
    pub async fn get_cart(&self, cart_id: &CartId) -> Result<Cart, ShopifyError> {
        let data = self
            .execute::<GetCheckoutCart>(get_checkout_cart::Variables {
                cart_id: cart_id.to_string(),
            })
            .await?;

        data.cart
            .map(convert_cart)
            .ok_or_else(|| ShopifyError::NotFound(format!("Cart not found: {cart_id}")))
    }

    /// Add lines to a cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart update fails or user errors are returned.
    #[instrument(skip(self, lines), fields(cart_id = %cart_id))]
    pub async fn add_cart_lines(
        &self,
        cart_id: &CartId,
        lines: Vec<CartLineInput>,
    ) -> Result<Cart, ShopifyError> {
        let variables = add_checkout_cart_lines::Variables {
            cart_id: cart_id.to_string(),
            lines: lines
                .into_iter()
                .map(|line| add_checkout_cart_lines::CartLineInput {
                    merchandise_id: line.merchandise_id.into_inner(),
                    quantity: Some(line.quantity),
                })
                .collect(),
        };

        let data = self.execute::<AddCheckoutCartLines>(variables).await?;

        if let Some(result) = data.cart_lines_add {
            if !result.user_errors.is_empty() {
                return Err(ShopifyError::UserError(join_user_errors(
                    result
                        .user_errors
                        .into_iter()
                        .map(convert_user_error)
                        .collect(),
                )));
            }

            if let Some(cart) = result.cart {
                return Ok(convert_cart(cart));
            }
        }

        Err(ShopifyError::graphql_message("Failed to add to cart"))
    }
}
