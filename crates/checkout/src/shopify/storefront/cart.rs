//! Cart host backed by a Storefront API cart.

use std::sync::{Arc, PoisonError, RwLock};

use naked_pineapple_core::CartId;
use tracing::{info, instrument, warn};

use crate::host::{CartChangeResult, CartHost, CartLineChange, CartSnapshot};
use crate::shopify::ShopifyError;
use crate::shopify::types::{Cart, CartLineInput};

use super::StorefrontClient;

/// A Storefront cart exposed to the widgets as a [`CartHost`].
///
/// The line snapshot is the last cart state observed from Shopify: it is
/// refreshed on demand and replaced with the cart returned by every
/// successful mutation. Changes made elsewhere (another tab, the admin)
/// show up after the next [`StorefrontCart::refresh`].
#[derive(Clone)]
pub struct StorefrontCart {
    client: StorefrontClient,
    cart_id: CartId,
    lines: Arc<RwLock<CartSnapshot>>,
}

impl StorefrontCart {
    /// Fetch the cart and bind it to the client.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart is not found or the API request fails.
    pub async fn load(client: StorefrontClient, cart_id: CartId) -> Result<Self, ShopifyError> {
        let cart = client.get_cart(&cart_id).await?;
        let lines = CartSnapshot::from_lines(&cart.lines);

        Ok(Self {
            client,
            cart_id,
            lines: Arc::new(RwLock::new(lines)),
        })
    }

    /// The bound cart id.
    #[must_use]
    pub const fn cart_id(&self) -> &CartId {
        &self.cart_id
    }

    /// Re-read the cart from Shopify and replace the snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart is not found or the API request fails.
    #[instrument(skip(self), fields(cart_id = %self.cart_id))]
    pub async fn refresh(&self) -> Result<CartSnapshot, ShopifyError> {
        let cart = self.client.get_cart(&self.cart_id).await?;
        Ok(self.store(&cart))
    }

    fn store(&self, cart: &Cart) -> CartSnapshot {
        let snapshot = CartSnapshot::from_lines(&cart.lines);
        *self.lines.write().unwrap_or_else(PoisonError::into_inner) = snapshot.clone();
        snapshot
    }
}

impl CartHost for StorefrontCart {
    fn cart_lines(&self) -> CartSnapshot {
        self.lines
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[instrument(skip(self), fields(cart_id = %self.cart_id))]
    async fn apply_cart_lines_change(&self, change: CartLineChange) -> CartChangeResult {
        let CartLineChange::AddCartLine {
            merchandise_id,
            quantity,
        } = change;

        let lines = vec![CartLineInput {
            merchandise_id,
            quantity: i64::from(quantity),
        }];

        match self.client.add_cart_lines(&self.cart_id, lines).await {
            Ok(cart) => {
                let snapshot = self.store(&cart);
                info!(lines = snapshot.len(), "Cart lines added");
                CartChangeResult::Success
            }
            Err(e) => {
                warn!(error = %e, "Cart line change failed");
                CartChangeResult::Error {
                    message: e.to_string(),
                }
            }
        }
    }
}
