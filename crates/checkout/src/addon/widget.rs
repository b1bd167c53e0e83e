//! The add-on widget: reducer plus host wiring.

use std::sync::{Mutex, MutexGuard, PoisonError};

use naked_pineapple_core::VariantId;
use tracing::{debug, info, instrument, warn};

use crate::error::{cart_add_breadcrumb, report_cart_failure};
use crate::format::CurrencyFormatter;
use crate::host::{CartChangeResult, CartHost, CartLineChange, CatalogSource};
use crate::shopify::types::Product;

use super::state::{AddRejection, Effect, WidgetAction, WidgetState};
use super::view::AddonView;
use super::{AddonSettings, CATALOG_PAGE_SIZE};

/// What [`AddonWidget::add_current_selection`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    /// The host applied the change.
    Added { merchandise_id: VariantId },
    /// The host rejected the change; `message` is the host's reason.
    Failed {
        merchandise_id: VariantId,
        message: String,
    },
    /// Another add is still in flight.
    Busy,
    /// There is no product to add.
    NothingSelected,
}

/// Reports a pending host call as abandoned if its future is dropped before
/// settling.
struct SettleGuard<'a> {
    state: &'a Mutex<WidgetState>,
    on_drop: Option<WidgetAction>,
}

impl<'a> SettleGuard<'a> {
    const fn new(state: &'a Mutex<WidgetState>, on_drop: WidgetAction) -> Self {
        Self {
            state,
            on_drop: Some(on_drop),
        }
    }

    /// The call settled normally.
    fn disarm(mut self) {
        self.on_drop = None;
    }
}

impl Drop for SettleGuard<'_> {
    fn drop(&mut self) {
        if let Some(action) = self.on_drop.take() {
            debug!(?action, "Pending host call dropped");
            lock_state(self.state).reduce(action);
        }
    }
}

fn lock_state(state: &Mutex<WidgetState>) -> MutexGuard<'_, WidgetState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// One mounted add-on widget.
///
/// State lives behind a short-lived lock that is never held across an
/// `await`, so [`view`](Self::view) can be taken while a mutation is pending
/// and a second [`add_current_selection`](Self::add_current_selection)
/// observes the in-flight flag and returns [`AddOutcome::Busy`].
pub struct AddonWidget<C, H, F> {
    catalog: C,
    cart: H,
    formatter: F,
    settings: AddonSettings,
    state: Mutex<WidgetState>,
}

impl<C, H, F> AddonWidget<C, H, F>
where
    C: CatalogSource,
    H: CartHost,
    F: CurrencyFormatter,
{
    /// Create an unmounted widget.
    pub fn new(catalog: C, cart: H, formatter: F, settings: AddonSettings) -> Self {
        Self {
            catalog,
            cart,
            formatter,
            settings,
            state: Mutex::new(WidgetState::new()),
        }
    }

    pub const fn settings(&self) -> &AddonSettings {
        &self.settings
    }

    /// The cart host the widget mutates.
    pub const fn cart(&self) -> &H {
        &self.cart
    }

    fn lock(&self) -> MutexGuard<'_, WidgetState> {
        lock_state(&self.state)
    }

    fn dispatch(&self, action: WidgetAction) -> Effect {
        self.lock().reduce(action)
    }

    /// A copy of the current state.
    pub fn state(&self) -> WidgetState {
        self.lock().clone()
    }

    /// Run the one-shot catalog fetch.
    ///
    /// Only the first call queries the catalog; later calls return `false`
    /// immediately. A failed query is logged and leaves the widget with an
    /// empty catalog, so it renders nothing. If the returned future is dropped
    /// before the query returns, the widget goes back to unmounted.
    #[instrument(skip(self), fields(tag = %self.settings.product_tag))]
    pub async fn mount(&self) -> bool {
        if self.dispatch(WidgetAction::MountRequested) != Effect::FetchCatalog {
            return false;
        }

        let guard = SettleGuard::new(&self.state, WidgetAction::FetchAbandoned);
        let fetched = self
            .catalog
            .tagged_products(&self.settings.product_tag, CATALOG_PAGE_SIZE)
            .await;
        guard.disarm();

        match fetched {
            Ok(products) => {
                debug!(?products, "Add-on catalog response");
                info!(count = products.len(), "Add-on catalog loaded");
                self.dispatch(WidgetAction::FetchSucceeded(products));
            }
            Err(e) => {
                warn!(error = %e, "Add-on catalog fetch failed");
                self.dispatch(WidgetAction::FetchFailed);
            }
        }

        true
    }

    /// Products that can still be offered, in catalog order.
    pub fn available_products(&self) -> Vec<Product> {
        let cart = self.cart.cart_lines();
        self.lock()
            .available(&cart)
            .into_iter()
            .cloned()
            .collect()
    }

    /// The product currently offered.
    pub fn selected_product(&self) -> Option<Product> {
        let cart = self.cart.cart_lines();
        self.lock().selected(&cart).cloned()
    }

    /// Build the view for the live cart.
    pub fn view(&self) -> AddonView {
        let cart = self.cart.cart_lines();
        let mut state = self.lock();
        state.reduce(WidgetAction::CartObserved { cart: cart.clone() });
        AddonView::build(&state, &cart, &self.formatter)
    }

    /// Render the current view as HTML.
    ///
    /// # Errors
    ///
    /// Returns an error if template rendering fails.
    pub fn render_html(&self) -> Result<String, askama::Error> {
        self.view().render_html(&self.settings.heading)
    }

    /// Add one unit of the offered product to the cart.
    ///
    /// Whatever the outcome of the mutation, the rotation then advances to
    /// the next available product. Dropping the future before the host
    /// answers releases the busy flag and leaves the rotation where it was.
    #[instrument(skip(self))]
    pub async fn add_current_selection(&self) -> AddOutcome {
        let cart = self.cart.cart_lines();
        let change = match self.dispatch(WidgetAction::AddStarted { cart }) {
            Effect::ApplyCartChange(change) => change,
            Effect::Rejected(AddRejection::Busy) => {
                debug!("Add ignored, mutation in flight");
                return AddOutcome::Busy;
            }
            Effect::Rejected(AddRejection::NothingSelected) | Effect::None | Effect::FetchCatalog => {
                return AddOutcome::NothingSelected;
            }
        };

        let CartLineChange::AddCartLine { merchandise_id, .. } = &change;
        let merchandise_id = merchandise_id.clone();
        cart_add_breadcrumb(&merchandise_id);

        let guard = SettleGuard::new(&self.state, WidgetAction::AddAbandoned);
        let result = self.cart.apply_cart_lines_change(change).await;
        guard.disarm();
        let cart = self.cart.cart_lines();

        match result {
            CartChangeResult::Success => {
                info!(merchandise_id = %merchandise_id, "Add-on added to cart");
                self.dispatch(WidgetAction::AddSucceeded {
                    merchandise_id: merchandise_id.clone(),
                    cart,
                });
                AddOutcome::Added { merchandise_id }
            }
            CartChangeResult::Error { message } => {
                report_cart_failure(&merchandise_id, &message);
                self.dispatch(WidgetAction::AddFailed {
                    merchandise_id: merchandise_id.clone(),
                    cart,
                });
                AddOutcome::Failed {
                    merchandise_id,
                    message,
                }
            }
        }
    }
}
