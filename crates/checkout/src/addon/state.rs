//! Widget state and its reducer.
//!
//! All state transitions of the add-on widget go through
//! [`WidgetState::reduce`], which is pure: side effects (catalog fetch, cart
//! mutation) are returned as an [`Effect`] for the caller to run.

use naked_pineapple_core::VariantId;

use crate::host::{CartLineChange, CartSnapshot};
use crate::shopify::types::Product;

use super::availability::available_products;
use super::rotation::{compute_next_index, select};

/// Initialization phase of the widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Nothing requested yet.
    #[default]
    Uninitialized,
    /// Catalog fetch in flight.
    Loading,
    /// Catalog fetched (or failed and treated as empty).
    Ready,
}

/// Inputs to the reducer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetAction {
    /// The widget was mounted by the host.
    MountRequested,
    /// The catalog query returned these products, in server order.
    FetchSucceeded(Vec<Product>),
    /// The catalog query failed.
    FetchFailed,
    /// The shopper pressed the add button while `cart` was current.
    AddStarted { cart: CartSnapshot },
    /// The host applied the cart change.
    AddSucceeded {
        merchandise_id: VariantId,
        cart: CartSnapshot,
    },
    /// The host rejected the cart change.
    AddFailed {
        merchandise_id: VariantId,
        cart: CartSnapshot,
    },
    /// The pending add was dropped before the host answered.
    AddAbandoned,
    /// The pending catalog fetch was dropped before it returned.
    FetchAbandoned,
    /// A render pass read `cart` from the host.
    CartObserved { cart: CartSnapshot },
}

/// Why an add request did not dispatch a mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddRejection {
    /// A mutation is already in flight.
    Busy,
    /// No product with a purchasable variant is selected.
    NothingSelected,
}

/// Side effect requested by a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Nothing to do.
    None,
    /// Run the one-shot catalog query.
    FetchCatalog,
    /// Send this change to the host cart.
    ApplyCartChange(CartLineChange),
    /// The add request was refused.
    Rejected(AddRejection),
}

/// Merchandise added successfully that the snapshot did not show at
/// settlement.
///
/// Lives for at most one render: it is dropped once a snapshot contains it,
/// once the snapshot moves away from `settled_cart`, or after the first
/// render that still lagged.
#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingLine {
    merchandise_id: VariantId,
    settled_cart: CartSnapshot,
    rendered: bool,
}

impl PendingLine {
    /// Whether the line still covers a lagging snapshot after `cart` was read.
    fn survives(&mut self, cart: &CartSnapshot) -> bool {
        if self.rendered || cart.contains(&self.merchandise_id) || *cart != self.settled_cart {
            return false;
        }
        self.rendered = true;
        true
    }
}

/// State of one add-on widget instance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WidgetState {
    phase: Phase,
    products: Vec<Product>,
    selected_index: usize,
    adding: bool,
    error: bool,
    awaiting_cart: Vec<PendingLine>,
}

impl WidgetState {
    /// Fresh state for a newly mounted widget.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Products exactly as fetched.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Rotation pointer into the available list (not yet wrapped).
    #[must_use]
    pub const fn selected_index(&self) -> usize {
        self.selected_index
    }

    /// True between mutation start and settlement.
    #[must_use]
    pub const fn is_adding(&self) -> bool {
        self.adding
    }

    /// True once a mutation has failed. Never cleared by a later success.
    #[must_use]
    pub const fn has_error(&self) -> bool {
        self.error
    }

    /// Merchandise added by this widget that the cart has not reflected yet.
    #[must_use]
    pub fn awaiting_cart(&self) -> Vec<&VariantId> {
        self.awaiting_cart
            .iter()
            .map(|line| &line.merchandise_id)
            .collect()
    }

    /// The cart as this widget should treat it: the host snapshot plus any
    /// merchandise it has already added successfully.
    #[must_use]
    pub fn effective_cart(&self, cart: &CartSnapshot) -> CartSnapshot {
        if self.awaiting_cart.is_empty() {
            return cart.clone();
        }

        cart.merchandise_ids()
            .iter()
            .chain(self.awaiting_cart.iter().map(|line| &line.merchandise_id))
            .cloned()
            .collect()
    }

    /// Products that can be offered against `cart`, in catalog order.
    #[must_use]
    pub fn available<'a>(&'a self, cart: &CartSnapshot) -> Vec<&'a Product> {
        available_products(&self.products, &self.effective_cart(cart))
    }

    /// The product currently offered, if any.
    #[must_use]
    pub fn selected(&self, cart: &CartSnapshot) -> Option<&Product> {
        select(&self.available(cart), self.selected_index)
    }

    /// Apply `action` and return the effect the caller must run.
    pub fn reduce(&mut self, action: WidgetAction) -> Effect {
        match action {
            WidgetAction::MountRequested => {
                if self.phase != Phase::Uninitialized {
                    return Effect::None;
                }
                self.phase = Phase::Loading;
                Effect::FetchCatalog
            }

            WidgetAction::FetchSucceeded(products) => {
                if self.phase == Phase::Loading {
                    self.products = products;
                    self.phase = Phase::Ready;
                }
                Effect::None
            }

            WidgetAction::FetchFailed => {
                if self.phase == Phase::Loading {
                    self.products.clear();
                    self.phase = Phase::Ready;
                }
                Effect::None
            }

            WidgetAction::AddStarted { cart } => {
                if self.adding {
                    return Effect::Rejected(AddRejection::Busy);
                }

                let Some(merchandise_id) = self
                    .selected(&cart)
                    .and_then(Product::primary_variant_id)
                    .cloned()
                else {
                    return Effect::Rejected(AddRejection::NothingSelected);
                };

                self.adding = true;
                Effect::ApplyCartChange(CartLineChange::add_one(merchandise_id))
            }

            WidgetAction::AddSucceeded {
                merchandise_id,
                cart,
            } => {
                self.adding = false;
                self.advance(&cart, &merchandise_id);
                self.awaiting_cart
                    .retain(|line| line.merchandise_id != merchandise_id);
                if !cart.contains(&merchandise_id) {
                    self.awaiting_cart.push(PendingLine {
                        merchandise_id,
                        settled_cart: cart,
                        rendered: false,
                    });
                }
                Effect::None
            }

            WidgetAction::AddFailed {
                merchandise_id,
                cart,
            } => {
                self.adding = false;
                self.error = true;
                self.advance(&cart, &merchandise_id);
                Effect::None
            }

            // Settled without an answer: no rotation, no error.
            WidgetAction::AddAbandoned => {
                self.adding = false;
                Effect::None
            }

            WidgetAction::FetchAbandoned => {
                if self.phase == Phase::Loading {
                    self.phase = Phase::Uninitialized;
                }
                Effect::None
            }

            WidgetAction::CartObserved { cart } => {
                self.awaiting_cart.retain_mut(|line| line.survives(&cart));
                Effect::None
            }
        }
    }

    /// Rotation advances after every attempt, successful or not.
    fn advance(&mut self, cart: &CartSnapshot, attempted: &VariantId) {
        let effective = self.effective_cart(cart);
        self.selected_index =
            compute_next_index(&self.products, &effective, attempted, self.selected_index);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::addon::test_support::{cart, product, product_without_variant};

    fn ready(products: Vec<Product>) -> WidgetState {
        let mut state = WidgetState::new();
        assert_eq!(state.reduce(WidgetAction::MountRequested), Effect::FetchCatalog);
        state.reduce(WidgetAction::FetchSucceeded(products));
        state
    }

    fn abc() -> Vec<Product> {
        vec![product("A", "a1"), product("B", "b1"), product("C", "c1")]
    }

    fn title(state: &WidgetState, snapshot: &CartSnapshot) -> Option<String> {
        state.selected(snapshot).map(|p| p.title.clone())
    }

    #[test]
    fn test_initial_state() {
        let state = WidgetState::new();
        assert_eq!(state.phase(), Phase::Uninitialized);
        assert!(state.products().is_empty());
        assert_eq!(state.selected_index(), 0);
        assert!(!state.is_adding());
        assert!(!state.has_error());
    }

    #[test]
    fn test_mount_only_fetches_once() {
        let mut state = WidgetState::new();
        assert_eq!(state.reduce(WidgetAction::MountRequested), Effect::FetchCatalog);
        assert_eq!(state.phase(), Phase::Loading);
        assert_eq!(state.reduce(WidgetAction::MountRequested), Effect::None);

        state.reduce(WidgetAction::FetchSucceeded(abc()));
        assert_eq!(state.phase(), Phase::Ready);
        assert_eq!(state.reduce(WidgetAction::MountRequested), Effect::None);
    }

    #[test]
    fn test_late_fetch_result_is_ignored() {
        let mut state = ready(abc());
        state.reduce(WidgetAction::FetchSucceeded(vec![product("Z", "z1")]));
        assert_eq!(state.products().len(), 3);
    }

    #[test]
    fn test_fetch_failure_is_an_empty_catalog() {
        let mut state = WidgetState::new();
        state.reduce(WidgetAction::MountRequested);
        state.reduce(WidgetAction::FetchFailed);
        assert_eq!(state.phase(), Phase::Ready);
        assert!(state.products().is_empty());
        assert!(state.selected(&cart(&[])).is_none());
    }

    #[test]
    fn test_add_started_dispatches_selected_variant() {
        let mut state = ready(abc());
        let effect = state.reduce(WidgetAction::AddStarted { cart: cart(&[]) });
        assert_eq!(
            effect,
            Effect::ApplyCartChange(CartLineChange::add_one(VariantId::from("a1")))
        );
        assert!(state.is_adding());
    }

    #[test]
    fn test_second_add_while_adding_is_rejected() {
        let mut state = ready(abc());
        state.reduce(WidgetAction::AddStarted { cart: cart(&[]) });
        let effect = state.reduce(WidgetAction::AddStarted { cart: cart(&[]) });
        assert_eq!(effect, Effect::Rejected(AddRejection::Busy));
        assert!(state.is_adding());
    }

    #[test]
    fn test_add_with_nothing_selected() {
        let mut state = ready(vec![product_without_variant("Ghost")]);
        let effect = state.reduce(WidgetAction::AddStarted { cart: cart(&[]) });
        assert_eq!(effect, Effect::Rejected(AddRejection::NothingSelected));
        assert!(!state.is_adding());

        let mut loading = WidgetState::new();
        assert_eq!(
            loading.reduce(WidgetAction::AddStarted { cart: cart(&[]) }),
            Effect::Rejected(AddRejection::NothingSelected)
        );
    }

    #[test]
    fn test_successful_add_advances_with_lagging_cart() {
        let mut state = ready(abc());
        state.reduce(WidgetAction::AddStarted { cart: cart(&[]) });
        state.reduce(WidgetAction::AddSucceeded {
            merchandise_id: VariantId::from("a1"),
            cart: cart(&[]),
        });

        assert!(!state.is_adding());
        assert!(!state.has_error());
        assert_eq!(state.selected_index(), 1);
        assert_eq!(state.awaiting_cart(), vec![&VariantId::from("a1")]);
        // Remaining [B, C], pointer 1.
        assert_eq!(title(&state, &cart(&[])).as_deref(), Some("C"));

        // The cart catches up; the selection does not jump.
        state.reduce(WidgetAction::CartObserved { cart: cart(&["a1"]) });
        assert!(state.awaiting_cart().is_empty());
        assert_eq!(title(&state, &cart(&["a1"])).as_deref(), Some("C"));
    }

    #[test]
    fn test_two_products_never_reoffer_added_one() {
        let mut state = ready(vec![product("A", "a1"), product("B", "b1")]);
        state.reduce(WidgetAction::AddStarted { cart: cart(&[]) });
        state.reduce(WidgetAction::AddSucceeded {
            merchandise_id: VariantId::from("a1"),
            cart: cart(&[]),
        });

        assert_eq!(title(&state, &cart(&[])).as_deref(), Some("B"));
    }

    #[test]
    fn test_failed_add_sets_error_and_still_advances() {
        let mut state = ready(abc());
        // Move the pointer to B first.
        state.reduce(WidgetAction::AddStarted { cart: cart(&[]) });
        state.reduce(WidgetAction::AddFailed {
            merchandise_id: VariantId::from("a1"),
            cart: cart(&[]),
        });
        assert_eq!(title(&state, &cart(&[])).as_deref(), Some("B"));

        state.reduce(WidgetAction::AddStarted { cart: cart(&[]) });
        state.reduce(WidgetAction::AddFailed {
            merchandise_id: VariantId::from("b1"),
            cart: cart(&[]),
        });

        assert!(!state.is_adding());
        assert!(state.has_error());
        assert!(state.awaiting_cart().is_empty());
        // Remaining without B is [A, C]; (1 + 1) mod 2 = 0.
        assert_eq!(state.selected_index(), 0);
        assert_eq!(title(&state, &cart(&[])).as_deref(), Some("A"));
    }

    #[test]
    fn test_error_flag_is_sticky_across_success() {
        let mut state = ready(abc());
        state.reduce(WidgetAction::AddStarted { cart: cart(&[]) });
        state.reduce(WidgetAction::AddFailed {
            merchandise_id: VariantId::from("a1"),
            cart: cart(&[]),
        });
        state.reduce(WidgetAction::AddStarted { cart: cart(&[]) });
        state.reduce(WidgetAction::AddSucceeded {
            merchandise_id: VariantId::from("b1"),
            cart: cart(&["b1"]),
        });

        assert!(state.has_error());
    }

    #[test]
    fn test_last_product_added_resets_pointer() {
        let mut state = ready(vec![product("A", "a1")]);
        state.reduce(WidgetAction::AddStarted { cart: cart(&[]) });
        state.reduce(WidgetAction::AddSucceeded {
            merchandise_id: VariantId::from("a1"),
            cart: cart(&["a1"]),
        });

        assert_eq!(state.selected_index(), 0);
        assert!(state.awaiting_cart().is_empty());
        assert!(state.selected(&cart(&["a1"])).is_none());
    }

    #[test]
    fn test_removed_line_is_offered_again() {
        let mut state = ready(abc());
        state.reduce(WidgetAction::AddStarted { cart: cart(&[]) });
        state.reduce(WidgetAction::AddSucceeded {
            merchandise_id: VariantId::from("a1"),
            cart: cart(&[]),
        });
        state.reduce(WidgetAction::CartObserved { cart: cart(&["a1"]) });

        // The shopper removes A elsewhere.
        let available: Vec<_> = state
            .available(&cart(&[]))
            .into_iter()
            .map(|p| p.title.clone())
            .collect();
        assert_eq!(available, vec!["A", "B", "C"]);
    }

    fn settle_lagging(state: &mut WidgetState, merchandise_id: &str) {
        state.reduce(WidgetAction::AddStarted { cart: cart(&[]) });
        state.reduce(WidgetAction::AddSucceeded {
            merchandise_id: VariantId::from(merchandise_id),
            cart: cart(&[]),
        });
    }

    #[test]
    fn test_pending_line_covers_one_lagging_render() {
        let mut state = ready(vec![product("A", "a1"), product("B", "b1")]);
        settle_lagging(&mut state, "a1");

        state.reduce(WidgetAction::CartObserved { cart: cart(&[]) });
        assert_eq!(title(&state, &cart(&[])).as_deref(), Some("B"));

        // A second empty snapshot means the line is gone, not late.
        state.reduce(WidgetAction::CartObserved { cart: cart(&[]) });
        assert!(state.awaiting_cart().is_empty());
        let available: Vec<_> = state
            .available(&cart(&[]))
            .into_iter()
            .map(|p| p.title.clone())
            .collect();
        assert_eq!(available, vec!["A", "B"]);
    }

    #[test]
    fn test_pending_line_dropped_when_snapshot_moves() {
        let mut state = ready(abc());
        settle_lagging(&mut state, "a1");

        // Another line shows up but A never does.
        state.reduce(WidgetAction::CartObserved {
            cart: cart(&["c1"]),
        });
        assert!(state.awaiting_cart().is_empty());
        assert!(state.available(&cart(&["c1"])).iter().any(|p| p.title == "A"));
    }

    #[test]
    fn test_abandoned_add_clears_busy_without_advancing() {
        let mut state = ready(abc());
        state.reduce(WidgetAction::AddStarted { cart: cart(&[]) });
        state.reduce(WidgetAction::AddAbandoned);

        assert!(!state.is_adding());
        assert!(!state.has_error());
        assert_eq!(state.selected_index(), 0);
        assert!(state.awaiting_cart().is_empty());
        assert!(matches!(
            state.reduce(WidgetAction::AddStarted { cart: cart(&[]) }),
            Effect::ApplyCartChange(_)
        ));
    }

    #[test]
    fn test_abandoned_fetch_allows_mount_again() {
        let mut state = WidgetState::new();
        state.reduce(WidgetAction::MountRequested);
        state.reduce(WidgetAction::FetchAbandoned);
        assert_eq!(state.phase(), Phase::Uninitialized);
        assert_eq!(state.reduce(WidgetAction::MountRequested), Effect::FetchCatalog);

        // No effect once the catalog is in.
        state.reduce(WidgetAction::FetchSucceeded(abc()));
        state.reduce(WidgetAction::FetchAbandoned);
        assert_eq!(state.phase(), Phase::Ready);
    }
}
