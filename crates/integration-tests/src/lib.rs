//! Integration tests for the Naked Pineapple checkout widgets.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p naked-pineapple-integration-tests
//! ```
//!
//! The widgets run against the in-memory hosts defined here. Nothing talks
//! to Shopify.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use naked_pineapple_checkout::host::{
    BenefitSource, CartChangeResult, CartHost, CartLineChange, CartSnapshot, CatalogSource,
};
use naked_pineapple_checkout::shopify::types::{
    Image, Metaobject, MetaobjectField, PrimaryVariant, Product,
};
use naked_pineapple_checkout::{AddonSettings, AddonWidget, ShopperCurrencyFormatter};
use naked_pineapple_core::{CurrencyCode, MetaobjectId, Price, ProductId, VariantId};
use rust_decimal::Decimal;
use tokio::sync::Notify;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// =============================================================================
// Fixtures
// =============================================================================

/// A product priced at `cents` USD with an image and one variant.
#[must_use]
pub fn priced_product(title: &str, variant_id: &str, cents: i64) -> Product {
    Product {
        id: ProductId::from_resource_id(title),
        title: title.to_string(),
        handle: title.to_lowercase().replace(' ', "-"),
        tags: vec!["checkout-product".to_string()],
        featured_image: Some(Image {
            url: format!("https://cdn.shopify.com/{}.png", title.to_lowercase()),
            alt_text: None,
        }),
        primary_variant: Some(PrimaryVariant {
            id: VariantId::new(variant_id),
            price: Price::new(Decimal::new(cents, 2), CurrencyCode::USD),
        }),
    }
}

/// A $10.00 product.
#[must_use]
pub fn product(title: &str, variant_id: &str) -> Product {
    priced_product(title, variant_id, 1000)
}

/// Products `A`, `B`, `C`... with variants `a1`, `b1`, `c1`...
#[must_use]
pub fn lettered(count: usize) -> Vec<Product> {
    ('A'..='Z')
        .take(count)
        .map(|letter| {
            let variant = format!("{}1", letter.to_ascii_lowercase());
            product(&letter.to_string(), &variant)
        })
        .collect()
}

/// A snapshot holding the given merchandise ids.
#[must_use]
pub fn snapshot(ids: &[&str]) -> CartSnapshot {
    ids.iter().map(|id| VariantId::new(*id)).collect()
}

/// A `checkout_benefits_item` metaobject.
#[must_use]
pub fn benefit(id: &str, icon_url: Option<&str>, name: Option<&str>) -> Metaobject {
    Metaobject {
        id: MetaobjectId::from_resource_id(id),
        fields: vec![
            MetaobjectField {
                key: "benefit_icon".to_string(),
                value: Some(MetaobjectId::from_resource_id(id).into_inner()),
                image: icon_url.map(|url| Image {
                    url: url.to_string(),
                    alt_text: Some(format!("{id} icon")),
                }),
            },
            MetaobjectField {
                key: "benefit_name".to_string(),
                value: name.map(str::to_string),
                image: None,
            },
        ],
    }
}

// =============================================================================
// Catalog
// =============================================================================

/// The fake backend is unreachable.
#[derive(Debug, Clone, thiserror::Error)]
#[error("backend unavailable")]
pub struct Unavailable;

/// Catalog returning a fixed product list, counting queries.
#[derive(Clone)]
pub struct FakeCatalog {
    products: Option<Vec<Product>>,
    requests: Arc<Mutex<Vec<(String, usize)>>>,
    gate: Option<Arc<Notify>>,
}

impl FakeCatalog {
    #[must_use]
    pub fn new(products: Vec<Product>) -> Self {
        Self {
            products: Some(products),
            requests: Arc::default(),
            gate: None,
        }
    }

    /// Every query fails.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            products: None,
            requests: Arc::default(),
            gate: None,
        }
    }

    /// Hold every query until `gate` is notified.
    #[must_use]
    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    /// `(tag, first)` of each query, in order.
    #[must_use]
    pub fn requests(&self) -> Vec<(String, usize)> {
        lock(&self.requests).clone()
    }
}

impl CatalogSource for FakeCatalog {
    type Error = Unavailable;

    async fn tagged_products(&self, tag: &str, first: usize) -> Result<Vec<Product>, Unavailable> {
        lock(&self.requests).push((tag.to_string(), first));
        if let Some(gate) = &self.gate {
            gate.notified().await;
        } else {
            tokio::task::yield_now().await;
        }
        self.products
            .as_ref()
            .map(|products| products.iter().take(first).cloned().collect())
            .ok_or(Unavailable)
    }
}

// =============================================================================
// Cart
// =============================================================================

/// When the visible snapshot reflects applied changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotSync {
    /// Immediately after the change settles.
    Immediate,
    /// Only after [`FakeCart::sync`].
    Manual,
}

/// In-memory cart host.
pub struct FakeCart {
    sync_mode: SnapshotSync,
    lines: Mutex<Vec<VariantId>>,
    visible: Mutex<CartSnapshot>,
    failures: Mutex<VecDeque<String>>,
    changes: Mutex<Vec<CartLineChange>>,
    gate: Option<Arc<Notify>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl FakeCart {
    #[must_use]
    pub fn new(sync_mode: SnapshotSync) -> Self {
        Self {
            sync_mode,
            lines: Mutex::default(),
            visible: Mutex::default(),
            failures: Mutex::default(),
            changes: Mutex::default(),
            gate: None,
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    /// Start with these merchandise ids in the cart.
    #[must_use]
    pub fn with_lines(self, ids: &[&str]) -> Self {
        *lock(&self.lines) = ids.iter().map(|id| VariantId::new(*id)).collect();
        self.sync();
        self
    }

    /// Hold every change until `gate` is notified.
    #[must_use]
    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    /// The next change fails with `message`.
    pub fn fail_next(&self, message: &str) {
        lock(&self.failures).push_back(message.to_string());
    }

    /// Publish the applied lines to the visible snapshot.
    pub fn sync(&self) {
        let lines = lock(&self.lines).clone();
        *lock(&self.visible) = lines.into_iter().collect();
    }

    /// Remove a line, as if the shopper deleted it elsewhere.
    pub fn remove(&self, merchandise_id: &str) {
        lock(&self.lines).retain(|id| id.as_str() != merchandise_id);
        self.sync();
    }

    /// Changes received, in order, including failed ones.
    #[must_use]
    pub fn changes(&self) -> Vec<CartLineChange> {
        lock(&self.changes).clone()
    }

    /// Applied merchandise ids.
    #[must_use]
    pub fn lines(&self) -> Vec<VariantId> {
        lock(&self.lines).clone()
    }

    /// Most changes ever in flight at once.
    #[must_use]
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

impl CartHost for FakeCart {
    fn cart_lines(&self) -> CartSnapshot {
        lock(&self.visible).clone()
    }

    async fn apply_cart_lines_change(&self, change: CartLineChange) -> CartChangeResult {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        lock(&self.changes).push(change.clone());

        if let Some(gate) = &self.gate {
            gate.notified().await;
        } else {
            tokio::task::yield_now().await;
        }

        let failure = lock(&self.failures).pop_front();
        let result = if let Some(message) = failure {
            CartChangeResult::Error { message }
        } else {
            let CartLineChange::AddCartLine { merchandise_id, .. } = change;
            lock(&self.lines).push(merchandise_id);
            if self.sync_mode == SnapshotSync::Immediate {
                self.sync();
            }
            CartChangeResult::Success
        };

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}

// =============================================================================
// Benefits
// =============================================================================

/// Metaobject source returning a fixed list, or failing.
pub struct FakeBenefits(pub Option<Vec<Metaobject>>);

impl BenefitSource for FakeBenefits {
    type Error = Unavailable;

    async fn metaobjects(
        &self,
        _metaobject_type: &str,
        first: usize,
    ) -> Result<Vec<Metaobject>, Unavailable> {
        self.0
            .as_ref()
            .map(|items| items.iter().take(first).cloned().collect())
            .ok_or(Unavailable)
    }
}

// =============================================================================
// Widget
// =============================================================================

/// Add-on widget over the fakes, formatting prices as USD in `en-US`.
pub type TestWidget = AddonWidget<FakeCatalog, FakeCart, ShopperCurrencyFormatter>;

/// An unmounted widget with default settings.
#[must_use]
pub fn widget(catalog: FakeCatalog, cart: FakeCart) -> TestWidget {
    AddonWidget::new(
        catalog,
        cart,
        ShopperCurrencyFormatter::default(),
        AddonSettings::default(),
    )
}

/// Title of the product the widget currently offers.
#[must_use]
pub fn offered(widget: &TestWidget) -> Option<String> {
    widget.view().card().map(|card| card.title.clone())
}
