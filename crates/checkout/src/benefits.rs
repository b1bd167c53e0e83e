//! Benefits grid: merchant-managed icons with short labels.
//!
//! Entries are `checkout_benefits_item` metaobjects, each holding an icon
//! image reference and a name.

use askama::Template;
use naked_pineapple_core::MetaobjectId;
use serde::Serialize;
use tracing::{debug, instrument, warn};

use crate::host::BenefitSource;
use crate::shopify::types::Metaobject;

/// Metaobject type holding one benefit.
pub const BENEFIT_METAOBJECT_TYPE: &str = "checkout_benefits_item";
/// At most this many benefits are shown.
pub const BENEFIT_LIMIT: usize = 4;
pub const ICON_FIELD: &str = "benefit_icon";
pub const NAME_FIELD: &str = "benefit_name";
const COLUMNS: usize = 2;

/// Benefits grid settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BenefitsSettings {
    /// Heading above the grid. Blank titles are treated as absent.
    pub title: Option<String>,
}

impl BenefitsSettings {
    #[must_use]
    pub fn new(title: Option<String>) -> Self {
        Self {
            title: title
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty()),
        }
    }
}

/// One renderable benefit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BenefitItem {
    pub id: MetaobjectId,
    pub icon_url: String,
    pub icon_alt: String,
    pub name: String,
}

impl BenefitItem {
    /// `None` unless the metaobject has both an icon image and a name.
    #[must_use]
    pub fn from_metaobject(metaobject: &Metaobject) -> Option<Self> {
        let image = metaobject.field(ICON_FIELD)?.image.as_ref()?;
        let name = metaobject
            .field(NAME_FIELD)?
            .value
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())?;

        Some(Self {
            id: metaobject.id.clone(),
            icon_url: image.url.clone(),
            icon_alt: image.alt_text.clone().unwrap_or_else(|| name.to_string()),
            name: name.to_string(),
        })
    }
}

/// Benefits laid out in rows of two.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BenefitsGrid {
    pub title: Option<String>,
    pub rows: Vec<Vec<BenefitItem>>,
}

impl BenefitsGrid {
    /// Grid of the renderable entries among `metaobjects`, in order.
    #[must_use]
    pub fn new(settings: &BenefitsSettings, metaobjects: &[Metaobject]) -> Self {
        let items: Vec<BenefitItem> = metaobjects
            .iter()
            .filter_map(BenefitItem::from_metaobject)
            .collect();

        Self {
            title: settings.title.clone(),
            rows: items.chunks(COLUMNS).map(<[BenefitItem]>::to_vec).collect(),
        }
    }

    /// All items, row by row.
    pub fn items(&self) -> impl Iterator<Item = &BenefitItem> {
        self.rows.iter().flatten()
    }

    /// Nothing to show: no title and no items.
    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.title.is_none() && self.rows.is_empty()
    }

    /// Render as an HTML fragment; empty when hidden.
    ///
    /// # Errors
    ///
    /// Returns an error if template rendering fails.
    pub fn render_html(&self) -> Result<String, askama::Error> {
        if self.is_hidden() {
            return Ok(String::new());
        }
        BenefitsTemplate { grid: self }.render()
    }
}

/// Fetch the benefits and build the grid.
///
/// A failed fetch is logged and yields a grid with no items.
#[instrument(skip_all)]
pub async fn load_benefits<S: BenefitSource>(source: &S, settings: &BenefitsSettings) -> BenefitsGrid {
    let metaobjects = match source
        .metaobjects(BENEFIT_METAOBJECT_TYPE, BENEFIT_LIMIT)
        .await
    {
        Ok(metaobjects) => metaobjects,
        Err(e) => {
            warn!(error = %e, "Benefits fetch failed");
            Vec::new()
        }
    };

    let grid = BenefitsGrid::new(settings, &metaobjects);
    debug!(
        fetched = metaobjects.len(),
        shown = grid.items().count(),
        "Benefits grid built"
    );
    grid
}

#[derive(Template)]
#[template(path = "partials/benefits_grid.html")]
struct BenefitsTemplate<'a> {
    grid: &'a BenefitsGrid,
}
