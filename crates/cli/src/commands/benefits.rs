//! Benefits grid command.

use naked_pineapple_checkout::shopify::StorefrontClient;
use naked_pineapple_checkout::{BenefitsGrid, CheckoutConfig, load_benefits};

use super::{CommandError, OutputFormat, emit};

fn text(grid: &BenefitsGrid) -> String {
    if grid.is_hidden() {
        return "(no benefits)".to_string();
    }

    let mut lines = Vec::new();
    if let Some(title) = &grid.title {
        lines.push(title.clone());
    }
    lines.extend(
        grid.rows
            .iter()
            .map(|row| row.iter().map(|item| item.name.as_str()).collect::<Vec<_>>().join(" | ")),
    );
    lines.join("\n")
}

/// Fetch and print the benefits grid.
///
/// # Errors
///
/// Returns an error if configuration is invalid. A failed metaobject query
/// prints an empty grid.
pub async fn show(format: OutputFormat) -> Result<(), CommandError> {
    let config = CheckoutConfig::from_env()?;
    let client = StorefrontClient::new(&config.shopify)?;

    let grid = load_benefits(&client, &config.benefits).await;
    emit(format, &grid, || text(&grid), || grid.render_html())
}
