//! Subcommand implementations.

pub mod addon;
pub mod benefits;
pub mod countdown;

use std::io::Write;

use naked_pineapple_checkout::{CheckoutError, ConfigError};
use naked_pineapple_checkout::shopify::ShopifyError;
use serde::Serialize;
use thiserror::Error;

/// Errors that end a command with a non-zero exit code.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),

    #[error("Failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Countdown task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl From<ConfigError> for CommandError {
    fn from(err: ConfigError) -> Self {
        Self::Checkout(err.into())
    }
}

impl From<ShopifyError> for CommandError {
    fn from(err: ShopifyError) -> Self {
        Self::Checkout(err.into())
    }
}

impl From<askama::Error> for CommandError {
    fn from(err: askama::Error) -> Self {
        Self::Checkout(err.into())
    }
}

/// How a view is written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Html,
    Json,
}

/// Write one view in `format`. `text` and `html` are only evaluated when used.
pub fn emit<V: Serialize>(
    format: OutputFormat,
    view: &V,
    text: impl FnOnce() -> String,
    html: impl FnOnce() -> Result<String, askama::Error>,
) -> Result<(), CommandError> {
    let rendered = match format {
        OutputFormat::Text => text(),
        OutputFormat::Html => html()?,
        OutputFormat::Json => serde_json::to_string(view)?,
    };

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{rendered}")?;
    stdout.flush()?;
    Ok(())
}

/// Write a status line to stdout.
pub fn say(line: &str) -> Result<(), CommandError> {
    writeln!(std::io::stdout().lock(), "{line}")?;
    Ok(())
}
