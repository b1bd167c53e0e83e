//! Currency formatting for widget prices.
//!
//! The host supplies a [`CurrencyFormatter`] for the shopper's locale. Prices
//! are shown in the shopper's presentment currency with a symbol but never
//! an ISO code prefix or suffix (`$24.00`, not `US$24.00` or `24.00 USD`).

use naked_pineapple_core::CurrencyCode;
use rust_decimal::{Decimal, RoundingStrategy};

/// Formats an amount in the shopper's currency.
pub trait CurrencyFormatter: Send + Sync {
    /// Format `amount` for display.
    fn format(&self, amount: Decimal) -> String;
}

impl<F> CurrencyFormatter for F
where
    F: Fn(Decimal) -> String + Send + Sync,
{
    fn format(&self, amount: Decimal) -> String {
        self(amount)
    }
}

/// Digit grouping and symbol placement for a locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberStyle {
    decimal_separator: char,
    group_separator: char,
    symbol_after: bool,
}

impl NumberStyle {
    /// `1,234.50` with a leading symbol.
    pub const ENGLISH: Self = Self {
        decimal_separator: '.',
        group_separator: ',',
        symbol_after: false,
    };

    /// `1.234,50` with a trailing symbol.
    pub const CONTINENTAL: Self = Self {
        decimal_separator: ',',
        group_separator: '.',
        symbol_after: true,
    };

    /// `1 234,50` with a trailing symbol.
    pub const FRENCH: Self = Self {
        decimal_separator: ',',
        group_separator: '\u{202f}',
        symbol_after: true,
    };

    /// Style for a BCP 47 locale tag such as `en-US` or `de-DE`.
    ///
    /// Only the language subtag is considered; unknown languages fall back to
    /// English conventions.
    #[must_use]
    pub fn for_locale(locale: &str) -> Self {
        let language = locale
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();

        match language.as_str() {
            "de" | "es" | "it" | "nl" | "pt" | "da" | "id" | "tr" => Self::CONTINENTAL,
            "fr" | "sv" | "nb" | "fi" | "pl" | "cs" => Self::FRENCH,
            _ => Self::ENGLISH,
        }
    }
}

/// The default [`CurrencyFormatter`]: symbol plus locale separators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShopperCurrencyFormatter {
    currency: CurrencyCode,
    style: NumberStyle,
}

impl ShopperCurrencyFormatter {
    /// Formatter for `currency` in the shopper's `locale`.
    #[must_use]
    pub fn new(currency: CurrencyCode, locale: &str) -> Self {
        Self {
            currency,
            style: NumberStyle::for_locale(locale),
        }
    }

    /// The currency amounts are formatted in.
    #[must_use]
    pub const fn currency(&self) -> &CurrencyCode {
        &self.currency
    }
}

impl Default for ShopperCurrencyFormatter {
    fn default() -> Self {
        Self::new(CurrencyCode::USD, "en-US")
    }
}

impl CurrencyFormatter for ShopperCurrencyFormatter {
    fn format(&self, amount: Decimal) -> String {
        let number = format_number(amount, self.currency.minor_units(), self.style);

        match (self.currency.symbol(), self.style.symbol_after) {
            (None, _) => number,
            (Some(symbol), false) => match number.strip_prefix('-') {
                Some(abs) => format!("-{symbol}{abs}"),
                None => format!("{symbol}{number}"),
            },
            (Some(symbol), true) => format!("{number}\u{a0}{symbol}"),
        }
    }
}

/// Round half away from zero to `scale` digits and apply the locale separators.
fn format_number(amount: Decimal, scale: u32, style: NumberStyle) -> String {
    let mut rounded = amount.round_dp_with_strategy(scale, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(scale);

    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let digits = rounded.abs().to_string();
    let (integer, fraction) = digits.split_once('.').unwrap_or((digits.as_str(), ""));

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, c) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(style.group_separator);
        }
        grouped.push(c);
    }

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&grouped);
    if !fraction.is_empty() {
        out.push(style.decimal_separator);
        out.push_str(fraction);
    }
    out
}
