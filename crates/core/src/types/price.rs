//! Type-safe price representation using decimal arithmetic.

use core::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Price`] from API strings.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The amount is not a decimal number.
    #[error("invalid price amount: {0:?}")]
    InvalidAmount(String),
    /// The currency code is empty.
    #[error("currency code cannot be empty")]
    EmptyCurrency,
}

/// A price with currency information.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., dollars, not cents).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Parse a price from the decimal string and currency code the Shopify
    /// APIs return (e.g. `"19.99"`, `"USD"`).
    ///
    /// # Errors
    ///
    /// Returns an error if the amount is not a decimal or the currency is empty.
    pub fn parse(amount: &str, currency_code: &str) -> Result<Self, PriceError> {
        let amount = Decimal::from_str(amount.trim())
            .map_err(|_| PriceError::InvalidAmount(amount.to_owned()))?;
        let currency_code = currency_code.parse::<CurrencyCode>()?;
        Ok(Self::new(amount, currency_code))
    }
}

/// ISO 4217 currency codes.
///
/// Common presentment currencies are enumerated; anything else is kept
/// verbatim in [`CurrencyCode::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(try_from = "String", into = "String")]
pub enum CurrencyCode {
    #[default]
    USD,
    EUR,
    GBP,
    CAD,
    AUD,
    NZD,
    JPY,
    CHF,
    SEK,
    DKK,
    NOK,
    MXN,
    Other(String),
}

impl CurrencyCode {
    /// The ISO 4217 code.
    #[must_use]
    pub fn code(&self) -> &str {
        match self {
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::GBP => "GBP",
            Self::CAD => "CAD",
            Self::AUD => "AUD",
            Self::NZD => "NZD",
            Self::JPY => "JPY",
            Self::CHF => "CHF",
            Self::SEK => "SEK",
            Self::DKK => "DKK",
            Self::NOK => "NOK",
            Self::MXN => "MXN",
            Self::Other(code) => code,
        }
    }

    /// Display symbol for the currency, if it has a distinctive one.
    ///
    /// Dollar-denominated currencies all render as `$`: the shopper already
    /// knows which currency their checkout is in.
    #[must_use]
    pub const fn symbol(&self) -> Option<&'static str> {
        match self {
            Self::USD | Self::CAD | Self::AUD | Self::NZD | Self::MXN => Some("$"),
            Self::EUR => Some("€"),
            Self::GBP => Some("£"),
            Self::JPY => Some("¥"),
            Self::SEK | Self::DKK | Self::NOK => Some("kr"),
            Self::CHF | Self::Other(_) => None,
        }
    }

    /// Number of fractional digits shown for the currency.
    #[must_use]
    pub const fn minor_units(&self) -> u32 {
        match self {
            Self::JPY => 0,
            _ => 2,
        }
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for CurrencyCode {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_uppercase();
        Ok(match code.as_str() {
            "" => return Err(PriceError::EmptyCurrency),
            "USD" => Self::USD,
            "EUR" => Self::EUR,
            "GBP" => Self::GBP,
            "CAD" => Self::CAD,
            "AUD" => Self::AUD,
            "NZD" => Self::NZD,
            "JPY" => Self::JPY,
            "CHF" => Self::CHF,
            "SEK" => Self::SEK,
            "DKK" => Self::DKK,
            "NOK" => Self::NOK,
            "MXN" => Self::MXN,
            _ => Self::Other(code),
        })
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = PriceError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> Self {
        code.code().to_owned()
    }
}
