//! Currency codes, monetary amounts, and tax types.

use core::str::FromStr;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// ISO 4217 style currency code, always stored uppercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Parse and normalize a three-letter currency code.
    pub fn new(code: impl AsRef<str>) -> EngineResult<Self> {
        let code = code.as_ref().trim();
        if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(EngineError::validation(format!(
                "currency code must be three ASCII letters, got {code:?}"
            )));
        }
        Ok(Self(code.to_ascii_uppercase()))
    }

    /// Reference currency for threshold comparison and fee tiers.
    pub fn usd() -> Self {
        Self("USD".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for CurrencyCode {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// An amount tagged with the currency it is denominated in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonetaryAmount {
    pub amount: Decimal,
    pub currency: CurrencyCode,
}

impl MonetaryAmount {
    pub fn new(amount: Decimal, currency: CurrencyCode) -> Self {
        Self { amount, currency }
    }
}

impl core::fmt::Display for MonetaryAmount {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} {}", self.amount, self.currency)
    }
}

/// Tax regimes the calculator can query a rate for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaxType {
    Vat,
    Gst,
    SalesTax,
}

impl core::fmt::Display for TaxType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            Self::Vat => "VAT",
            Self::Gst => "GST",
            Self::SalesTax => "SALES_TAX",
        };
        f.write_str(s)
    }
}
