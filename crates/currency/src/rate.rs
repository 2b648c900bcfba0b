//! Exchange rates and the backing rate source seam.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use mzigo_core::{CurrencyCode, EngineError, EngineResult};

/// A directed exchange rate: `rate` units of `to` per 1 unit of `from`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeRate {
    pub from: CurrencyCode,
    pub to: CurrencyCode,
    pub rate: Decimal,
    pub last_updated: DateTime<Utc>,
    /// Label of the source that produced this rate (provider name, "identity", …).
    pub source: String,
}

impl ExchangeRate {
    /// The trivial `rate(A, A) == 1` entry.
    pub fn identity(currency: CurrencyCode) -> Self {
        Self {
            from: currency.clone(),
            to: currency,
            rate: Decimal::ONE,
            last_updated: Utc::now(),
            source: "identity".to_string(),
        }
    }

    /// Whether this entry is older than `ttl`.
    pub fn is_expired(&self, ttl: Duration) -> bool {
        Utc::now().signed_duration_since(self.last_updated) > ttl
    }
}

/// Backing store/refresh mechanism for the converter's cache.
///
/// Implementations may wrap an external market-data feed; the engine only ever
/// calls this synchronously on cache miss/expiry.
pub trait CurrencyRateSource: Send + Sync {
    fn fetch_rate(&self, from: &CurrencyCode, to: &CurrencyCode) -> EngineResult<Decimal>;

    /// Label used on cache entries produced from this source.
    fn label(&self) -> &str {
        "provider"
    }
}

impl<S> CurrencyRateSource for Arc<S>
where
    S: CurrencyRateSource + ?Sized,
{
    fn fetch_rate(&self, from: &CurrencyCode, to: &CurrencyCode) -> EngineResult<Decimal> {
        (**self).fetch_rate(from, to)
    }

    fn label(&self) -> &str {
        (**self).label()
    }
}

/// In-memory rate table for local composition and tests.
///
/// Stores USD-quoted rates and derives any other pair by crossing through USD,
/// so a seeded matrix of N currencies answers N×N pairs.
#[derive(Debug, Clone, Default)]
pub struct FixedRateTable {
    /// Units of currency per 1 USD.
    per_usd: HashMap<CurrencyCode, Decimal>,
}

impl FixedRateTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Table seeded with the major African e-commerce currencies.
    ///
    /// Rates are periodically-refreshed snapshots, not live market data.
    pub fn with_default_rates() -> Self {
        let mut table = Self::new();
        let seed: &[(&str, Decimal)] = &[
            ("USD", Decimal::ONE),
            ("EUR", Decimal::new(92, 2)),       // 0.92
            ("GBP", Decimal::new(79, 2)),       // 0.79
            ("ZAR", Decimal::new(1840, 2)),     // 18.40
            ("NAD", Decimal::new(1840, 2)),     // pegged to ZAR
            ("BWP", Decimal::new(1365, 2)),     // 13.65
            ("NGN", Decimal::new(155025, 2)),   // 1550.25
            ("GHS", Decimal::new(1520, 2)),     // 15.20
            ("KES", Decimal::new(12950, 2)),    // 129.50
            ("TZS", Decimal::new(262000, 2)),   // 2620.00
            ("UGX", Decimal::new(371500, 2)),   // 3715.00
            ("EGP", Decimal::new(4885, 2)),     // 48.85
            ("MAD", Decimal::new(995, 2)),      // 9.95
            ("ZMW", Decimal::new(2630, 2)),     // 26.30
            ("MZN", Decimal::new(6390, 2)),     // 63.90
        ];
        for (code, rate) in seed {
            table.insert(CurrencyCode::new(code).expect("seed currency code"), *rate);
        }
        table
    }

    /// Register `rate` units of `currency` per 1 USD.
    pub fn insert(&mut self, currency: CurrencyCode, rate: Decimal) {
        self.per_usd.insert(currency, rate);
    }
}

impl CurrencyRateSource for FixedRateTable {
    fn fetch_rate(&self, from: &CurrencyCode, to: &CurrencyCode) -> EngineResult<Decimal> {
        if from == to {
            return Ok(Decimal::ONE);
        }
        match (self.per_usd.get(from), self.per_usd.get(to)) {
            (Some(from_per_usd), Some(to_per_usd)) if !from_per_usd.is_zero() => {
                // Cross through USD: to/from.
                Ok(to_per_usd / from_per_usd)
            }
            _ => Err(EngineError::not_found(format!(
                "no exchange rate for {from} -> {to}"
            ))),
        }
    }

    fn label(&self) -> &str {
        "fixed-table"
    }
}
