//! `mzigo-currency` — exchange-rate lookup/caching and price conversion.

pub mod cache;
pub mod convert;
pub mod rate;

pub use cache::RateCache;
pub use convert::{ConversionOptions, CurrencyConverter, RoundingMethod, VatAdjustment};
pub use rate::{CurrencyRateSource, ExchangeRate, FixedRateTable};
