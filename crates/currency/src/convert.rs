//! Price conversion with rounding and psychological-pricing policies.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use mzigo_core::{CurrencyCode, EngineResult};

use crate::cache::RateCache;
use crate::rate::CurrencyRateSource;

/// How a converted price is snapped to `10^-precision` granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoundingMethod {
    Up,
    Down,
    Nearest,
}

/// VAT rates on either side of a conversion, in percent (e.g. `15` for 15%).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VatAdjustment {
    pub source_rate: Decimal,
    pub target_rate: Decimal,
}

/// Conversion policy knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionOptions {
    pub rounding: Option<RoundingMethod>,
    /// Decimal places kept by rounding and targeted by psychological pricing.
    pub precision: u32,
    pub psychological_pricing: bool,
    pub vat: Option<VatAdjustment>,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self {
            rounding: None,
            precision: 2,
            psychological_pricing: false,
            vat: None,
        }
    }
}

/// Converts prices between currencies through a TTL-cached rate lookup.
pub struct CurrencyConverter<S> {
    cache: RateCache,
    source: S,
}

impl<S: CurrencyRateSource> CurrencyConverter<S> {
    pub fn new(source: S) -> Self {
        Self {
            cache: RateCache::new(),
            source,
        }
    }

    pub fn with_cache(source: S, cache: RateCache) -> Self {
        Self { cache, source }
    }

    /// Resolved rate for the pair; 1 when `from == to`.
    pub fn rate(&self, from: &CurrencyCode, to: &CurrencyCode) -> EngineResult<Decimal> {
        Ok(self.cache.get_or_fetch(from, to, &self.source)?.rate)
    }

    /// Convert a single amount.
    ///
    /// When `opts.vat` is present and `includes_vat` is true the amount is
    /// stripped of VAT at the source rate, converted net, then re-taxed at the
    /// target rate. When `includes_vat` is false the raw amount is converted
    /// and the target rate is added on top.
    pub fn convert(
        &self,
        amount: Decimal,
        from: &CurrencyCode,
        to: &CurrencyCode,
        includes_vat: bool,
        opts: &ConversionOptions,
    ) -> EngineResult<Decimal> {
        let rate = self.rate(from, to)?;
        Ok(apply(amount, rate, includes_vat, opts))
    }

    /// Convert many amounts for the same pair with a single rate resolution.
    pub fn convert_batch(
        &self,
        amounts: &[Decimal],
        from: &CurrencyCode,
        to: &CurrencyCode,
        includes_vat: bool,
        opts: &ConversionOptions,
    ) -> EngineResult<Vec<Decimal>> {
        let rate = self.rate(from, to)?;
        Ok(amounts
            .iter()
            .map(|amount| apply(*amount, rate, includes_vat, opts))
            .collect())
    }

    /// Drop all cached rates; the next conversion re-fetches.
    pub fn invalidate_rates(&self) {
        self.cache.invalidate_all();
    }
}

/// The conversion pipeline for one amount at an already-resolved rate.
fn apply(amount: Decimal, rate: Decimal, includes_vat: bool, opts: &ConversionOptions) -> Decimal {
    let hundred = Decimal::ONE_HUNDRED;

    let mut price = match opts.vat {
        Some(vat) if includes_vat => {
            // Strip VAT at the source rate, convert the net price, re-tax.
            let net = amount / (Decimal::ONE + vat.source_rate / hundred);
            net * rate * (Decimal::ONE + vat.target_rate / hundred)
        }
        Some(vat) => amount * rate * (Decimal::ONE + vat.target_rate / hundred),
        None => amount * rate,
    };

    if let Some(method) = opts.rounding {
        let strategy = match method {
            RoundingMethod::Up => RoundingStrategy::ToPositiveInfinity,
            RoundingMethod::Down => RoundingStrategy::ToNegativeInfinity,
            RoundingMethod::Nearest => RoundingStrategy::MidpointAwayFromZero,
        };
        price = price.round_dp_with_strategy(opts.precision, strategy);
    }

    if opts.psychological_pricing {
        price = if opts.precision > 0 {
            // e.g. precision 2: next whole unit minus 0.99.
            let pow = 10i64.pow(opts.precision);
            price.ceil() - Decimal::new(pow - 1, opts.precision)
        } else {
            price.ceil() - Decimal::ONE
        };
    }

    price
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use crate::rate::FixedRateTable;

    use super::*;

    fn cur(code: &str) -> CurrencyCode {
        CurrencyCode::new(code).unwrap()
    }

    fn converter() -> CurrencyConverter<FixedRateTable> {
        CurrencyConverter::new(FixedRateTable::with_default_rates())
    }

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn same_currency_is_identity() {
        let conv = converter();
        let out = conv
            .convert(dec("123.45"), &cur("ZAR"), &cur("ZAR"), false, &ConversionOptions::default())
            .unwrap();
        assert_eq!(out, dec("123.45"));
    }

    #[test]
    fn raw_conversion_multiplies_by_rate() {
        let conv = converter();
        let rate = conv.rate(&cur("USD"), &cur("ZAR")).unwrap();
        let out = conv
            .convert(dec("100"), &cur("USD"), &cur("ZAR"), false, &ConversionOptions::default())
            .unwrap();
        assert_eq!(out, dec("100") * rate);
    }

    #[test]
    fn unknown_currency_is_not_found() {
        let conv = converter();
        let err = conv
            .convert(dec("1"), &cur("USD"), &cur("XXX"), false, &ConversionOptions::default())
            .unwrap_err();
        assert!(err.to_string().contains("USD") && err.to_string().contains("XXX"));
    }

    #[test]
    fn vat_is_stripped_then_reapplied() {
        let conv = converter();
        let opts = ConversionOptions {
            vat: Some(VatAdjustment {
                source_rate: dec("15"),
                target_rate: dec("16"),
            }),
            ..Default::default()
        };
        // 115 gross at 15% source VAT = 100 net; identity rate; 16% target VAT.
        let out = conv
            .convert(dec("115"), &cur("USD"), &cur("USD"), true, &opts)
            .unwrap();
        assert_eq!(out, dec("116"));
    }

    #[test]
    fn net_amount_gets_target_vat_added() {
        let conv = converter();
        let opts = ConversionOptions {
            vat: Some(VatAdjustment {
                source_rate: dec("15"),
                target_rate: dec("16"),
            }),
            ..Default::default()
        };
        let out = conv
            .convert(dec("100"), &cur("USD"), &cur("USD"), false, &opts)
            .unwrap();
        assert_eq!(out, dec("116"));
    }

    #[test]
    fn rounding_methods_snap_to_precision() {
        let table = {
            let mut t = FixedRateTable::new();
            t.insert(cur("USD"), Decimal::ONE);
            t.insert(cur("ABC"), dec("3"));
            t
        };
        let conv = CurrencyConverter::new(table);
        // 10 / 3 = 3.333...
        let base = dec("10") / dec("3");

        let mut opts = ConversionOptions {
            rounding: Some(RoundingMethod::Up),
            ..Default::default()
        };
        let up = conv.convert(base, &cur("ABC"), &cur("USD"), false, &opts).unwrap();
        assert_eq!(up, dec("1.12"));

        opts.rounding = Some(RoundingMethod::Down);
        let down = conv.convert(base, &cur("ABC"), &cur("USD"), false, &opts).unwrap();
        assert_eq!(down, dec("1.11"));

        opts.rounding = Some(RoundingMethod::Nearest);
        let nearest = conv.convert(base, &cur("ABC"), &cur("USD"), false, &opts).unwrap();
        assert_eq!(nearest, dec("1.11"));
    }

    #[test]
    fn psychological_pricing_with_precision() {
        let conv = converter();
        let opts = ConversionOptions {
            psychological_pricing: true,
            ..Default::default()
        };
        // ceil(12.34) - 0.99
        let out = conv
            .convert(dec("12.34"), &cur("USD"), &cur("USD"), false, &opts)
            .unwrap();
        assert_eq!(out, dec("12.01"));
    }

    #[test]
    fn psychological_pricing_at_zero_precision() {
        let conv = converter();
        let opts = ConversionOptions {
            psychological_pricing: true,
            precision: 0,
            ..Default::default()
        };
        let out = conv
            .convert(dec("12.34"), &cur("USD"), &cur("USD"), false, &opts)
            .unwrap();
        assert_eq!(out, dec("12"));
    }

    #[test]
    fn batch_matches_itemwise() {
        let conv = converter();
        let opts = ConversionOptions::default();
        let amounts = [dec("1"), dec("99.99"), dec("1250.50")];
        let batch = conv
            .convert_batch(&amounts, &cur("USD"), &cur("KES"), false, &opts)
            .unwrap();
        for (amount, converted) in amounts.iter().zip(&batch) {
            let single = conv
                .convert(*amount, &cur("USD"), &cur("KES"), false, &opts)
                .unwrap();
            assert_eq!(single, *converted);
        }
    }

    mod proptest_tests {
        use proptest::prelude::*;

        use super::*;

        proptest! {
            /// Converting to another currency and back lands within rounding
            /// tolerance of the original amount.
            #[test]
            fn round_trip_is_stable(cents in 1i64..10_000_000) {
                let conv = converter();
                let amount = Decimal::new(cents, 2);
                let opts = ConversionOptions::default();

                let there = conv
                    .convert(amount, &cur("USD"), &cur("NGN"), false, &opts)
                    .unwrap();
                let back = conv
                    .convert(there, &cur("NGN"), &cur("USD"), false, &opts)
                    .unwrap();

                let diff = (back - amount).abs();
                prop_assert!(diff < Decimal::new(1, 2), "diff {diff} for {amount}");
            }

            /// Up-rounding never produces less than down-rounding.
            #[test]
            fn up_dominates_down(cents in 1i64..10_000_000) {
                let conv = converter();
                let amount = Decimal::new(cents, 2);
                let mut opts = ConversionOptions {
                    rounding: Some(RoundingMethod::Up),
                    ..Default::default()
                };
                let up = conv
                    .convert(amount, &cur("USD"), &cur("ZAR"), false, &opts)
                    .unwrap();
                opts.rounding = Some(RoundingMethod::Down);
                let down = conv
                    .convert(amount, &cur("USD"), &cur("ZAR"), false, &opts)
                    .unwrap();
                prop_assert!(up >= down);
            }
        }
    }
}
