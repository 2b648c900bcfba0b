//! Per-method shipping cost and delivery-time estimation.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use mzigo_core::CountryCode;

use crate::distance::{distance_factor, transit_points, TransitPoint};
use crate::method::ShippingMethod;

/// Inclusive delivery-day range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryWindow {
    pub min_days: u32,
    pub max_days: u32,
}

/// An optional insurance tier quoted alongside the estimate.
///
/// Quotes only: the cost is never folded into the shipping total; callers who
/// take a tier add it themselves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsuranceOption {
    pub name: String,
    pub rate_percentage: Decimal,
    pub cost: Decimal,
}

/// Cost/time estimate for one method on one route, in the reference currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateQuote {
    pub method: ShippingMethod,
    pub base_cost: Decimal,
    pub delivery_days: DeliveryWindow,
    pub distance_factor: Decimal,
    pub transit_points: Vec<TransitPoint>,
    pub insurance_options: Vec<InsuranceOption>,
}

/// Stateless estimator over the country-region distance model.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShippingRateEstimator;

/// Flat handling surcharge for the express method.
const EXPRESS_SURCHARGE: Decimal = Decimal::from_parts(15, 0, 0, false, 0);

/// Above this declared value a 0.5% handling premium applies.
const HIGH_VALUE_FLOOR: Decimal = Decimal::from_parts(1000, 0, 0, false, 0);

impl ShippingRateEstimator {
    pub fn new() -> Self {
        Self
    }

    /// Estimate cost and delivery window for one method.
    ///
    /// Precondition: `value` must already be converted to the reference
    /// currency — the high-value premium, insurance quotes, and the returned
    /// costs are all denominated in it, and no conversion happens here.
    /// Local pickup is always free regardless of weight, value, or route.
    pub fn estimate(
        &self,
        method: ShippingMethod,
        origin: &CountryCode,
        destination: &CountryCode,
        weight_kg: Decimal,
        value: Decimal,
    ) -> RateQuote {
        let factor = distance_factor(origin, destination);

        let base_cost = if method == ShippingMethod::LocalPickup {
            Decimal::ZERO
        } else {
            let mut cost = method.rate_per_kg() * weight_kg * factor;
            if value > HIGH_VALUE_FLOOR {
                // Implicit handling premium on high-value cargo.
                cost += value * Decimal::new(5, 3); // 0.5%
            }
            if method == ShippingMethod::Express {
                cost += EXPRESS_SURCHARGE;
            }
            cost.round_dp(2)
        };

        let (min_days, max_days) = method.base_delivery_days();
        let delivery_days = DeliveryWindow {
            min_days: scale_days(min_days, factor),
            max_days: scale_days(max_days, factor),
        };

        RateQuote {
            method,
            base_cost,
            delivery_days,
            distance_factor: factor,
            transit_points: transit_points(origin, destination),
            insurance_options: insurance_options(value),
        }
    }
}

/// Delivery days scale linearly with the distance factor, whole days.
fn scale_days(days: u32, factor: Decimal) -> u32 {
    (Decimal::from(days) * factor)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u32()
        .unwrap_or(days)
        .max(1)
}

/// Insurance tiers at 1-3% of declared value.
fn insurance_options(value: Decimal) -> Vec<InsuranceOption> {
    [("basic", 1i64), ("standard", 2), ("premium", 3)]
        .into_iter()
        .map(|(name, pct)| {
            let rate = Decimal::from(pct);
            InsuranceOption {
                name: name.to_string(),
                rate_percentage: rate,
                cost: (value * rate / Decimal::ONE_HUNDRED).round_dp(2),
            }
        })
        .collect()
}
