//! Request and result shapes of the orchestrator's public operations.

use std::collections::BTreeSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use mzigo_core::{CountryCode, CurrencyCode, EngineError, EngineResult, MonetaryAmount, TenantId};
use mzigo_shipping::{DeliveryWindow, InsuranceOption, ShippingMethod, TransitPoint};
use mzigo_trade::{DocumentType, DutyCalculationResult, RestrictionLevel, ShipmentLine};

/// One landed-cost / shipping-estimate request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LandedCostRequest {
    pub tenant_id: TenantId,
    pub origin_country: CountryCode,
    pub destination_country: CountryCode,
    pub lines: Vec<ShipmentLine>,
    /// Declared shipping cost, counted toward duty-free thresholds.
    pub shipping_cost: Option<MonetaryAmount>,
    /// Declared insurance cost, counted toward duty-free thresholds.
    pub insurance: Option<MonetaryAmount>,
}

impl LandedCostRequest {
    /// Structural validation; jurisdiction and rate lookups happen later.
    pub fn validate(&self) -> EngineResult<()> {
        if self.lines.is_empty() {
            return Err(EngineError::validation("request has no shipment lines"));
        }
        for (index, line) in self.lines.iter().enumerate() {
            if line.quantity == 0 {
                return Err(EngineError::validation(format!(
                    "line {index}: quantity must be at least 1"
                )));
            }
            if line.customs.declared_value < Decimal::ZERO {
                return Err(EngineError::validation(format!(
                    "line {index}: declared value must not be negative"
                )));
            }
            if line.customs.weight_kg < Decimal::ZERO {
                return Err(EngineError::validation(format!(
                    "line {index}: weight must not be negative"
                )));
            }
        }
        for extra in [&self.shipping_cost, &self.insurance].into_iter().flatten() {
            if extra.amount < Decimal::ZERO {
                return Err(EngineError::validation(
                    "shipping and insurance amounts must not be negative",
                ));
            }
        }
        Ok(())
    }
}

/// One priced shipping option, in the reference currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingEstimate {
    pub method: ShippingMethod,
    pub origin_country: CountryCode,
    pub destination_country: CountryCode,
    pub carrier_code: String,
    pub carrier_name: String,
    pub base_cost: Decimal,
    /// Full duty/tax/fee breakdown; shared across the methods of one request.
    pub duties: DutyCalculationResult,
    /// Always `base_cost + duties.total_duties_and_taxes`.
    pub total_cost: Decimal,
    pub currency: CurrencyCode,
    pub delivery_days: DeliveryWindow,
    pub distance_factor: Decimal,
    pub transit_points: Vec<TransitPoint>,
    pub insurance_options: Vec<InsuranceOption>,
    pub required_documents: BTreeSet<DocumentType>,
    pub tracking_available: bool,
    pub is_guaranteed: bool,
}

/// Full landed-cost breakdown, in the reference currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LandedCostResult {
    pub goods_value: Decimal,
    pub shipping_cost: Decimal,
    pub insurance_cost: Decimal,
    pub duties: DutyCalculationResult,
    /// `goods_value + shipping_cost + insurance_cost + duties.total_duties_and_taxes`.
    pub total_landed_cost: Decimal,
    pub currency: CurrencyCode,
}

/// Shipment-level eligibility verdict across all lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipmentEligibility {
    pub eligible: bool,
    /// Most restrictive level seen across lines.
    pub restriction_level: RestrictionLevel,
    pub required_documents: BTreeSet<DocumentType>,
    /// One reason per blocked line; empty when eligible.
    pub blocked_reasons: Vec<String>,
}
