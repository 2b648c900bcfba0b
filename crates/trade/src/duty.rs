//! Landed-cost duty, tax, and processing-fee calculation.

use std::collections::BTreeSet;
use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use mzigo_core::{CountryCode, CurrencyCode, EngineResult, MonetaryAmount, TaxType};
use mzigo_currency::{ConversionOptions, CurrencyConverter, CurrencyRateSource};

use crate::agreement::TradeAgreementRegistry;
use crate::documents::DocumentType;
use crate::jurisdiction::{FeeKind, JurisdictionConfig, TaxRateProvider};
use crate::resolver::DocumentRequirementResolver;
use crate::restriction::ProductCustomsInfo;

/// One priced line of a shipment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipmentLine {
    pub customs: ProductCustomsInfo,
    pub quantity: u32,
}

impl ShipmentLine {
    /// Declared value of the whole line, in the line's currency.
    pub fn line_value(&self) -> Decimal {
        self.customs.declared_value * Decimal::from(self.quantity)
    }

    pub fn line_weight_kg(&self) -> Decimal {
        self.customs.weight_kg * Decimal::from(self.quantity)
    }
}

/// Destination fee itemized alongside (not folded into) the primary totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdditionalFee {
    pub name: String,
    pub amount: Decimal,
}

/// Outcome of a duty/tax calculation, in the reference currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DutyCalculationResult {
    pub duty_amount: Decimal,
    pub currency: CurrencyCode,
    pub duty_rate_percentage: Decimal,
    pub tax_amount: Decimal,
    pub customs_processing_fee: Decimal,
    /// Always `duty_amount + tax_amount + customs_processing_fee`.
    pub total_duties_and_taxes: Decimal,
    pub is_duty_free: bool,
    pub duty_free_reason: Option<String>,
    pub required_documents: BTreeSet<DocumentType>,
    pub additional_fees: Vec<AdditionalFee>,
}

/// Orchestrates agreements, currency conversion, and jurisdiction data into a
/// total landed-cost figure for one shipment.
pub struct DutyAndTaxCalculator<S, P> {
    registry: Arc<TradeAgreementRegistry>,
    converter: Arc<CurrencyConverter<S>>,
    tax_provider: P,
    config: JurisdictionConfig,
}

impl<S, P> DutyAndTaxCalculator<S, P>
where
    S: CurrencyRateSource,
    P: TaxRateProvider,
{
    pub fn new(
        registry: Arc<TradeAgreementRegistry>,
        converter: Arc<CurrencyConverter<S>>,
        tax_provider: P,
        config: JurisdictionConfig,
    ) -> Self {
        Self {
            registry,
            converter,
            tax_provider,
            config,
        }
    }

    pub fn config(&self) -> &JurisdictionConfig {
        &self.config
    }

    /// Compute duties, taxes, and fees for a shipment.
    ///
    /// Steps run in strict order: applicable agreements, value conversion to
    /// the reference currency, duty-free threshold check, duty, tax, tiered
    /// processing fee, itemized destination fees, document union.
    pub fn calculate(
        &self,
        origin: &CountryCode,
        destination: &CountryCode,
        lines: &[ShipmentLine],
        shipping_cost: Option<&MonetaryAmount>,
        insurance: Option<&MonetaryAmount>,
    ) -> EngineResult<DutyCalculationResult> {
        let usd = CurrencyCode::usd();
        let raw = ConversionOptions::default();

        let agreements = self.registry.applicable(origin, destination);
        let mut is_duty_free = !agreements.is_empty();

        // Comparison basis for thresholds: goods value plus declared shipping
        // and insurance, all in the reference currency.
        let mut total_value = Decimal::ZERO;
        for line in lines {
            total_value += self.converter.convert(
                line.line_value(),
                &line.customs.declared_value_currency,
                &usd,
                false,
                &raw,
            )?;
        }
        for extra in [shipping_cost, insurance].into_iter().flatten() {
            total_value += self
                .converter
                .convert(extra.amount, &extra.currency, &usd, false, &raw)?;
        }

        let total_weight_kg: Decimal = lines.iter().map(ShipmentLine::line_weight_kg).sum();

        // Thresholds are a ceiling: exceeding ANY agreement's value or weight
        // limit disqualifies the shipment. Exactly at the limit stays free.
        for agreement in &agreements {
            let Some(threshold) = &agreement.duty_free_threshold else {
                continue;
            };
            let threshold_value =
                self.converter
                    .convert(threshold.value, &threshold.currency, &usd, false, &raw)?;
            if total_value > threshold_value || total_weight_kg > threshold.weight_kg {
                tracing::debug!(
                    agreement = %agreement.code,
                    %total_value,
                    %total_weight_kg,
                    "duty-free threshold exceeded"
                );
                is_duty_free = false;
            }
        }

        let duty_rate_percentage = if is_duty_free {
            Decimal::ZERO
        } else {
            self.config.duty_rate(destination)
        };
        let duty_amount =
            (total_value * duty_rate_percentage / Decimal::ONE_HUNDRED).round_dp(2);

        let tax_rate = self.resolve_tax_rate(destination);
        // Tax applies on value-plus-duty, not value alone.
        let tax_amount =
            ((total_value + duty_amount) * tax_rate / Decimal::ONE_HUNDRED).round_dp(2);

        let customs_processing_fee = processing_fee(total_value);
        let total_duties_and_taxes = duty_amount + tax_amount + customs_processing_fee;

        let additional_fees = self
            .config
            .fees_for(destination)
            .iter()
            .map(|rule| AdditionalFee {
                name: rule.name.clone(),
                amount: match &rule.kind {
                    FeeKind::Flat(amount) => *amount,
                    FeeKind::PercentOfValue(pct) => {
                        (total_value * *pct / Decimal::ONE_HUNDRED).round_dp(2)
                    }
                },
            })
            .collect();

        let products: Vec<&ProductCustomsInfo> = lines.iter().map(|l| &l.customs).collect();
        let required_documents = DocumentRequirementResolver::resolve(
            &agreements,
            &products,
            &self.config.documents_for(destination),
            &BTreeSet::new(),
        );

        let duty_free_reason = is_duty_free.then(|| {
            let codes: Vec<&str> = agreements.iter().map(|a| a.code.as_str()).collect();
            format!("qualifies for duty-free treatment under {}", codes.join(", "))
        });

        Ok(DutyCalculationResult {
            duty_amount,
            currency: usd,
            duty_rate_percentage,
            tax_amount,
            customs_processing_fee,
            total_duties_and_taxes,
            is_duty_free,
            duty_free_reason,
            required_documents,
            additional_fees,
        })
    }

    /// Provider first; built-in table on any provider failure. The fallback is
    /// visible in logs only, never in the result shape.
    fn resolve_tax_rate(&self, destination: &CountryCode) -> Decimal {
        match self.tax_provider.tax_rate(destination, TaxType::Vat) {
            Ok(rate) => rate,
            Err(err) => {
                tracing::warn!(
                    %destination,
                    error = %err,
                    "tax provider failed, using built-in rate table"
                );
                self.config.tax_rate(destination)
            }
        }
    }
}

/// Tiered flat customs processing fee by converted total value.
fn processing_fee(total_value: Decimal) -> Decimal {
    let tier = |n: i64| Decimal::from(n);
    if total_value <= tier(100) {
        tier(5)
    } else if total_value <= tier(500) {
        tier(10)
    } else if total_value <= tier(1000) {
        tier(25)
    } else if total_value <= tier(5000) {
        tier(50)
    } else {
        tier(100)
    }
}
