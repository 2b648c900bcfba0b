//! Versioned per-country duty/tax/fee data, kept apart from engine logic.
//!
//! Rates and fee rules are jurisdiction data that changes on regulatory
//! cycles, not code-release cycles; the calculator takes this struct as input
//! so the two evolve independently.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use mzigo_core::{CountryCode, EngineError, EngineResult, TaxType};

use crate::documents::DocumentType;

/// How an additional per-country fee is computed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeeKind {
    /// Fixed amount in the reference currency.
    Flat(Decimal),
    /// Percentage of the shipment's converted total value.
    PercentOfValue(Decimal),
}

/// One itemized destination-country fee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeRule {
    pub name: String,
    pub kind: FeeKind,
}

/// Primary source for destination tax rates (percent).
///
/// The calculator falls back to [`JurisdictionConfig`] tables when this fails;
/// the fallback is logged, never surfaced in the result shape.
pub trait TaxRateProvider: Send + Sync {
    fn tax_rate(&self, country: &CountryCode, tax_type: TaxType) -> EngineResult<Decimal>;
}

impl<P> TaxRateProvider for Arc<P>
where
    P: TaxRateProvider + ?Sized,
{
    fn tax_rate(&self, country: &CountryCode, tax_type: TaxType) -> EngineResult<Decimal> {
        (**self).tax_rate(country, tax_type)
    }
}

/// In-memory tax-rate provider for local composition and tests.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaxRates {
    rates: HashMap<(CountryCode, TaxType), Decimal>,
}

impl InMemoryTaxRates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, country: CountryCode, tax_type: TaxType, rate: Decimal) {
        self.rates.insert((country, tax_type), rate);
    }
}

impl TaxRateProvider for InMemoryTaxRates {
    fn tax_rate(&self, country: &CountryCode, tax_type: TaxType) -> EngineResult<Decimal> {
        self.rates
            .get(&(country.clone(), tax_type))
            .copied()
            .ok_or_else(|| {
                EngineError::not_found(format!("no {tax_type} rate for {country}"))
            })
    }
}

/// Versioned jurisdiction data consumed by the duty calculator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JurisdictionConfig {
    /// Bumped whenever the seeded tables change.
    pub version: u32,
    pub duty_rates: HashMap<CountryCode, Decimal>,
    pub default_duty_rate: Decimal,
    pub tax_rates: HashMap<CountryCode, Decimal>,
    pub default_tax_rate: Decimal,
    pub additional_fees: HashMap<CountryCode, Vec<FeeRule>>,
    pub destination_documents: HashMap<CountryCode, BTreeSet<DocumentType>>,
}

impl JurisdictionConfig {
    /// Flat import duty rate (percent) for a destination.
    pub fn duty_rate(&self, destination: &CountryCode) -> Decimal {
        self.duty_rates
            .get(destination)
            .copied()
            .unwrap_or(self.default_duty_rate)
    }

    /// Fallback tax rate (percent) for a destination.
    pub fn tax_rate(&self, destination: &CountryCode) -> Decimal {
        self.tax_rates
            .get(destination)
            .copied()
            .unwrap_or(self.default_tax_rate)
    }

    pub fn fees_for(&self, destination: &CountryCode) -> &[FeeRule] {
        self.additional_fees
            .get(destination)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn documents_for(&self, destination: &CountryCode) -> BTreeSet<DocumentType> {
        self.destination_documents
            .get(destination)
            .cloned()
            .unwrap_or_default()
    }
}

impl Default for JurisdictionConfig {
    fn default() -> Self {
        let country = |c: &str| CountryCode::new(c).expect("seed country code");
        let pct = |s: &str| s.parse::<Decimal>().expect("seed rate");

        let duty_rates = [
            ("ZA", "20"),
            ("NA", "20"),
            ("BW", "20"),
            ("KE", "25"),
            ("TZ", "25"),
            ("UG", "25"),
            ("NG", "35"),
            ("GH", "20"),
            ("EG", "30"),
            ("ZW", "40"),
        ]
        .into_iter()
        .map(|(c, r)| (country(c), pct(r)))
        .collect();

        let tax_rates = [
            ("ZA", "15"),
            ("NA", "15"),
            ("KE", "16"),
            ("TZ", "18"),
            ("UG", "18"),
            ("RW", "18"),
            ("NG", "7.5"),
            ("GH", "15"),
            ("EG", "14"),
            ("ZM", "16"),
        ]
        .into_iter()
        .map(|(c, r)| (country(c), pct(r)))
        .collect();

        let additional_fees = HashMap::from([
            (
                country("KE"),
                vec![FeeRule {
                    name: "Import declaration fee".to_string(),
                    kind: FeeKind::PercentOfValue(pct("2.5")),
                }],
            ),
            (
                country("NG"),
                vec![FeeRule {
                    name: "Destination inspection levy".to_string(),
                    kind: FeeKind::PercentOfValue(pct("1")),
                }],
            ),
            (
                country("ZW"),
                vec![FeeRule {
                    name: "Customs processing surcharge".to_string(),
                    kind: FeeKind::Flat(pct("10")),
                }],
            ),
        ]);

        let destination_documents = HashMap::from([
            (
                country("NG"),
                [DocumentType::ImportPermit].into_iter().collect(),
            ),
            (
                country("EG"),
                [DocumentType::CertificateOfOrigin].into_iter().collect(),
            ),
            (
                country("DZ"),
                [DocumentType::ImportPermit].into_iter().collect(),
            ),
        ]);

        Self {
            version: 1,
            duty_rates,
            default_duty_rate: pct("25"),
            tax_rates,
            default_tax_rate: pct("15"),
            additional_fees,
            destination_documents,
        }
    }
}
