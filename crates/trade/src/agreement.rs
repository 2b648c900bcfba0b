//! Regional trade agreements and duty-free thresholds.

use std::collections::BTreeSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use mzigo_core::{CountryCode, CurrencyCode};

use crate::documents::DocumentType;

/// Value/weight ceiling below which an agreement grants duty-free treatment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DutyFreeThreshold {
    pub value: Decimal,
    pub currency: CurrencyCode,
    pub weight_kg: Decimal,
}

/// A regional trade pact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeAgreement {
    pub code: String,
    pub name: String,
    pub member_countries: BTreeSet<CountryCode>,
    pub is_active: bool,
    pub duty_free_threshold: Option<DutyFreeThreshold>,
    pub required_documents: BTreeSet<DocumentType>,
}

impl TradeAgreement {
    pub fn covers(&self, origin: &CountryCode, destination: &CountryCode) -> bool {
        self.is_active
            && self.member_countries.contains(origin)
            && self.member_countries.contains(destination)
    }
}

/// Read-only catalogue of regional trade pacts, seeded once at startup.
///
/// Safe for unsynchronized concurrent reads; share via `Arc`.
#[derive(Debug, Clone)]
pub struct TradeAgreementRegistry {
    agreements: Vec<TradeAgreement>,
}

impl TradeAgreementRegistry {
    /// Registry seeded with the African regional pacts.
    pub fn new() -> Self {
        let agreements = vec![
            agreement(
                "SADC",
                "Southern African Development Community",
                &[
                    "ZA", "NA", "BW", "ZW", "MZ", "LS", "SZ", "ZM", "MW", "AO", "TZ", "CD",
                ],
                true,
                Some(threshold("1000", "USD", "20")),
                &[DocumentType::CertificateOfOrigin],
            ),
            agreement(
                "EAC",
                "East African Community",
                &["KE", "TZ", "UG", "RW", "BI", "SS"],
                true,
                Some(threshold("500", "USD", "15")),
                &[DocumentType::CertificateOfOrigin],
            ),
            agreement(
                "ECOWAS",
                "Economic Community of West African States",
                &[
                    "NG", "GH", "SN", "CI", "ML", "BF", "BJ", "TG", "NE", "GN", "SL", "LR", "GM",
                ],
                true,
                Some(threshold("800", "USD", "25")),
                &[DocumentType::CertificateOfOrigin],
            ),
            agreement(
                "COMESA",
                "Common Market for Eastern and Southern Africa",
                &[
                    "EG", "LY", "SD", "ET", "DJ", "KE", "UG", "RW", "BI", "MW", "ZM", "ZW", "SZ",
                ],
                true,
                Some(threshold("750", "USD", "20")),
                &[DocumentType::CertificateOfOrigin],
            ),
            // Ratified but tariff schedules not yet in force; seeded inactive so
            // it never grants duty-free treatment.
            agreement(
                "AFCFTA",
                "African Continental Free Trade Area",
                &[
                    "ZA", "NA", "BW", "ZW", "MZ", "ZM", "MW", "AO", "KE", "TZ", "UG", "RW", "ET",
                    "NG", "GH", "SN", "CI", "EG", "MA", "DZ", "TN",
                ],
                false,
                None,
                &[DocumentType::CertificateOfOrigin],
            ),
        ];

        debug_assert!(
            agreements
                .iter()
                .all(|a| !a.is_active || !a.member_countries.is_empty()),
            "active agreements must have members"
        );

        Self { agreements }
    }

    pub fn all(&self) -> &[TradeAgreement] {
        &self.agreements
    }

    pub fn by_code(&self, code: &str) -> Option<&TradeAgreement> {
        self.agreements
            .iter()
            .find(|a| a.code.eq_ignore_ascii_case(code))
    }

    /// Active agreements whose membership contains both endpoints.
    ///
    /// An empty result is a normal outcome, not an error.
    pub fn applicable(&self, origin: &CountryCode, destination: &CountryCode) -> Vec<&TradeAgreement> {
        self.agreements
            .iter()
            .filter(|a| a.covers(origin, destination))
            .collect()
    }
}

impl Default for TradeAgreementRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn agreement(
    code: &str,
    name: &str,
    members: &[&str],
    is_active: bool,
    duty_free_threshold: Option<DutyFreeThreshold>,
    documents: &[DocumentType],
) -> TradeAgreement {
    TradeAgreement {
        code: code.to_string(),
        name: name.to_string(),
        member_countries: members
            .iter()
            .map(|c| CountryCode::new(c).expect("seed country code"))
            .collect(),
        is_active,
        duty_free_threshold,
        required_documents: documents.iter().copied().collect(),
    }
}

fn threshold(value: &str, currency: &str, weight_kg: &str) -> DutyFreeThreshold {
    DutyFreeThreshold {
        value: value.parse().expect("seed threshold value"),
        currency: CurrencyCode::new(currency).expect("seed threshold currency"),
        weight_kg: weight_kg.parse().expect("seed threshold weight"),
    }
}
