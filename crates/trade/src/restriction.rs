//! Product restriction levels and per-destination eligibility checks.

use std::collections::BTreeSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use mzigo_core::{CountryCode, CurrencyCode};

use crate::documents::DocumentType;

/// How freely a product may cross a given border.
///
/// Strictly ordered; two levels combine to the more restrictive one.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RestrictionLevel {
    Unrestricted,
    Restricted,
    HighlyRestricted,
    Prohibited,
}

impl RestrictionLevel {
    /// Monotonic escalation: the stricter of the two wins.
    pub fn combine(self, other: Self) -> Self {
        self.max(other)
    }
}

/// Customs-relevant facts about one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductCustomsInfo {
    pub hs_code: String,
    pub description: String,
    pub country_of_origin: CountryCode,
    /// Declared value per unit.
    pub declared_value: Decimal,
    pub declared_value_currency: CurrencyCode,
    pub weight_kg: Decimal,
    pub restriction_level: RestrictionLevel,
    pub required_documents: BTreeSet<DocumentType>,
}

impl ProductCustomsInfo {
    /// HS chapter (first two digits), if the code starts with them.
    pub fn hs_chapter(&self) -> Option<u32> {
        let digits: String = self.hs_code.chars().take_while(|c| c.is_ascii_digit()).collect();
        if digits.len() < 2 {
            return None;
        }
        digits[..2].parse().ok()
    }
}

/// Destination-country restriction rules keyed by (country, HS code).
///
/// The tier assignment is a deterministic FNV-1a hash of the pair with a
/// roughly 60/25/10/5 split. It is a stand-in for a real regulatory feed;
/// replace this type's internals when one is wired in, the evaluator only
/// depends on the lookup being a pure function of its two inputs.
#[derive(Debug, Clone, Default)]
pub struct DestinationRestrictions;

impl DestinationRestrictions {
    pub fn new() -> Self {
        Self
    }

    pub fn level_for(&self, destination: &CountryCode, hs_code: &str) -> RestrictionLevel {
        let bucket = fnv1a(destination.as_str(), hs_code) % 100;
        match bucket {
            0..=59 => RestrictionLevel::Unrestricted,
            60..=84 => RestrictionLevel::Restricted,
            85..=94 => RestrictionLevel::HighlyRestricted,
            _ => RestrictionLevel::Prohibited,
        }
    }

    /// Documents the destination demands at a given restriction level.
    pub fn documents_for(&self, level: RestrictionLevel) -> BTreeSet<DocumentType> {
        match level {
            RestrictionLevel::Unrestricted => BTreeSet::new(),
            RestrictionLevel::Restricted => [DocumentType::ImportPermit].into_iter().collect(),
            RestrictionLevel::HighlyRestricted => {
                [DocumentType::ImportPermit, DocumentType::ExportLicense]
                    .into_iter()
                    .collect()
            }
            // Prohibited shipments carry no documents; they do not ship.
            RestrictionLevel::Prohibited => BTreeSet::new(),
        }
    }
}

fn fnv1a(country: &str, hs_code: &str) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;
    let mut hash = OFFSET;
    for byte in country.bytes().chain([b':']).chain(hs_code.bytes()) {
        hash ^= u64::from(byte);
        hash = hash.wrapping_mul(PRIME);
    }
    hash
}

/// Outcome of a product/destination eligibility check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilityResult {
    pub eligible: bool,
    pub restriction_level: RestrictionLevel,
    pub required_documents: BTreeSet<DocumentType>,
    pub reason: Option<String>,
}

/// Combines a product's intrinsic restriction with destination rules.
#[derive(Debug, Clone, Default)]
pub struct RestrictionEvaluator {
    destination_rules: DestinationRestrictions,
}

impl RestrictionEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    /// The more restrictive of the product's own level and the destination's
    /// rule for its HS code wins. Prohibited at either source short-circuits
    /// to ineligible with no document list.
    pub fn check_eligibility(
        &self,
        product: &ProductCustomsInfo,
        destination: &CountryCode,
    ) -> EligibilityResult {
        let destination_level = self.destination_rules.level_for(destination, &product.hs_code);
        let combined = product.restriction_level.combine(destination_level);

        if combined == RestrictionLevel::Prohibited {
            return EligibilityResult {
                eligible: false,
                restriction_level: combined,
                required_documents: BTreeSet::new(),
                reason: Some(format!(
                    "HS {} is prohibited for shipment to {destination}",
                    product.hs_code
                )),
            };
        }

        let mut documents = product.required_documents.clone();
        documents.extend(self.destination_rules.documents_for(destination_level));

        EligibilityResult {
            eligible: true,
            restriction_level: combined,
            required_documents: documents,
            reason: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(level: RestrictionLevel) -> ProductCustomsInfo {
        ProductCustomsInfo {
            hs_code: "610910".to_string(),
            description: "Cotton t-shirts".to_string(),
            country_of_origin: CountryCode::new("ZA").unwrap(),
            declared_value: Decimal::new(1500, 2),
            declared_value_currency: CurrencyCode::new("USD").unwrap(),
            weight_kg: Decimal::new(2, 1),
            restriction_level: level,
            required_documents: BTreeSet::new(),
        }
    }

    #[test]
    fn prohibited_product_is_ineligible_everywhere() {
        let evaluator = RestrictionEvaluator::new();
        for code in ["NA", "KE", "NG", "EG", "DE"] {
            let result = evaluator
                .check_eligibility(&product(RestrictionLevel::Prohibited), &CountryCode::new(code).unwrap());
            assert!(!result.eligible);
            assert!(result.required_documents.is_empty());
            assert!(result.reason.is_some());
        }
    }

    #[test]
    fn destination_lookup_is_deterministic() {
        let rules = DestinationRestrictions::new();
        let ke = CountryCode::new("KE").unwrap();
        let a = rules.level_for(&ke, "610910");
        let b = rules.level_for(&ke, "610910");
        assert_eq!(a, b);
    }

    #[test]
    fn eligible_result_unions_documents() {
        let evaluator = RestrictionEvaluator::new();
        let mut p = product(RestrictionLevel::Restricted);
        p.required_documents.insert(DocumentType::CertificateOfOrigin);

        // Find a destination where the pair is not prohibited.
        let destination = ["NA", "KE", "NG", "EG", "GH", "TZ"]
            .iter()
            .map(|c| CountryCode::new(c).unwrap())
            .find(|d| {
                evaluator.check_eligibility(&p, d).eligible
            })
            .expect("at least one non-prohibited destination");

        let result = evaluator.check_eligibility(&p, &destination);
        assert!(result.required_documents.contains(&DocumentType::CertificateOfOrigin));
        assert!(result.restriction_level >= RestrictionLevel::Restricted);
    }

    mod proptest_tests {
        use proptest::prelude::*;

        use super::*;

        fn level_strategy() -> impl Strategy<Value = RestrictionLevel> {
            prop_oneof![
                Just(RestrictionLevel::Unrestricted),
                Just(RestrictionLevel::Restricted),
                Just(RestrictionLevel::HighlyRestricted),
                Just(RestrictionLevel::Prohibited),
            ]
        }

        proptest! {
            /// combine is commutative, idempotent, and never de-escalates.
            #[test]
            fn combine_is_monotonic(a in level_strategy(), b in level_strategy()) {
                prop_assert_eq!(a.combine(b), b.combine(a));
                prop_assert_eq!(a.combine(a), a);
                prop_assert!(a.combine(b) >= a);
                prop_assert!(a.combine(b) >= b);
            }
        }
    }
}
