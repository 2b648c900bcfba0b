//! `mzigo-trade` — trade agreements, customs restrictions, and the
//! duty-and-tax calculator.

pub mod agreement;
pub mod documents;
pub mod duty;
pub mod jurisdiction;
pub mod resolver;
pub mod restriction;

pub use agreement::{DutyFreeThreshold, TradeAgreement, TradeAgreementRegistry};
pub use documents::{DocumentState, DocumentType};
pub use duty::{AdditionalFee, DutyAndTaxCalculator, DutyCalculationResult, ShipmentLine};
pub use jurisdiction::{FeeKind, FeeRule, InMemoryTaxRates, JurisdictionConfig, TaxRateProvider};
pub use resolver::DocumentRequirementResolver;
pub use restriction::{
    DestinationRestrictions, EligibilityResult, ProductCustomsInfo, RestrictionEvaluator,
    RestrictionLevel,
};
