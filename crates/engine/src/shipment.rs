//! Created shipment records and their document submission lifecycle.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use mzigo_core::{CountryCode, CurrencyCode, EngineError, EngineResult, ShipmentId, TenantId, WarehouseId};
use mzigo_shipping::ShippingMethod;
use mzigo_trade::{DocumentState, DocumentType, DutyCalculationResult, ShipmentLine};

/// Where a shipment is delivered. Street and city are free-form; the country
/// drives all customs logic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DestinationAddress {
    pub street: Option<String>,
    pub city: Option<String>,
    pub country: CountryCode,
}

impl DestinationAddress {
    /// Address known only down to the country, e.g. for quotes firmed up later.
    pub fn country_only(country: CountryCode) -> Self {
        Self {
            street: None,
            city: None,
            country,
        }
    }
}

/// A created cross-border shipment, pending document clearance.
///
/// The monetary figures it was created from are recorded on the shipment, in
/// the reference currency, so the persisted record stands alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipmentDetails {
    pub id: ShipmentId,
    pub tenant_id: TenantId,
    pub warehouse_id: WarehouseId,
    pub origin_country: CountryCode,
    pub destination_address: DestinationAddress,
    pub method: ShippingMethod,
    pub lines: Vec<ShipmentLine>,
    /// Declared goods value.
    pub total_value: Decimal,
    /// Quoted carriage cost for the chosen method.
    pub shipping_cost: Decimal,
    pub duties: DutyCalculationResult,
    /// Always `total_value + shipping_cost + duties.total_duties_and_taxes`.
    pub total_cost: Decimal,
    pub currency: CurrencyCode,
    /// Every required document starts `Pending`.
    pub document_status: BTreeMap<DocumentType, DocumentState>,
    pub created_at: DateTime<Utc>,
}

impl ShipmentDetails {
    pub fn submit_document(&mut self, document: DocumentType) -> EngineResult<()> {
        self.transition(document, DocumentState::Submitted)
    }

    pub fn approve_document(&mut self, document: DocumentType) -> EngineResult<()> {
        self.transition(document, DocumentState::Approved)
    }

    pub fn reject_document(&mut self, document: DocumentType) -> EngineResult<()> {
        self.transition(document, DocumentState::Rejected)
    }

    /// Combined cargo weight across all lines.
    pub fn total_weight_kg(&self) -> rust_decimal::Decimal {
        self.lines.iter().map(ShipmentLine::line_weight_kg).sum()
    }

    /// Whether every required document has been approved.
    pub fn documents_complete(&self) -> bool {
        self.document_status
            .values()
            .all(|state| *state == DocumentState::Approved)
    }

    fn transition(&mut self, document: DocumentType, next: DocumentState) -> EngineResult<()> {
        let Some(current) = self.document_status.get_mut(&document) else {
            return Err(EngineError::not_found(format!(
                "shipment {} does not require {document}",
                self.id
            )));
        };
        if !current.can_transition_to(next) {
            return Err(EngineError::validation(format!(
                "{document} cannot move from {current:?} to {next:?}"
            )));
        }
        tracing::debug!(shipment = %self.id, %document, from = ?current, to = ?next, "document state change");
        *current = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use rust_decimal::Decimal;

    use mzigo_core::CurrencyCode;

    use super::*;

    fn shipment() -> ShipmentDetails {
        let duties = DutyCalculationResult {
            duty_amount: Decimal::ZERO,
            currency: CurrencyCode::usd(),
            duty_rate_percentage: Decimal::ZERO,
            tax_amount: Decimal::ZERO,
            customs_processing_fee: Decimal::ZERO,
            total_duties_and_taxes: Decimal::ZERO,
            is_duty_free: true,
            duty_free_reason: None,
            required_documents: BTreeSet::new(),
            additional_fees: Vec::new(),
        };
        ShipmentDetails {
            id: ShipmentId::new(),
            tenant_id: TenantId::new(),
            warehouse_id: WarehouseId::new(),
            origin_country: CountryCode::new("ZA").unwrap(),
            destination_address: DestinationAddress::country_only(CountryCode::new("NA").unwrap()),
            method: ShippingMethod::Standard,
            lines: Vec::new(),
            total_value: Decimal::ZERO,
            shipping_cost: Decimal::ZERO,
            duties,
            total_cost: Decimal::ZERO,
            currency: CurrencyCode::usd(),
            document_status: [
                (DocumentType::CommercialInvoice, DocumentState::Pending),
                (DocumentType::PackingList, DocumentState::Pending),
            ]
            .into_iter()
            .collect(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn full_document_lifecycle() {
        let mut s = shipment();
        s.submit_document(DocumentType::CommercialInvoice).unwrap();
        s.reject_document(DocumentType::CommercialInvoice).unwrap();
        s.submit_document(DocumentType::CommercialInvoice).unwrap();
        s.approve_document(DocumentType::CommercialInvoice).unwrap();
        assert!(!s.documents_complete());

        s.submit_document(DocumentType::PackingList).unwrap();
        s.approve_document(DocumentType::PackingList).unwrap();
        assert!(s.documents_complete());
    }

    #[test]
    fn approval_requires_prior_submission() {
        let mut s = shipment();
        let err = s.approve_document(DocumentType::PackingList).unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
    }

    #[test]
    fn approved_documents_never_regress() {
        let mut s = shipment();
        s.submit_document(DocumentType::PackingList).unwrap();
        s.approve_document(DocumentType::PackingList).unwrap();
        assert!(s.reject_document(DocumentType::PackingList).is_err());
        assert!(s.submit_document(DocumentType::PackingList).is_err());
    }

    #[test]
    fn unknown_document_is_not_found() {
        let mut s = shipment();
        let err = s.submit_document(DocumentType::ImportPermit).unwrap_err();
        assert!(matches!(err, EngineError::NotFound(_)));
    }
}
