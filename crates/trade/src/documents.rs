//! Customs and shipping document types and their submission lifecycle.

use serde::{Deserialize, Serialize};

/// Documents a shipment may be required to carry.
///
/// `Ord` gives the resolver a stable order for the merged requirement set.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentType {
    CommercialInvoice,
    PackingList,
    CustomsDeclaration,
    CertificateOfOrigin,
    ImportPermit,
    ExportLicense,
    PhytosanitaryCertificate,
    DangerousGoodsDeclaration,
    InsuranceCertificate,
}

impl core::fmt::Display for DocumentType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            Self::CommercialInvoice => "COMMERCIAL_INVOICE",
            Self::PackingList => "PACKING_LIST",
            Self::CustomsDeclaration => "CUSTOMS_DECLARATION",
            Self::CertificateOfOrigin => "CERTIFICATE_OF_ORIGIN",
            Self::ImportPermit => "IMPORT_PERMIT",
            Self::ExportLicense => "EXPORT_LICENSE",
            Self::PhytosanitaryCertificate => "PHYTOSANITARY_CERTIFICATE",
            Self::DangerousGoodsDeclaration => "DANGEROUS_GOODS_DECLARATION",
            Self::InsuranceCertificate => "INSURANCE_CERTIFICATE",
        };
        f.write_str(s)
    }
}

/// Submission state of one required document on a shipment.
///
/// Pending → Submitted → Approved | Rejected. Approved is terminal; a rejected
/// document may be resubmitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentState {
    Pending,
    Submitted,
    Approved,
    Rejected,
}

impl DocumentState {
    pub fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Submitted)
                | (Self::Submitted, Self::Approved)
                | (Self::Submitted, Self::Rejected)
                | (Self::Rejected, Self::Submitted)
        )
    }
}
