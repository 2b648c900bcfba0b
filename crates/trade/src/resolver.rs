//! Merges document requirements from independent rule sources into one
//! ordered, deduplicated set.

use std::collections::BTreeSet;

use crate::agreement::TradeAgreement;
use crate::documents::DocumentType;
use crate::restriction::ProductCustomsInfo;

/// HS chapters that always demand an import permit (alcohol, tobacco,
/// pharmaceuticals, precious stones, arms).
const PERMIT_CHAPTERS: &[u32] = &[22, 24, 30, 71, 93];

#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentRequirementResolver;

impl DocumentRequirementResolver {
    /// Documents every cross-border shipment carries.
    pub fn baseline() -> BTreeSet<DocumentType> {
        [
            DocumentType::CommercialInvoice,
            DocumentType::PackingList,
            DocumentType::CustomsDeclaration,
        ]
        .into_iter()
        .collect()
    }

    /// Documents a product triggers by itself: its declared requirements plus
    /// HS-chapter rules (agricultural chapters 1-24 need phytosanitary
    /// certification, chemical chapters 28-38 and arms chapter 93 need a
    /// dangerous-goods declaration).
    pub fn for_product(product: &ProductCustomsInfo) -> BTreeSet<DocumentType> {
        let mut documents = product.required_documents.clone();
        if let Some(chapter) = product.hs_chapter() {
            if (1..=24).contains(&chapter) {
                documents.insert(DocumentType::PhytosanitaryCertificate);
            }
            if (28..=38).contains(&chapter) || chapter == 93 {
                documents.insert(DocumentType::DangerousGoodsDeclaration);
            }
            if PERMIT_CHAPTERS.contains(&chapter) {
                documents.insert(DocumentType::ImportPermit);
            }
        }
        documents
    }

    /// Union of baseline, agreement, product, destination, and shipping-method
    /// requirements.
    pub fn resolve(
        agreements: &[&TradeAgreement],
        products: &[&ProductCustomsInfo],
        destination_documents: &BTreeSet<DocumentType>,
        method_documents: &BTreeSet<DocumentType>,
    ) -> BTreeSet<DocumentType> {
        let mut documents = Self::baseline();
        for agreement in agreements {
            documents.extend(agreement.required_documents.iter().copied());
        }
        for product in products {
            documents.extend(Self::for_product(product));
        }
        documents.extend(destination_documents.iter().copied());
        documents.extend(method_documents.iter().copied());
        documents
    }
}
