//! End-to-end flow through the public engine API: entitlement, estimates,
//! landed cost, shipment creation, and document clearance.

use std::collections::BTreeSet;
use std::sync::Arc;

use rust_decimal::Decimal;

use mzigo_core::{CountryCode, CurrencyCode, MonetaryAmount, TenantId, WarehouseId};
use mzigo_currency::{CurrencyConverter, FixedRateTable};
use mzigo_engine::{
    CrossBorderOrchestrator, DestinationAddress, FeatureGate, InMemoryFeatureGates,
    InMemoryProducts, InMemoryWarehouses, LandedCostRequest, ProductDirectory, Warehouse,
    WarehouseLocator, CROSS_BORDER_FLAG,
};
use mzigo_shipping::ShippingMethod;
use mzigo_trade::{
    DocumentState, DocumentType, InMemoryTaxRates, JurisdictionConfig, ProductCustomsInfo,
    RestrictionLevel, ShipmentLine, TaxRateProvider, TradeAgreementRegistry,
};

fn country(code: &str) -> CountryCode {
    CountryCode::new(code).unwrap()
}

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn tshirt_line(value: &str, weight: &str, quantity: u32) -> ShipmentLine {
    ShipmentLine {
        customs: ProductCustomsInfo {
            hs_code: "610910".to_string(),
            description: "Cotton t-shirts".to_string(),
            country_of_origin: country("ZA"),
            declared_value: dec(value),
            declared_value_currency: CurrencyCode::usd(),
            weight_kg: dec(weight),
            restriction_level: RestrictionLevel::Unrestricted,
            required_documents: BTreeSet::new(),
        },
        quantity,
    }
}

struct World {
    orchestrator: CrossBorderOrchestrator<FixedRateTable>,
    warehouses: Arc<InMemoryWarehouses>,
    tenant: TenantId,
}

fn world() -> World {
    let gates = Arc::new(InMemoryFeatureGates::new());
    let warehouses = Arc::new(InMemoryWarehouses::new());
    let tenant = TenantId::new();
    gates.enable(tenant, CROSS_BORDER_FLAG);

    let orchestrator = CrossBorderOrchestrator::new(
        gates as Arc<dyn FeatureGate>,
        Arc::new(InMemoryProducts::new()) as Arc<dyn ProductDirectory>,
        Arc::clone(&warehouses) as Arc<dyn WarehouseLocator>,
        Arc::new(TradeAgreementRegistry::new()),
        Arc::new(CurrencyConverter::new(FixedRateTable::with_default_rates())),
        Arc::new(InMemoryTaxRates::new()) as Arc<dyn TaxRateProvider>,
        JurisdictionConfig::default(),
    );
    World {
        orchestrator,
        warehouses,
        tenant,
    }
}

fn request(w: &World, destination: &str, lines: Vec<ShipmentLine>) -> LandedCostRequest {
    LandedCostRequest {
        tenant_id: w.tenant,
        origin_country: country("ZA"),
        destination_country: country(destination),
        lines,
        shipping_cost: None,
        insurance: None,
    }
}

#[test]
fn sadc_route_under_threshold_ships_duty_free() {
    let w = world();
    let r = request(&w, "NA", vec![tshirt_line("500", "5", 1)]);
    let result = w.orchestrator.landed_cost(&r).unwrap();

    assert!(result.duties.is_duty_free);
    assert_eq!(result.duties.duty_amount, Decimal::ZERO);
    // Tax and processing fee still apply to duty-free shipments.
    assert_eq!(result.duties.tax_amount, dec("75.00")); // 15% of 500
    assert_eq!(result.duties.customs_processing_fee, dec("10"));
    assert_eq!(result.total_landed_cost, dec("500") + dec("85.00"));
}

#[test]
fn sadc_route_over_threshold_pays_duty() {
    let w = world();
    let r = request(&w, "NA", vec![tshirt_line("1500", "5", 1)]);
    let result = w.orchestrator.landed_cost(&r).unwrap();

    assert!(!result.duties.is_duty_free);
    assert_eq!(result.duties.duty_rate_percentage, dec("20"));
    assert_eq!(result.duties.duty_amount, dec("300.00"));
    // 15% of 1800, then the 1001-5000 fee tier.
    assert_eq!(result.duties.tax_amount, dec("270.00"));
    assert_eq!(result.duties.customs_processing_fee, dec("50"));
}

#[test]
fn route_without_agreement_pays_full_rates() {
    let w = world();
    let r = request(&w, "KE", vec![tshirt_line("1000", "5", 1)]);
    let result = w.orchestrator.landed_cost(&r).unwrap();

    assert!(!result.duties.is_duty_free);
    assert_eq!(result.duties.duty_amount, dec("250.00")); // 25% of 1000
    assert_eq!(result.duties.tax_amount, dec("200.00")); // 16% of 1250
    assert_eq!(result.duties.additional_fees.len(), 1); // import declaration fee
}

#[test]
fn estimates_rank_by_total_cost_and_respect_the_route() {
    let w = world();
    let mut r = request(&w, "KE", vec![tshirt_line("250", "4", 2)]);
    r.shipping_cost = Some(MonetaryAmount::new(dec("60"), CurrencyCode::usd()));

    let estimates = w.orchestrator.shipping_estimates(&r).unwrap();
    assert_eq!(estimates.len(), 4);
    for pair in estimates.windows(2) {
        assert!(pair[0].total_cost <= pair[1].total_cost);
    }

    // ZA -> KE is a short inter-region crossing: regional hubs, no Dubai leg.
    let standard = estimates
        .iter()
        .find(|e| e.method == ShippingMethod::Standard)
        .unwrap();
    assert_eq!(standard.distance_factor, dec("1.5"));
    let hubs: Vec<&str> = standard.transit_points.iter().map(|p| p.code.as_str()).collect();
    assert_eq!(hubs, ["JNB", "NBO"]);
    assert!(standard.tracking_available);
    assert!(!standard.is_guaranteed);
}

#[test]
fn shipment_creation_and_document_clearance() {
    let w = world();
    w.warehouses.insert(
        w.tenant,
        Warehouse {
            id: WarehouseId::new(),
            name: "Johannesburg DC".to_string(),
            country: country("ZA"),
            supports_international: true,
            active: true,
        },
    );

    let r = request(&w, "NA", vec![tshirt_line("500", "5", 1)]);
    let address = DestinationAddress {
        street: Some("12 Independence Ave".to_string()),
        city: Some("Windhoek".to_string()),
        country: country("NA"),
    };
    let mut shipment = w
        .orchestrator
        .create_shipment(&r, ShippingMethod::Express, address.clone())
        .unwrap();

    // The record stands alone: address and reference-currency figures stored.
    assert_eq!(shipment.destination_address, address);
    assert_eq!(shipment.currency, CurrencyCode::usd());
    assert_eq!(shipment.total_value, dec("500"));
    assert_eq!(shipment.shipping_cost, dec("77.50")); // 12.50 x 5kg x 1.0 + 15
    assert_eq!(
        shipment.total_cost,
        shipment.total_value + shipment.shipping_cost + shipment.duties.total_duties_and_taxes
    );

    // Express carriage adds the insurance certificate on top of customs docs.
    assert!(
        shipment
            .document_status
            .contains_key(&DocumentType::InsuranceCertificate)
    );
    assert!(
        shipment
            .document_status
            .values()
            .all(|state| *state == DocumentState::Pending)
    );
    assert!(!shipment.documents_complete());

    let documents: Vec<DocumentType> = shipment.document_status.keys().copied().collect();
    for document in documents {
        shipment.submit_document(document).unwrap();
        shipment.approve_document(document).unwrap();
    }
    assert!(shipment.documents_complete());
}

#[test]
fn unentitled_tenant_is_rejected_everywhere() {
    let w = world();
    let mut r = request(&w, "NA", vec![tshirt_line("500", "5", 1)]);
    r.tenant_id = TenantId::new();

    assert!(w.orchestrator.landed_cost(&r).is_err());
    assert!(w.orchestrator.shipping_estimates(&r).is_err());
    assert!(
        w.orchestrator
            .check_shipment_eligibility(&r.tenant_id, &r.destination_country, &r.lines)
            .is_err()
    );
    assert!(
        w.orchestrator
            .create_shipment(
                &r,
                ShippingMethod::Standard,
                DestinationAddress::country_only(country("NA")),
            )
            .is_err()
    );
}

#[test]
fn multi_currency_lines_settle_in_the_reference_currency() {
    let w = world();
    let mut zar_line = tshirt_line("9200", "5", 1); // 500 USD at 18.40
    zar_line.customs.declared_value_currency = CurrencyCode::new("ZAR").unwrap();
    let r = request(&w, "NA", vec![zar_line, tshirt_line("250", "2", 1)]);

    let result = w.orchestrator.landed_cost(&r).unwrap();
    assert_eq!(result.currency, CurrencyCode::usd());
    // Crossing ZAR through the reference currency leaves sub-cent residue.
    assert!((result.goods_value - dec("750")).abs() < dec("0.01"));
    assert!(result.duties.is_duty_free);
}

#[test]
fn estimates_serialize_with_stable_field_casing() {
    let w = world();
    let r = request(&w, "KE", vec![tshirt_line("250", "4", 1)]);
    let estimates = w.orchestrator.shipping_estimates(&r).unwrap();

    let json = serde_json::to_value(&estimates).unwrap();
    let methods: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["method"].as_str().unwrap())
        .collect();
    assert!(methods.contains(&"local_pickup"));
    assert!(methods.contains(&"express"));

    let first = &json.as_array().unwrap()[0];
    let documents = first["required_documents"].as_array().unwrap();
    assert!(
        documents
            .iter()
            .any(|d| d.as_str() == Some("COMMERCIAL_INVOICE"))
    );
}
