use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use std::collections::BTreeSet;
use std::sync::Arc;

use rust_decimal::Decimal;

use mzigo_core::{CountryCode, CurrencyCode, TenantId};
use mzigo_currency::{CurrencyConverter, FixedRateTable};
use mzigo_engine::{
    CrossBorderOrchestrator, FeatureGate, InMemoryFeatureGates, InMemoryProducts,
    InMemoryWarehouses, LandedCostRequest, ProductDirectory, WarehouseLocator, CROSS_BORDER_FLAG,
};
use mzigo_trade::{
    InMemoryTaxRates, JurisdictionConfig, ProductCustomsInfo, RestrictionLevel, ShipmentLine,
    TaxRateProvider, TradeAgreementRegistry,
};

fn setup() -> (CrossBorderOrchestrator<FixedRateTable>, TenantId) {
    let gates = Arc::new(InMemoryFeatureGates::new());
    let tenant = TenantId::new();
    gates.enable(tenant, CROSS_BORDER_FLAG);

    let orchestrator = CrossBorderOrchestrator::new(
        gates as Arc<dyn FeatureGate>,
        Arc::new(InMemoryProducts::new()) as Arc<dyn ProductDirectory>,
        Arc::new(InMemoryWarehouses::new()) as Arc<dyn WarehouseLocator>,
        Arc::new(TradeAgreementRegistry::new()),
        Arc::new(CurrencyConverter::new(FixedRateTable::with_default_rates())),
        Arc::new(InMemoryTaxRates::new()) as Arc<dyn TaxRateProvider>,
        JurisdictionConfig::default(),
    );
    (orchestrator, tenant)
}

fn request(tenant: TenantId, destination: &str, lines: usize) -> LandedCostRequest {
    let line = ShipmentLine {
        customs: ProductCustomsInfo {
            hs_code: "610910".to_string(),
            description: "Cotton t-shirts".to_string(),
            country_of_origin: CountryCode::new("ZA").unwrap(),
            declared_value: Decimal::new(4999, 2),
            declared_value_currency: CurrencyCode::new("ZAR").unwrap(),
            weight_kg: Decimal::new(25, 2),
            restriction_level: RestrictionLevel::Unrestricted,
            required_documents: BTreeSet::new(),
        },
        quantity: 3,
    };
    LandedCostRequest {
        tenant_id: tenant,
        origin_country: CountryCode::new("ZA").unwrap(),
        destination_country: CountryCode::new(destination).unwrap(),
        lines: vec![line; lines],
        shipping_cost: None,
        insurance: None,
    }
}

fn bench_landed_cost(c: &mut Criterion) {
    let (orchestrator, tenant) = setup();
    let mut group = c.benchmark_group("landed_cost");

    for lines in [1usize, 10, 100] {
        let r = request(tenant, "KE", lines);
        group.throughput(Throughput::Elements(lines as u64));
        group.bench_with_input(BenchmarkId::from_parameter(lines), &r, |b, r| {
            b.iter(|| orchestrator.landed_cost(black_box(r)).unwrap());
        });
    }
    group.finish();
}

fn bench_shipping_estimates(c: &mut Criterion) {
    let (orchestrator, tenant) = setup();
    let mut group = c.benchmark_group("shipping_estimates");

    for destination in ["NA", "KE", "EG", "DE"] {
        let r = request(tenant, destination, 5);
        group.bench_with_input(BenchmarkId::from_parameter(destination), &r, |b, r| {
            b.iter(|| orchestrator.shipping_estimates(black_box(r)).unwrap());
        });
    }
    group.finish();
}

criterion_group!(benches, bench_landed_cost, bench_shipping_estimates);
criterion_main!(benches);
