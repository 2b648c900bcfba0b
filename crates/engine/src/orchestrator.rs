//! The cross-border orchestrator: entitlement gating, validation, and
//! composition of duty, shipping, and restriction components.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;

use mzigo_core::{
    CountryCode, CurrencyCode, EngineError, EngineResult, MonetaryAmount, ProductId, ShipmentId,
    TenantId,
};
use mzigo_currency::{ConversionOptions, CurrencyConverter, CurrencyRateSource};
use mzigo_shipping::{ShippingMethod, ShippingRateEstimator};
use mzigo_trade::{
    DocumentState, DocumentType, DutyAndTaxCalculator, DutyCalculationResult, JurisdictionConfig,
    RestrictionEvaluator, RestrictionLevel, ShipmentLine, TaxRateProvider, TradeAgreementRegistry,
};

use crate::providers::{FeatureGate, ProductDirectory, Warehouse, WarehouseLocator};
use crate::request::{LandedCostRequest, LandedCostResult, ShipmentEligibility, ShippingEstimate};
use crate::shipment::{DestinationAddress, ShipmentDetails};

/// Entitlement flag every cross-border operation is gated on.
pub const CROSS_BORDER_FLAG: &str = "cross_border_trade";

/// Front door of the engine. Every operation checks the tenant's
/// entitlement before doing any work.
pub struct CrossBorderOrchestrator<S> {
    feature_gates: Arc<dyn FeatureGate>,
    products: Arc<dyn ProductDirectory>,
    warehouses: Arc<dyn WarehouseLocator>,
    converter: Arc<CurrencyConverter<S>>,
    calculator: DutyAndTaxCalculator<S, Arc<dyn TaxRateProvider>>,
    estimator: ShippingRateEstimator,
    evaluator: RestrictionEvaluator,
}

impl<S: CurrencyRateSource> CrossBorderOrchestrator<S> {
    pub fn new(
        feature_gates: Arc<dyn FeatureGate>,
        products: Arc<dyn ProductDirectory>,
        warehouses: Arc<dyn WarehouseLocator>,
        registry: Arc<TradeAgreementRegistry>,
        converter: Arc<CurrencyConverter<S>>,
        tax_provider: Arc<dyn TaxRateProvider>,
        config: JurisdictionConfig,
    ) -> Self {
        let calculator =
            DutyAndTaxCalculator::new(registry, Arc::clone(&converter), tax_provider, config);
        Self {
            feature_gates,
            products,
            warehouses,
            converter,
            calculator,
            estimator: ShippingRateEstimator::new(),
            evaluator: RestrictionEvaluator::new(),
        }
    }

    fn ensure_enabled(&self, tenant: &TenantId) -> EngineResult<()> {
        if self.feature_gates.enabled(tenant, CROSS_BORDER_FLAG) {
            Ok(())
        } else {
            tracing::info!(%tenant, flag = CROSS_BORDER_FLAG, "blocked by feature gate");
            Err(EngineError::feature_disabled(CROSS_BORDER_FLAG))
        }
    }

    /// Build shipment lines from catalogue products, by reference.
    pub fn lines_for_products(
        &self,
        tenant: &TenantId,
        items: &[(ProductId, u32)],
    ) -> EngineResult<Vec<ShipmentLine>> {
        self.ensure_enabled(tenant)?;
        items
            .iter()
            .map(|(id, quantity)| {
                let product = self.products.find_product(tenant, id)?;
                Ok(ShipmentLine {
                    customs: product.customs,
                    quantity: *quantity,
                })
            })
            .collect()
    }

    /// Check every line against the destination's restriction rules.
    ///
    /// The shipment is eligible only when no line is prohibited; the report
    /// carries the most restrictive level and the union of line documents.
    pub fn check_shipment_eligibility(
        &self,
        tenant: &TenantId,
        destination: &CountryCode,
        lines: &[ShipmentLine],
    ) -> EngineResult<ShipmentEligibility> {
        self.ensure_enabled(tenant)?;
        if lines.is_empty() {
            return Err(EngineError::validation("eligibility check needs at least one line"));
        }

        let mut level = RestrictionLevel::Unrestricted;
        let mut documents = BTreeSet::new();
        let mut blocked_reasons = Vec::new();

        for line in lines {
            let result = self.evaluator.check_eligibility(&line.customs, destination);
            level = level.combine(result.restriction_level);
            documents.extend(result.required_documents);
            if let Some(reason) = result.reason {
                blocked_reasons.push(reason);
            }
        }

        Ok(ShipmentEligibility {
            eligible: blocked_reasons.is_empty(),
            restriction_level: level,
            required_documents: documents,
            blocked_reasons,
        })
    }

    /// Full landed-cost breakdown in the reference currency.
    pub fn landed_cost(&self, request: &LandedCostRequest) -> EngineResult<LandedCostResult> {
        self.ensure_enabled(&request.tenant_id)?;
        request.validate()?;

        let duties = self.calculate_duties(request)?;
        let goods_value = self.goods_value_usd(&request.lines)?;
        let shipping_cost = self.optional_usd(request.shipping_cost.as_ref())?;
        let insurance_cost = self.optional_usd(request.insurance.as_ref())?;

        let total_landed_cost =
            goods_value + shipping_cost + insurance_cost + duties.total_duties_and_taxes;

        tracing::info!(
            tenant = %request.tenant_id,
            origin = %request.origin_country,
            destination = %request.destination_country,
            %total_landed_cost,
            duty_free = duties.is_duty_free,
            "landed cost computed"
        );

        Ok(LandedCostResult {
            goods_value,
            shipping_cost,
            insurance_cost,
            duties,
            total_landed_cost,
            currency: CurrencyCode::usd(),
        })
    }

    /// One estimate per shipping method, cheapest total first.
    ///
    /// Duties are computed once for the shipment and shared across methods;
    /// sorting is stable, so ties keep the method enumeration order.
    pub fn shipping_estimates(
        &self,
        request: &LandedCostRequest,
    ) -> EngineResult<Vec<ShippingEstimate>> {
        self.ensure_enabled(&request.tenant_id)?;
        request.validate()?;

        let duties = self.calculate_duties(request)?;
        let goods_value = self.goods_value_usd(&request.lines)?;
        let total_weight: Decimal = request.lines.iter().map(ShipmentLine::line_weight_kg).sum();

        let mut estimates: Vec<ShippingEstimate> = ShippingMethod::ALL
            .into_iter()
            .map(|method| {
                let quote = self.estimator.estimate(
                    method,
                    &request.origin_country,
                    &request.destination_country,
                    total_weight,
                    goods_value,
                );
                let mut required_documents = duties.required_documents.clone();
                required_documents.extend(method_documents(method));

                let (carrier_code, carrier_name) = method.carrier();
                ShippingEstimate {
                    method,
                    origin_country: request.origin_country.clone(),
                    destination_country: request.destination_country.clone(),
                    carrier_code: carrier_code.to_string(),
                    carrier_name: carrier_name.to_string(),
                    base_cost: quote.base_cost,
                    duties: duties.clone(),
                    total_cost: quote.base_cost + duties.total_duties_and_taxes,
                    currency: CurrencyCode::usd(),
                    delivery_days: quote.delivery_days,
                    distance_factor: quote.distance_factor,
                    transit_points: quote.transit_points,
                    insurance_options: quote.insurance_options,
                    required_documents,
                    tracking_available: method.tracking_available(),
                    is_guaranteed: method.is_guaranteed(),
                }
            })
            .collect();

        estimates.sort_by(|a, b| a.total_cost.cmp(&b.total_cost));
        Ok(estimates)
    }

    /// Create a shipment record from an eligible request.
    ///
    /// The origin warehouse defaults to the tenant's first active warehouse in
    /// the origin country that can serve the route. All required documents
    /// start pending. The record keeps the figures it was created from: goods
    /// value, the quoted carriage cost for `method`, and the landed total, all
    /// in the reference currency.
    pub fn create_shipment(
        &self,
        request: &LandedCostRequest,
        method: ShippingMethod,
        destination_address: DestinationAddress,
    ) -> EngineResult<ShipmentDetails> {
        self.ensure_enabled(&request.tenant_id)?;
        request.validate()?;
        if destination_address.country != request.destination_country {
            return Err(EngineError::validation(format!(
                "delivery address country {} does not match destination {}",
                destination_address.country, request.destination_country
            )));
        }

        let eligibility = self.check_shipment_eligibility(
            &request.tenant_id,
            &request.destination_country,
            &request.lines,
        )?;
        if !eligibility.eligible {
            return Err(EngineError::validation(format!(
                "shipment is not eligible: {}",
                eligibility.blocked_reasons.join("; ")
            )));
        }

        let duties = self.calculate_duties(request)?;
        let warehouse = self.default_warehouse(request)?;

        let total_value = self.goods_value_usd(&request.lines)?;
        let total_weight: Decimal = request.lines.iter().map(ShipmentLine::line_weight_kg).sum();
        let quote = self.estimator.estimate(
            method,
            &request.origin_country,
            &request.destination_country,
            total_weight,
            total_value,
        );
        let total_cost = total_value + quote.base_cost + duties.total_duties_and_taxes;

        let mut required = duties.required_documents.clone();
        required.extend(eligibility.required_documents);
        required.extend(method_documents(method));
        let document_status: BTreeMap<DocumentType, DocumentState> = required
            .into_iter()
            .map(|doc| (doc, DocumentState::Pending))
            .collect();

        let shipment = ShipmentDetails {
            id: ShipmentId::new(),
            tenant_id: request.tenant_id,
            warehouse_id: warehouse.id,
            origin_country: request.origin_country.clone(),
            destination_address,
            method,
            lines: request.lines.clone(),
            total_value,
            shipping_cost: quote.base_cost,
            duties,
            total_cost,
            currency: CurrencyCode::usd(),
            document_status,
            created_at: Utc::now(),
        };

        tracing::info!(
            shipment = %shipment.id,
            tenant = %shipment.tenant_id,
            origin = %shipment.origin_country,
            destination = %shipment.destination_address.country,
            %method,
            %total_cost,
            documents = shipment.document_status.len(),
            "shipment created"
        );
        Ok(shipment)
    }

    fn calculate_duties(&self, request: &LandedCostRequest) -> EngineResult<DutyCalculationResult> {
        self.calculator.calculate(
            &request.origin_country,
            &request.destination_country,
            &request.lines,
            request.shipping_cost.as_ref(),
            request.insurance.as_ref(),
        )
    }

    fn goods_value_usd(&self, lines: &[ShipmentLine]) -> EngineResult<Decimal> {
        let usd = CurrencyCode::usd();
        let raw = ConversionOptions::default();
        let mut total = Decimal::ZERO;
        for line in lines {
            total += self.converter.convert(
                line.line_value(),
                &line.customs.declared_value_currency,
                &usd,
                false,
                &raw,
            )?;
        }
        Ok(total)
    }

    fn optional_usd(&self, amount: Option<&MonetaryAmount>) -> EngineResult<Decimal> {
        let Some(amount) = amount else {
            return Ok(Decimal::ZERO);
        };
        self.converter.convert(
            amount.amount,
            &amount.currency,
            &CurrencyCode::usd(),
            false,
            &ConversionOptions::default(),
        )
    }

    fn default_warehouse(&self, request: &LandedCostRequest) -> EngineResult<Warehouse> {
        let cross_border = request.origin_country != request.destination_country;
        self.warehouses
            .warehouses_in(&request.tenant_id, &request.origin_country)?
            .into_iter()
            .find(|w| w.active && (!cross_border || w.supports_international))
            .ok_or_else(|| {
                EngineError::not_found(format!(
                    "no suitable warehouse in {} for tenant {}",
                    request.origin_country, request.tenant_id
                ))
            })
    }
}

/// Documents a shipping method demands on top of customs requirements.
fn method_documents(method: ShippingMethod) -> BTreeSet<DocumentType> {
    match method {
        // Guaranteed-delivery carriage is insured end to end.
        ShippingMethod::Express => [DocumentType::InsuranceCertificate].into_iter().collect(),
        _ => BTreeSet::new(),
    }
}
