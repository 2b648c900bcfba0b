//! `mzigo-engine` — the cross-border trade orchestrator.
//!
//! Composes the currency, trade, and shipping crates behind one gated entry
//! point: landed-cost breakdowns, per-method shipping estimates, eligibility
//! checks, and shipment creation with document tracking.

pub mod orchestrator;
pub mod providers;
pub mod request;
pub mod shipment;

pub use orchestrator::{CrossBorderOrchestrator, CROSS_BORDER_FLAG};
pub use providers::{
    CatalogProduct, FeatureGate, InMemoryFeatureGates, InMemoryProducts, InMemoryWarehouses,
    ProductDirectory, Warehouse, WarehouseLocator,
};
pub use request::{LandedCostRequest, LandedCostResult, ShipmentEligibility, ShippingEstimate};
pub use shipment::{DestinationAddress, ShipmentDetails};
