//! `mzigo-core` — shared vocabulary of the cross-border trade engine.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! the error taxonomy, typed identifiers, and country/region and currency types.

pub mod country;
pub mod currency;
pub mod error;
pub mod id;

pub use country::{AfricanRegion, CountryCode};
pub use currency::{CurrencyCode, MonetaryAmount, TaxType};
pub use error::{EngineError, EngineResult};
pub use id::{ProductId, ShipmentId, TenantId, WarehouseId};
