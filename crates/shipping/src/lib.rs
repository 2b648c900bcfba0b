//! `mzigo-shipping` — per-method shipping cost/time estimation over the
//! country-region distance model.

pub mod distance;
pub mod estimator;
pub mod method;

pub use distance::{distance_factor, transit_points, TransitPoint};
pub use estimator::{DeliveryWindow, InsuranceOption, RateQuote, ShippingRateEstimator};
pub use method::ShippingMethod;
