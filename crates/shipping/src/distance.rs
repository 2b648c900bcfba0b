//! Country-region distance model: cost multipliers and transit routing.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use mzigo_core::{AfricanRegion, CountryCode};

/// A hub a shipment passes through on its way to the destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitPoint {
    pub code: String,
    pub name: String,
}

impl TransitPoint {
    fn new(code: &str, name: &str) -> Self {
        Self {
            code: code.to_string(),
            name: name.to_string(),
        }
    }
}

fn regional_hub(region: AfricanRegion) -> TransitPoint {
    match region {
        AfricanRegion::Southern => TransitPoint::new("JNB", "Johannesburg hub"),
        AfricanRegion::East => TransitPoint::new("NBO", "Nairobi hub"),
        AfricanRegion::West => TransitPoint::new("LOS", "Lagos hub"),
        AfricanRegion::North => TransitPoint::new("CAI", "Cairo hub"),
    }
}

fn global_hub() -> TransitPoint {
    TransitPoint::new("DXB", "Dubai consolidation hub")
}

/// Multiplier applied to shipping cost and delivery time for a route.
///
/// Domestic routes get a discount; routes leaving the recognized African
/// regions pay the rest-of-world tier.
pub fn distance_factor(origin: &CountryCode, destination: &CountryCode) -> Decimal {
    if origin == destination {
        return Decimal::new(8, 1); // 0.8
    }
    match (origin.region(), destination.region()) {
        (Some(a), Some(b)) if a == b => Decimal::ONE,
        (Some(_), Some(_)) => Decimal::new(15, 1), // 1.5
        _ => Decimal::TWO,
    }
}

/// Hubs along the route, in travel order.
pub fn transit_points(origin: &CountryCode, destination: &CountryCode) -> Vec<TransitPoint> {
    if origin == destination {
        return Vec::new();
    }
    match (origin.region(), destination.region()) {
        (Some(a), Some(b)) if a == b => vec![regional_hub(a)],
        (Some(a), Some(b)) => {
            let mut route = vec![regional_hub(a)];
            if a.is_long_distance_to(b) {
                route.push(global_hub());
            }
            route.push(regional_hub(b));
            route
        }
        (a, b) => {
            // Rest-of-world leg always consolidates at the global hub.
            let mut route = Vec::new();
            if let Some(region) = a {
                route.push(regional_hub(region));
            }
            route.push(global_hub());
            if let Some(region) = b {
                route.push(regional_hub(region));
            }
            route
        }
    }
}
