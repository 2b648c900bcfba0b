//! Shipping methods and their per-method lookup tables.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Closed set of supported shipping methods.
///
/// `ALL` fixes the enumeration order used to break ties when estimates are
/// sorted by cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShippingMethod {
    Express,
    Standard,
    Economy,
    LocalPickup,
}

impl ShippingMethod {
    pub const ALL: [Self; 4] = [Self::Express, Self::Standard, Self::Economy, Self::LocalPickup];

    /// Base tariff per kilogram, in the reference currency.
    pub fn rate_per_kg(self) -> Decimal {
        match self {
            Self::Express => Decimal::new(1250, 2),  // 12.50
            Self::Standard => Decimal::new(675, 2),  // 6.75
            Self::Economy => Decimal::new(320, 2),   // 3.20
            Self::LocalPickup => Decimal::ZERO,
        }
    }

    /// Unscaled delivery window in whole days.
    pub fn base_delivery_days(self) -> (u32, u32) {
        match self {
            Self::Express => (1, 3),
            Self::Standard => (3, 7),
            Self::Economy => (7, 14),
            Self::LocalPickup => (1, 2),
        }
    }

    pub fn carrier(self) -> (&'static str, &'static str) {
        match self {
            Self::Express => ("ACX", "AfriCargo Express"),
            Self::Standard => ("PSL", "PanSahel Logistics"),
            Self::Economy => ("TKF", "TransKalahari Freight"),
            Self::LocalPickup => ("SELF", "Seller pickup point"),
        }
    }

    pub fn is_guaranteed(self) -> bool {
        matches!(self, Self::Express)
    }

    pub fn tracking_available(self) -> bool {
        matches!(self, Self::Express | Self::Standard)
    }
}

impl core::fmt::Display for ShippingMethod {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            Self::Express => "express",
            Self::Standard => "standard",
            Self::Economy => "economy",
            Self::LocalPickup => "local_pickup",
        };
        f.write_str(s)
    }
}
