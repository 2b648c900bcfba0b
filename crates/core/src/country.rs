//! Country codes and the African macro-region model.
//!
//! The region grouping drives the shipping distance factor and transit-point
//! derivation; countries outside the recognized regions are treated as
//! rest-of-world.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// ISO 3166-1 alpha-2 style country code, always stored uppercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CountryCode(String);

impl CountryCode {
    /// Parse and normalize a two-letter country code.
    pub fn new(code: impl AsRef<str>) -> EngineResult<Self> {
        let code = code.as_ref().trim();
        if code.len() != 2 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(EngineError::validation(format!(
                "country code must be two ASCII letters, got {code:?}"
            )));
        }
        Ok(Self(code.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Macro region this country belongs to, if it is a recognized African market.
    pub fn region(&self) -> Option<AfricanRegion> {
        AfricanRegion::of(self)
    }
}

impl core::fmt::Display for CountryCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for CountryCode {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// African macro regions used by the distance model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AfricanRegion {
    Southern,
    East,
    West,
    North,
}

impl AfricanRegion {
    /// Region membership table.
    ///
    /// Not exhaustive over the continent; unlisted countries fall through to
    /// the rest-of-world distance tier.
    pub fn of(country: &CountryCode) -> Option<Self> {
        let region = match country.as_str() {
            "ZA" | "NA" | "BW" | "ZW" | "MZ" | "LS" | "SZ" | "ZM" | "MW" | "AO" => Self::Southern,
            "KE" | "TZ" | "UG" | "RW" | "BI" | "ET" | "SO" | "SS" | "DJ" => Self::East,
            "NG" | "GH" | "SN" | "CI" | "ML" | "BF" | "BJ" | "TG" | "NE" | "GN" | "SL" | "LR"
            | "GM" => Self::West,
            "EG" | "MA" | "DZ" | "TN" | "LY" | "SD" => Self::North,
            _ => return None,
        };
        Some(region)
    }

    /// Whether a route between two regions crosses the continent the long way
    /// (north against south, or east against west).
    pub fn is_long_distance_to(self, other: Self) -> bool {
        matches!(
            (self, other),
            (Self::North, Self::Southern)
                | (Self::Southern, Self::North)
                | (Self::East, Self::West)
                | (Self::West, Self::East)
        )
    }
}
