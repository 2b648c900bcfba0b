//! Engine error model.

use thiserror::Error;

/// Result type used across the engine.
pub type EngineResult<T> = Result<T, EngineError>;

/// Engine-level error.
///
/// Keep this focused on deterministic failures of the calculation core.
/// Infrastructure concerns (transport, persistence) belong elsewhere.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The tenant lacks the cross-border entitlement. Raised before any
    /// computation starts; maps to a forbidden-class response at the boundary.
    #[error("feature disabled: {0}")]
    FeatureDisabled(String),

    /// A lookup came back empty where a value was required
    /// (unresolvable currency pair, unknown agreement code, no warehouse).
    #[error("not found: {0}")]
    NotFound(String),

    /// A request failed validation (e.g. missing destination country).
    #[error("validation failed: {0}")]
    Validation(String),

    /// Unexpected internal failure during rate/tax resolution. The message is
    /// generic on purpose; the cause is logged with context where it occurs.
    #[error("computation failed: {0}")]
    Computation(String),
}

impl EngineError {
    pub fn feature_disabled(flag: impl Into<String>) -> Self {
        Self::FeatureDisabled(flag.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn computation(msg: impl Into<String>) -> Self {
        Self::Computation(msg.into())
    }
}
