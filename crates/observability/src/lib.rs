//! Shared observability setup for engine hosts.

pub mod tracing;

pub use tracing::{init, init_with_filter};
