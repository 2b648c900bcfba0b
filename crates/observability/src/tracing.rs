//! Tracing/logging initialization.
//!
//! The engine crates emit structured events (tenant, route, totals) through
//! `tracing`; hosts call one of the init functions once at startup to get JSON
//! output with `RUST_LOG`-style filtering.

use tracing_subscriber::EnvFilter;

/// Initialize JSON logging for the process, filtered by `RUST_LOG`.
///
/// Defaults to `info` when no filter is set in the environment. Safe to call
/// multiple times; subsequent calls are no-ops.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    init_with_filter(filter);
}

/// Initialize JSON logging with an explicit filter, ignoring the environment.
///
/// Useful for hosts that configure verbosity from their own settings, e.g.
/// `init_with_filter("mzigo_trade=debug,info".parse().unwrap())`.
pub fn init_with_filter(filter: EnvFilter) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false)
        .try_init();
}
