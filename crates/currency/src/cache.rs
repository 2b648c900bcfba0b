//! TTL-bounded exchange-rate cache.
//!
//! Read-mostly shared state: concurrent reads through the `RwLock` read guard,
//! short exclusive writes on refresh. Entries expire after the configured TTL
//! and are refreshed lazily on the next lookup.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{Duration, Utc};

use mzigo_core::{CurrencyCode, EngineError, EngineResult};

use crate::rate::{CurrencyRateSource, ExchangeRate};

/// Get-or-compute cache of directed currency pairs.
#[derive(Debug)]
pub struct RateCache {
    ttl: Duration,
    inner: RwLock<HashMap<(CurrencyCode, CurrencyCode), ExchangeRate>>,
}

impl RateCache {
    /// Default TTL matches the daily refresh cadence of the rate feeds.
    pub fn new() -> Self {
        Self::with_ttl(Duration::hours(24))
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            ttl,
            inner: RwLock::new(HashMap::new()),
        }
    }

    /// Cached rate if present and fresh, else fetch through `source` and cache.
    ///
    /// `rate(A, A)` is always 1 and never hits the source.
    pub fn get_or_fetch<S: CurrencyRateSource + ?Sized>(
        &self,
        from: &CurrencyCode,
        to: &CurrencyCode,
        source: &S,
    ) -> EngineResult<ExchangeRate> {
        if from == to {
            return Ok(ExchangeRate::identity(from.clone()));
        }

        let key = (from.clone(), to.clone());
        {
            let map = self
                .inner
                .read()
                .map_err(|_| EngineError::computation("rate cache lock poisoned"))?;
            if let Some(entry) = map.get(&key) {
                if !entry.is_expired(self.ttl) {
                    return Ok(entry.clone());
                }
            }
        }

        tracing::debug!(%from, %to, "exchange rate cache miss, refreshing");
        let rate = source.fetch_rate(from, to)?;
        let entry = ExchangeRate {
            from: from.clone(),
            to: to.clone(),
            rate,
            last_updated: Utc::now(),
            source: source.label().to_string(),
        };

        let mut map = self
            .inner
            .write()
            .map_err(|_| EngineError::computation("rate cache lock poisoned"))?;
        map.insert(key, entry.clone());
        Ok(entry)
    }

    /// Drop every cached entry (safe to rebuild at any time).
    pub fn invalidate_all(&self) {
        if let Ok(mut map) = self.inner.write() {
            map.clear();
        }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.inner.read().map(|m| m.len()).unwrap_or(0)
    }
}

impl Default for RateCache {
    fn default() -> Self {
        Self::new()
    }
}
