//! Provider seams the orchestrator depends on, with in-memory implementations
//! for local composition and tests.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};

use mzigo_core::{CountryCode, EngineError, EngineResult, ProductId, TenantId, WarehouseId};
use mzigo_trade::ProductCustomsInfo;

/// Per-tenant feature entitlements.
pub trait FeatureGate: Send + Sync {
    fn enabled(&self, tenant: &TenantId, flag: &str) -> bool;
}

impl<G> FeatureGate for Arc<G>
where
    G: FeatureGate + ?Sized,
{
    fn enabled(&self, tenant: &TenantId, flag: &str) -> bool {
        (**self).enabled(tenant, flag)
    }
}

/// In-memory feature gate. Flags are off unless explicitly enabled.
#[derive(Debug, Default)]
pub struct InMemoryFeatureGates {
    enabled: RwLock<HashSet<(TenantId, String)>>,
}

impl InMemoryFeatureGates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enable(&self, tenant: TenantId, flag: impl Into<String>) {
        if let Ok(mut guard) = self.enabled.write() {
            guard.insert((tenant, flag.into()));
        }
    }

    pub fn disable(&self, tenant: &TenantId, flag: &str) {
        if let Ok(mut guard) = self.enabled.write() {
            guard.remove(&(*tenant, flag.to_string()));
        }
    }
}

impl FeatureGate for InMemoryFeatureGates {
    fn enabled(&self, tenant: &TenantId, flag: &str) -> bool {
        self.enabled
            .read()
            .map(|guard| guard.contains(&(*tenant, flag.to_string())))
            .unwrap_or(false)
    }
}

/// A catalogue product with its customs-relevant facts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogProduct {
    pub id: ProductId,
    pub tenant_id: TenantId,
    pub customs: ProductCustomsInfo,
}

/// Tenant-scoped product lookup.
pub trait ProductDirectory: Send + Sync {
    /// Fails with a not-found error when the product does not exist or belongs
    /// to a different tenant.
    fn find_product(&self, tenant: &TenantId, id: &ProductId) -> EngineResult<CatalogProduct>;
}

impl<D> ProductDirectory for Arc<D>
where
    D: ProductDirectory + ?Sized,
{
    fn find_product(&self, tenant: &TenantId, id: &ProductId) -> EngineResult<CatalogProduct> {
        (**self).find_product(tenant, id)
    }
}

#[derive(Debug, Default)]
pub struct InMemoryProducts {
    inner: RwLock<HashMap<(TenantId, ProductId), CatalogProduct>>,
}

impl InMemoryProducts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, product: CatalogProduct) {
        if let Ok(mut guard) = self.inner.write() {
            guard.insert((product.tenant_id, product.id), product);
        }
    }
}

impl ProductDirectory for InMemoryProducts {
    fn find_product(&self, tenant: &TenantId, id: &ProductId) -> EngineResult<CatalogProduct> {
        let guard = self
            .inner
            .read()
            .map_err(|_| EngineError::computation("product store lock poisoned"))?;
        guard
            .get(&(*tenant, *id))
            .cloned()
            .ok_or_else(|| EngineError::not_found(format!("product {id} for tenant {tenant}")))
    }
}

/// A tenant's fulfilment warehouse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warehouse {
    pub id: WarehouseId,
    pub name: String,
    pub country: CountryCode,
    pub supports_international: bool,
    pub active: bool,
}

/// Tenant-scoped warehouse lookup, filtered by origin country.
pub trait WarehouseLocator: Send + Sync {
    fn warehouses_in(&self, tenant: &TenantId, country: &CountryCode)
        -> EngineResult<Vec<Warehouse>>;
}

impl<L> WarehouseLocator for Arc<L>
where
    L: WarehouseLocator + ?Sized,
{
    fn warehouses_in(
        &self,
        tenant: &TenantId,
        country: &CountryCode,
    ) -> EngineResult<Vec<Warehouse>> {
        (**self).warehouses_in(tenant, country)
    }
}

#[derive(Debug, Default)]
pub struct InMemoryWarehouses {
    inner: RwLock<HashMap<TenantId, Vec<Warehouse>>>,
}

impl InMemoryWarehouses {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, tenant: TenantId, warehouse: Warehouse) {
        if let Ok(mut guard) = self.inner.write() {
            guard.entry(tenant).or_default().push(warehouse);
        }
    }
}

impl WarehouseLocator for InMemoryWarehouses {
    fn warehouses_in(
        &self,
        tenant: &TenantId,
        country: &CountryCode,
    ) -> EngineResult<Vec<Warehouse>> {
        let guard = self
            .inner
            .read()
            .map_err(|_| EngineError::computation("warehouse store lock poisoned"))?;
        Ok(guard
            .get(tenant)
            .map(|all| {
                all.iter()
                    .filter(|w| &w.country == country)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}
