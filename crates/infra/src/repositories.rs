use std::sync::Arc;

use clinistock_auth::User;
use clinistock_billing::{Bill, Patient, Service};
use clinistock_catalog::Item;
use clinistock_inventory::{InternalOrder, StockBatch, StockTakeSession};
use clinistock_procurement::{Lpo, ProcurementSession};
use clinistock_vendors::Vendor;

use crate::audit::AuditEntry;
use crate::settings::ClinicSettings;
use crate::store::Collection;
use crate::store::in_memory::InMemoryCollection;

/// One handle per collection, shared across handlers.
///
/// Handlers depend on this bundle rather than on a backend type, so the same
/// routing code runs against the in-memory store in tests and Postgres in
/// production.
#[derive(Clone)]
pub struct Repositories {
    pub items: Arc<dyn Collection<Item>>,
    pub stocks: Arc<dyn Collection<StockBatch>>,
    pub vendors: Arc<dyn Collection<Vendor>>,
    pub lpos: Arc<dyn Collection<Lpo>>,
    pub procurement_sessions: Arc<dyn Collection<ProcurementSession>>,
    pub internal_orders: Arc<dyn Collection<InternalOrder>>,
    pub stock_takes: Arc<dyn Collection<StockTakeSession>>,
    pub bills: Arc<dyn Collection<Bill>>,
    pub patients: Arc<dyn Collection<Patient>>,
    pub services: Arc<dyn Collection<Service>>,
    pub users: Arc<dyn Collection<User>>,
    pub logs: Arc<dyn Collection<AuditEntry>>,
    pub settings: Arc<dyn Collection<ClinicSettings>>,
}

impl Repositories {
    /// Fresh, empty in-memory store.
    pub fn in_memory() -> Self {
        Self {
            items: Arc::new(InMemoryCollection::new()),
            stocks: Arc::new(InMemoryCollection::new()),
            vendors: Arc::new(InMemoryCollection::new()),
            lpos: Arc::new(InMemoryCollection::new()),
            procurement_sessions: Arc::new(InMemoryCollection::new()),
            internal_orders: Arc::new(InMemoryCollection::new()),
            stock_takes: Arc::new(InMemoryCollection::new()),
            bills: Arc::new(InMemoryCollection::new()),
            patients: Arc::new(InMemoryCollection::new()),
            services: Arc::new(InMemoryCollection::new()),
            users: Arc::new(InMemoryCollection::new()),
            logs: Arc::new(InMemoryCollection::new()),
            settings: Arc::new(InMemoryCollection::new()),
        }
    }

    /// Collections backed by the shared Postgres pool.
    ///
    /// Call [`crate::store::postgres::ensure_schema`] once before serving.
    #[cfg(feature = "postgres")]
    pub fn postgres(pool: sqlx::PgPool) -> Self {
        use crate::store::postgres::PostgresCollection;

        Self {
            items: Arc::new(PostgresCollection::new(pool.clone())),
            stocks: Arc::new(PostgresCollection::new(pool.clone())),
            vendors: Arc::new(PostgresCollection::new(pool.clone())),
            lpos: Arc::new(PostgresCollection::new(pool.clone())),
            procurement_sessions: Arc::new(PostgresCollection::new(pool.clone())),
            internal_orders: Arc::new(PostgresCollection::new(pool.clone())),
            stock_takes: Arc::new(PostgresCollection::new(pool.clone())),
            bills: Arc::new(PostgresCollection::new(pool.clone())),
            patients: Arc::new(PostgresCollection::new(pool.clone())),
            services: Arc::new(PostgresCollection::new(pool.clone())),
            users: Arc::new(PostgresCollection::new(pool.clone())),
            logs: Arc::new(PostgresCollection::new(pool.clone())),
            settings: Arc::new(PostgresCollection::new(pool)),
        }
    }
}
