//! Collection bindings for every persisted type.

use uuid::Uuid;

use clinistock_auth::User;
use clinistock_billing::{Bill, Patient, Service};
use clinistock_catalog::Item;
use clinistock_inventory::{InternalOrder, StockBatch, StockTakeSession};
use clinistock_procurement::{Lpo, ProcurementSession};
use clinistock_vendors::Vendor;

use crate::audit::AuditEntry;
use crate::settings::{ClinicSettings, SETTINGS_DOC_ID};
use crate::store::Document;

/// Every collection name, in schema-creation order.
pub const COLLECTIONS: &[&str] = &[
    "items",
    "stocks",
    "vendors",
    "local_purchase_orders",
    "procurement_sessions",
    "internal_orders",
    "stock_take_sessions",
    "billings",
    "patients",
    "services",
    "users",
    "logs",
    "settings",
];

impl Document for Item {
    const COLLECTION: &'static str = "items";

    fn doc_id(&self) -> Uuid {
        self.id_typed().into()
    }
}

impl Document for StockBatch {
    const COLLECTION: &'static str = "stocks";

    fn doc_id(&self) -> Uuid {
        self.id_typed().into()
    }
}

impl Document for Vendor {
    const COLLECTION: &'static str = "vendors";

    fn doc_id(&self) -> Uuid {
        self.id_typed().into()
    }
}

impl Document for Lpo {
    const COLLECTION: &'static str = "local_purchase_orders";

    fn doc_id(&self) -> Uuid {
        self.id_typed().into()
    }
}

impl Document for ProcurementSession {
    const COLLECTION: &'static str = "procurement_sessions";

    fn doc_id(&self) -> Uuid {
        self.id_typed().into()
    }
}

impl Document for InternalOrder {
    const COLLECTION: &'static str = "internal_orders";

    fn doc_id(&self) -> Uuid {
        self.id_typed().into()
    }
}

impl Document for StockTakeSession {
    const COLLECTION: &'static str = "stock_take_sessions";

    fn doc_id(&self) -> Uuid {
        self.id_typed().into()
    }
}

impl Document for Bill {
    const COLLECTION: &'static str = "billings";

    fn doc_id(&self) -> Uuid {
        self.id_typed().into()
    }
}

impl Document for Patient {
    const COLLECTION: &'static str = "patients";

    fn doc_id(&self) -> Uuid {
        self.id_typed().into()
    }
}

impl Document for Service {
    const COLLECTION: &'static str = "services";

    fn doc_id(&self) -> Uuid {
        self.id_typed().into()
    }
}

impl Document for User {
    const COLLECTION: &'static str = "users";

    fn doc_id(&self) -> Uuid {
        self.id_typed().into()
    }
}

impl Document for AuditEntry {
    const COLLECTION: &'static str = "logs";

    fn doc_id(&self) -> Uuid {
        self.id()
    }
}

impl Document for ClinicSettings {
    const COLLECTION: &'static str = "settings";

    // Singleton document.
    fn doc_id(&self) -> Uuid {
        SETTINGS_DOC_ID
    }
}
