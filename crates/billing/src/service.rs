use serde::{Deserialize, Serialize};

use clinistock_core::{DomainError, DomainResult, Entity, Money, ServiceId};

/// Editable service fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceDraft {
    pub name: String,
    /// Price per service rendered, smallest currency unit.
    pub price: Money,
}

/// A billable clinical service (consultation, dressing, injection, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    id: ServiceId,
    name: String,
    price: Money,
}

impl Service {
    pub fn new(id: ServiceId, draft: ServiceDraft) -> DomainResult<Self> {
        if draft.name.trim().is_empty() {
            return Err(DomainError::validation("service name cannot be empty"));
        }
        Ok(Self { id, name: draft.name, price: draft.price })
    }

    pub fn update(&mut self, draft: ServiceDraft) -> DomainResult<()> {
        let updated = Service::new(self.id, draft)?;
        *self = updated;
        Ok(())
    }

    pub fn id_typed(&self) -> ServiceId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn price(&self) -> Money {
        self.price
    }
}

impl Entity for Service {
    type Id = ServiceId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
