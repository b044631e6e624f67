use serde::{Deserialize, Serialize};

use clinistock_core::{DomainError, DomainResult, Entity, PatientId};

/// Editable patient fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientDraft {
    pub name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// A patient billable for services and dispensed items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    id: PatientId,
    name: String,
    phone: Option<String>,
    address: Option<String>,
}

impl Patient {
    pub fn new(id: PatientId, draft: PatientDraft) -> DomainResult<Self> {
        if draft.name.trim().is_empty() {
            return Err(DomainError::validation("patient name cannot be empty"));
        }
        Ok(Self {
            id,
            name: draft.name,
            phone: draft.phone,
            address: draft.address,
        })
    }

    pub fn update(&mut self, draft: PatientDraft) -> DomainResult<()> {
        let updated = Patient::new(self.id, draft)?;
        *self = updated;
        Ok(())
    }

    pub fn id_typed(&self) -> PatientId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Entity for Patient {
    type Id = PatientId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patient_name_must_not_be_empty() {
        let err = Patient::new(
            PatientId::new(),
            PatientDraft { name: String::new(), phone: None, address: None },
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }
}
