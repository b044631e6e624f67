use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use clinistock_core::{DomainError, DomainResult, Entity, ItemId, VendorId};

/// Contact information for a vendor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// Editable vendor fields (creation and edit share this shape).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorDraft {
    pub name: String,
    #[serde(default)]
    pub contact: ContactInfo,
    /// Catalog items this vendor can supply. Gates quote entry and LPO
    /// assignment.
    #[serde(default)]
    pub supplied_items: BTreeSet<ItemId>,
}

/// A supplier of catalog items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vendor {
    id: VendorId,
    name: String,
    contact: ContactInfo,
    supplied_items: BTreeSet<ItemId>,
}

impl Vendor {
    pub fn new(id: VendorId, draft: VendorDraft) -> DomainResult<Self> {
        if draft.name.trim().is_empty() {
            return Err(DomainError::validation("vendor name cannot be empty"));
        }
        Ok(Self {
            id,
            name: draft.name,
            contact: draft.contact,
            supplied_items: draft.supplied_items,
        })
    }

    pub fn update(&mut self, draft: VendorDraft) -> DomainResult<()> {
        let updated = Vendor::new(self.id, draft)?;
        *self = updated;
        Ok(())
    }

    pub fn id_typed(&self) -> VendorId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn contact(&self) -> &ContactInfo {
        &self.contact
    }

    pub fn supplied_items(&self) -> &BTreeSet<ItemId> {
        &self.supplied_items
    }

    /// Whether this vendor is recorded as supplying the given item.
    pub fn supplies(&self, item_id: ItemId) -> bool {
        self.supplied_items.contains(&item_id)
    }
}

impl Entity for Vendor {
    type Id = VendorId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
