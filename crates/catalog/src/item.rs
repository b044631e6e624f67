use serde::{Deserialize, Serialize};

use clinistock_core::{DomainError, DomainResult, Entity, ItemId, Location, Money, Quantity};

/// Editable fields of a catalog item, used both at creation and on edit.
///
/// The identifier is deliberately absent: it is immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDraft {
    pub generic_name: String,
    pub brand_name: Option<String>,
    /// Strength/concentration descriptor, e.g. "500mg".
    pub strength: Option<String>,
    /// Package-size descriptor, e.g. "100 tablets".
    pub pack_size: Option<String>,
    pub category: String,
    /// Unit of measure, e.g. "tablet".
    pub unit: String,
    pub reorder_level_dispensary: Quantity,
    pub reorder_level_bulk: Quantity,
    /// Purchase cost per unit, smallest currency unit.
    pub unit_cost: Money,
    /// Selling price per unit, smallest currency unit.
    pub selling_price: Money,
}

/// Catalog entry (item master).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    id: ItemId,
    generic_name: String,
    brand_name: Option<String>,
    strength: Option<String>,
    pack_size: Option<String>,
    category: String,
    unit: String,
    reorder_level_dispensary: Quantity,
    reorder_level_bulk: Quantity,
    unit_cost: Money,
    selling_price: Money,
}

impl Item {
    pub fn new(id: ItemId, draft: ItemDraft) -> DomainResult<Self> {
        validate_draft(&draft)?;
        Ok(Self {
            id,
            generic_name: draft.generic_name,
            brand_name: draft.brand_name,
            strength: draft.strength,
            pack_size: draft.pack_size,
            category: draft.category,
            unit: draft.unit,
            reorder_level_dispensary: draft.reorder_level_dispensary,
            reorder_level_bulk: draft.reorder_level_bulk,
            unit_cost: draft.unit_cost,
            selling_price: draft.selling_price,
        })
    }

    /// Replace every editable field; the identifier stays.
    pub fn update(&mut self, draft: ItemDraft) -> DomainResult<()> {
        let updated = Item::new(self.id, draft)?;
        *self = updated;
        Ok(())
    }

    pub fn id_typed(&self) -> ItemId {
        self.id
    }

    pub fn generic_name(&self) -> &str {
        &self.generic_name
    }

    pub fn brand_name(&self) -> Option<&str> {
        self.brand_name.as_deref()
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    pub fn unit_cost(&self) -> Money {
        self.unit_cost
    }

    pub fn selling_price(&self) -> Money {
        self.selling_price
    }

    /// Reorder threshold for the given stock-holding location.
    pub fn reorder_level(&self, location: Location) -> Quantity {
        match location {
            Location::BulkStore => self.reorder_level_bulk,
            Location::Dispensary => self.reorder_level_dispensary,
        }
    }

    /// Human-readable name for tables and LPO lines,
    /// e.g. "Paracetamol 500mg (Panadol)".
    pub fn display_name(&self) -> String {
        let mut name = self.generic_name.clone();
        if let Some(strength) = &self.strength {
            name.push(' ');
            name.push_str(strength);
        }
        if let Some(brand) = &self.brand_name {
            name.push_str(" (");
            name.push_str(brand);
            name.push(')');
        }
        name
    }
}

impl Entity for Item {
    type Id = ItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

fn validate_draft(draft: &ItemDraft) -> DomainResult<()> {
    if draft.generic_name.trim().is_empty() {
        return Err(DomainError::validation("generic name cannot be empty"));
    }
    if draft.unit.trim().is_empty() {
        return Err(DomainError::validation("unit of measure cannot be empty"));
    }
    if draft.reorder_level_dispensary < 0 || draft.reorder_level_bulk < 0 {
        return Err(DomainError::validation(
            "reorder levels cannot be negative",
        ));
    }
    Ok(())
}

#[cfg(test)]
pub(crate) fn test_draft(name: &str) -> ItemDraft {
    ItemDraft {
        generic_name: name.to_string(),
        brand_name: None,
        strength: None,
        pack_size: None,
        category: "analgesic".to_string(),
        unit: "tablet".to_string(),
        reorder_level_dispensary: 100,
        reorder_level_bulk: 500,
        unit_cost: 5,
        selling_price: 10,
    }
}


#[cfg(test)]
mod properties {
    use proptest::prelude::*;

    use super::*;

    proptest! {
        #[test]
        fn display_name_always_leads_with_the_generic_name(
            name in "[A-Z][a-z]{2,12}",
            strength in proptest::option::of("[1-9][0-9]{0,2}mg"),
            brand in proptest::option::of("[A-Z][a-z]{2,8}"),
        ) {
            let draft = ItemDraft {
                generic_name: name.clone(),
                strength: strength.clone(),
                brand_name: brand.clone(),
                ..test_draft("x")
            };
            let item = Item::new(ItemId::new(), draft).unwrap();
            let display = item.display_name();
            prop_assert!(display.starts_with(&name));
            if let Some(brand) = brand {
                let suffix = format!("({brand})");
                prop_assert!(display.ends_with(&suffix));
            }
        }
    }
}
