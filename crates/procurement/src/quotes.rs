//! Stage 2: collecting vendor quotes and finding per-item minimums.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use clinistock_core::{DomainError, DomainResult, ItemId, Money, VendorId};
use clinistock_vendors::Vendor;

use crate::list::ProcurementList;

/// User-entered quotes, keyed by item then vendor.
///
/// Only valid price signals are storable: a quote must be strictly positive
/// and the vendor must supply the item. An item with no entries contributes
/// nothing to the next stage. Positivity also holds for deserialized
/// matrices, so a saved session cannot reintroduce a zero price.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawQuoteMatrix")]
pub struct QuoteMatrix {
    quotes: BTreeMap<ItemId, BTreeMap<VendorId, Money>>,
}

/// Wire shape of [`QuoteMatrix`], validated on conversion.
#[derive(Deserialize)]
struct RawQuoteMatrix {
    quotes: BTreeMap<ItemId, BTreeMap<VendorId, Money>>,
}

impl TryFrom<RawQuoteMatrix> for QuoteMatrix {
    type Error = DomainError;

    fn try_from(raw: RawQuoteMatrix) -> DomainResult<Self> {
        for by_vendor in raw.quotes.values() {
            if by_vendor.values().any(|price| *price == 0) {
                return Err(DomainError::validation(
                    "a quote must be strictly positive",
                ));
            }
        }
        Ok(Self { quotes: raw.quotes })
    }
}

impl QuoteMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a vendor's unit-price quote for an item.
    ///
    /// Re-entering a pair overwrites the previous quote.
    pub fn set_quote(
        &mut self,
        vendor: &Vendor,
        item_id: ItemId,
        unit_price: Money,
    ) -> DomainResult<()> {
        if unit_price == 0 {
            return Err(DomainError::validation(
                "a quote must be strictly positive",
            ));
        }
        if !vendor.supplies(item_id) {
            return Err(DomainError::invariant(
                "vendor is not recorded as supplying this item",
            ));
        }
        self.quotes
            .entry(item_id)
            .or_default()
            .insert(vendor.id_typed(), unit_price);
        Ok(())
    }

    /// Drop a previously entered quote, if any.
    pub fn clear_quote(&mut self, vendor_id: VendorId, item_id: ItemId) {
        if let Some(by_vendor) = self.quotes.get_mut(&item_id) {
            by_vendor.remove(&vendor_id);
            if by_vendor.is_empty() {
                self.quotes.remove(&item_id);
            }
        }
    }

    /// All quotes entered for an item.
    pub fn quotes_for(&self, item_id: ItemId) -> impl Iterator<Item = (VendorId, Money)> + '_ {
        self.quotes
            .get(&item_id)
            .into_iter()
            .flat_map(|by_vendor| by_vendor.iter().map(|(v, p)| (*v, *p)))
    }

    /// Minimum valid quote for an item (the highlight value), `None` when no
    /// quote was entered.
    pub fn min_quote(&self, item_id: ItemId) -> Option<Money> {
        self.quotes_for(item_id).map(|(_, price)| price).min()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }
}

/// Vendors supplying at least one listed item.
///
/// The comparator stage only shows (and accepts quotes from) these.
pub fn relevant_vendors<'a>(list: &ProcurementList, vendors: &'a [Vendor]) -> Vec<&'a Vendor> {
    vendors
        .iter()
        .filter(|v| list.members().iter().any(|item| v.supplies(*item)))
        .collect()
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::collections::BTreeSet;

    use clinistock_vendors::{ContactInfo, VendorDraft};

    use super::*;

    pub fn vendor(name: &str, supplies: &[ItemId]) -> Vendor {
        Vendor::new(
            VendorId::new(),
            VendorDraft {
                name: name.to_string(),
                contact: ContactInfo::default(),
                supplied_items: supplies.iter().copied().collect::<BTreeSet<_>>(),
            },
        )
        .unwrap()
    }
}
