//! Stage 1: building the list of items to purchase.

use serde::{Deserialize, Serialize};

use clinistock_catalog::Item;
use clinistock_core::{ItemId, Location};
use clinistock_inventory::{StockBatch, on_hand};

/// Ordered set of items selected for purchasing.
///
/// Insertion order is preserved (it drives LPO line order); membership is
/// unique.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcurementList {
    members: Vec<ItemId>,
}

impl ProcurementList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, item_id: ItemId) -> bool {
        self.members.contains(&item_id)
    }

    /// Add an item; returns whether the list changed (adding a present
    /// member is a no-op).
    pub fn add(&mut self, item_id: ItemId) -> bool {
        if self.contains(item_id) {
            return false;
        }
        self.members.push(item_id);
        true
    }

    /// Remove an item; returns whether the list changed.
    pub fn remove(&mut self, item_id: ItemId) -> bool {
        let before = self.members.len();
        self.members.retain(|m| *m != item_id);
        self.members.len() != before
    }

    pub fn members(&self) -> &[ItemId] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl FromIterator<ItemId> for ProcurementList {
    fn from_iter<T: IntoIterator<Item = ItemId>>(iter: T) -> Self {
        let mut list = ProcurementList::new();
        for id in iter {
            list.add(id);
        }
        list
    }
}

/// Items whose summed on-hand quantity at `location` sits strictly below
/// their location-specific reorder level, excluding anything already on
/// `current`.
///
/// Pure; empty inputs yield an empty subset. Items with no stock record at
/// all count as zero on hand.
pub fn low_stock_items(
    catalog: &[Item],
    batches: &[StockBatch],
    location: Location,
    current: &ProcurementList,
) -> Vec<ItemId> {
    let totals = on_hand(batches, location);
    catalog
        .iter()
        .filter(|item| !current.contains(item.id_typed()))
        .filter(|item| {
            let held = totals.get(&item.id_typed()).copied().unwrap_or(0);
            held < item.reorder_level(location)
        })
        .map(|item| item.id_typed())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clinistock_catalog::{Item, ItemDraft};
    use clinistock_core::StockBatchId;

    fn item(name: &str, reorder_bulk: i64) -> Item {
        Item::new(
            ItemId::new(),
            ItemDraft {
                generic_name: name.to_string(),
                brand_name: None,
                strength: None,
                pack_size: None,
                category: "analgesic".to_string(),
                unit: "tablet".to_string(),
                reorder_level_dispensary: 0,
                reorder_level_bulk: reorder_bulk,
                unit_cost: 5,
                selling_price: 10,
            },
        )
        .unwrap()
    }

    fn batch(item_id: ItemId, location: Location, quantity: i64) -> StockBatch {
        StockBatch::new(StockBatchId::new(), item_id, location, quantity, None, None).unwrap()
    }

    #[test]
    fn below_reorder_level_is_listed_at_or_above_is_not() {
        let short = item("Paracetamol", 500);
        let exact = item("Ibuprofen", 500);
        let plenty = item("Amoxicillin", 500);
        let batches = vec![
            batch(short.id_typed(), Location::BulkStore, 200),
            batch(exact.id_typed(), Location::BulkStore, 500),
            batch(plenty.id_typed(), Location::BulkStore, 900),
        ];
        let catalog = vec![short.clone(), exact, plenty];

        let low = low_stock_items(
            &catalog,
            &batches,
            Location::BulkStore,
            &ProcurementList::new(),
        );
        assert_eq!(low, vec![short.id_typed()]);
    }

    #[test]
    fn quantities_are_summed_across_batches_at_the_target_location() {
        let it = item("Paracetamol", 500);
        let batches = vec![
            batch(it.id_typed(), Location::BulkStore, 300),
            batch(it.id_typed(), Location::BulkStore, 250),
            // Dispensary stock must not count toward bulk-store reorder.
            batch(it.id_typed(), Location::Dispensary, 1),
        ];
        let low = low_stock_items(
            &[it.clone()],
            &batches,
            Location::BulkStore,
            &ProcurementList::new(),
        );
        assert!(low.is_empty());

        let low = low_stock_items(
            &[it.clone()],
            &batches[..1],
            Location::BulkStore,
            &ProcurementList::new(),
        );
        assert_eq!(low, vec![it.id_typed()]);
    }

    #[test]
    fn items_already_listed_are_excluded() {
        let it = item("Paracetamol", 500);
        let current: ProcurementList = [it.id_typed()].into_iter().collect();
        let low = low_stock_items(&[it], &[], Location::BulkStore, &current);
        assert!(low.is_empty());
    }

    #[test]
    fn empty_inputs_yield_an_empty_subset() {
        assert!(
            low_stock_items(&[], &[], Location::BulkStore, &ProcurementList::new()).is_empty()
        );
    }

    #[test]
    fn add_then_remove_round_trips_the_member_set() {
        let a = ItemId::new();
        let b = ItemId::new();
        let extra = ItemId::new();
        let mut list: ProcurementList = [a, b].into_iter().collect();
        let before = list.clone();

        assert!(list.add(extra));
        assert!(list.remove(extra));
        assert_eq!(list, before);
    }

    #[test]
    fn adding_a_present_member_is_a_no_op() {
        let a = ItemId::new();
        let mut list = ProcurementList::new();
        assert!(list.add(a));
        assert!(!list.add(a));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn removing_an_absent_member_is_a_no_op() {
        let mut list = ProcurementList::new();
        assert!(!list.remove(ItemId::new()));
    }
}
