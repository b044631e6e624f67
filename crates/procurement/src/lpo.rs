//! Stage 3: grouping items under their winning vendor into draft LPOs, and
//! the lifecycle of a persisted local purchase order.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use clinistock_catalog::Item;
use clinistock_core::{
    DomainError, DomainResult, Entity, ItemId, LpoId, Money, Quantity, VendorId,
};
use clinistock_vendors::Vendor;

use crate::list::ProcurementList;
use crate::quotes::QuoteMatrix;

/// One line of a (draft) purchase order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LpoLine {
    pub item_id: ItemId,
    /// Display name captured at finalization time.
    pub description: String,
    pub quantity: Quantity,
    /// Winning unit price, smallest currency unit.
    pub unit_price: Money,
    /// `quantity × unit_price`.
    pub total: Money,
}

/// A per-vendor grouping produced by the finalizer; not yet persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftLpo {
    pub vendor_id: VendorId,
    pub vendor_name: String,
    pub lines: Vec<LpoLine>,
    pub grand_total: Money,
}

/// Group listed items by their winning (lowest-quote) vendor.
///
/// - Ties on price break by vendor name ascending, then vendor id, so the
///   outcome is independent of input ordering.
/// - Items with no quote are silently excluded; with an all-empty matrix the
///   result is zero drafts.
/// - Quantities default to 1 for items absent from `quantities`.
/// - Line and grand totals use checked arithmetic; draft order is by vendor
///   name, line order follows the procurement list.
pub fn finalize(
    list: &ProcurementList,
    items: &[Item],
    quantities: &BTreeMap<ItemId, Quantity>,
    vendors: &[Vendor],
    matrix: &QuoteMatrix,
) -> DomainResult<Vec<DraftLpo>> {
    let by_id: BTreeMap<VendorId, &Vendor> =
        vendors.iter().map(|v| (v.id_typed(), v)).collect();

    let mut grouped: BTreeMap<VendorId, Vec<LpoLine>> = BTreeMap::new();

    for item_id in list.members() {
        let Some(winner) = winning_quote(*item_id, matrix, &by_id)? else {
            continue;
        };
        let (vendor_id, unit_price) = winner;

        let item = items
            .iter()
            .find(|i| i.id_typed() == *item_id)
            .ok_or_else(|| {
                DomainError::invariant("procurement list references an unknown item")
            })?;

        let quantity = quantities.get(item_id).copied().unwrap_or(1);
        if quantity <= 0 {
            return Err(DomainError::validation("line quantity must be positive"));
        }

        let total = line_total(quantity, unit_price)?;
        grouped.entry(vendor_id).or_default().push(LpoLine {
            item_id: *item_id,
            description: item.display_name(),
            quantity,
            unit_price,
            total,
        });
    }

    let mut drafts = Vec::with_capacity(grouped.len());
    for (vendor_id, lines) in grouped {
        let vendor = by_id
            .get(&vendor_id)
            .ok_or_else(|| DomainError::invariant("quote references an unknown vendor"))?;
        let mut grand_total: Money = 0;
        for line in &lines {
            grand_total = grand_total
                .checked_add(line.total)
                .ok_or_else(|| DomainError::invariant("purchase order amount overflow"))?;
        }
        drafts.push(DraftLpo {
            vendor_id,
            vendor_name: vendor.name().to_string(),
            lines,
            grand_total,
        });
    }

    drafts.sort_by(|a, b| {
        a.vendor_name
            .cmp(&b.vendor_name)
            .then(a.vendor_id.cmp(&b.vendor_id))
    });
    Ok(drafts)
}

/// The lowest valid quote for an item, with deterministic tie-breaking.
fn winning_quote(
    item_id: ItemId,
    matrix: &QuoteMatrix,
    vendors: &BTreeMap<VendorId, &Vendor>,
) -> DomainResult<Option<(VendorId, Money)>> {
    let mut best: Option<(Money, &str, VendorId)> = None;
    for (vendor_id, price) in matrix.quotes_for(item_id) {
        let vendor = vendors
            .get(&vendor_id)
            .ok_or_else(|| DomainError::invariant("quote references an unknown vendor"))?;
        if !vendor.supplies(item_id) {
            return Err(DomainError::invariant(
                "vendor is not recorded as supplying this item",
            ));
        }
        let candidate = (price, vendor.name(), vendor_id);
        best = match best {
            None => Some(candidate),
            Some(current) if candidate < current => Some(candidate),
            Some(current) => Some(current),
        };
    }
    Ok(best.map(|(price, _, vendor_id)| (vendor_id, price)))
}

fn line_total(quantity: Quantity, unit_price: Money) -> DomainResult<Money> {
    let quantity = u64::try_from(quantity)
        .map_err(|_| DomainError::validation("line quantity must be positive"))?;
    quantity
        .checked_mul(unit_price)
        .ok_or_else(|| DomainError::invariant("purchase order line amount overflow"))
}

/// Persisted LPO lifecycle.
///
/// All transitions are explicit user actions; there are no automatic
/// transitions and no rollback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LpoStatus {
    Draft,
    Sent,
    Completed,
    Rejected,
}

/// A persisted local purchase order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lpo {
    id: LpoId,
    vendor_id: VendorId,
    vendor_name: String,
    lines: Vec<LpoLine>,
    grand_total: Money,
    status: LpoStatus,
    created_at: DateTime<Utc>,
}

impl Lpo {
    pub fn from_draft(id: LpoId, draft: DraftLpo, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            vendor_id: draft.vendor_id,
            vendor_name: draft.vendor_name,
            lines: draft.lines,
            grand_total: draft.grand_total,
            status: LpoStatus::Draft,
            created_at,
        }
    }

    pub fn id_typed(&self) -> LpoId {
        self.id
    }

    pub fn vendor_id(&self) -> VendorId {
        self.vendor_id
    }

    pub fn vendor_name(&self) -> &str {
        &self.vendor_name
    }

    pub fn lines(&self) -> &[LpoLine] {
        &self.lines
    }

    pub fn grand_total(&self) -> Money {
        self.grand_total
    }

    pub fn status(&self) -> LpoStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// `Draft → Sent`.
    pub fn mark_sent(&mut self) -> DomainResult<()> {
        if self.status != LpoStatus::Draft {
            return Err(DomainError::invariant(
                "only draft purchase orders can be marked as sent",
            ));
        }
        self.status = LpoStatus::Sent;
        Ok(())
    }

    /// `Sent → Completed`.
    pub fn mark_completed(&mut self) -> DomainResult<()> {
        if self.status != LpoStatus::Sent {
            return Err(DomainError::invariant(
                "only sent purchase orders can be marked as completed",
            ));
        }
        self.status = LpoStatus::Completed;
        Ok(())
    }

    /// `Draft → Rejected`. Anything past draft is already with the vendor and
    /// cannot be rejected.
    pub fn reject(&mut self) -> DomainResult<()> {
        if self.status != LpoStatus::Draft {
            return Err(DomainError::invariant(
                "only draft purchase orders can be rejected",
            ));
        }
        self.status = LpoStatus::Rejected;
        Ok(())
    }
}

impl Entity for Lpo {
    type Id = LpoId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quotes::test_support::vendor;
    use crate::session::ProcurementSession;
    use clinistock_catalog::ItemDraft;
    use clinistock_core::SessionId;

    fn item(name: &str, strength: Option<&str>) -> Item {
        Item::new(
            ItemId::new(),
            ItemDraft {
                generic_name: name.to_string(),
                brand_name: None,
                strength: strength.map(str::to_string),
                pack_size: None,
                category: "analgesic".to_string(),
                unit: "tablet".to_string(),
                reorder_level_dispensary: 100,
                reorder_level_bulk: 500,
                unit_cost: 5,
                selling_price: 10,
            },
        )
        .unwrap()
    }

    #[test]
    fn lowest_quote_wins_the_item() {
        // PAR500: vendor A quotes 9 cents/unit, vendor B quotes 8.
        let par500 = item("Paracetamol", Some("500mg"));
        let a = vendor("Alpha Pharma", &[par500.id_typed()]);
        let b = vendor("Beta Supplies", &[par500.id_typed()]);
        let mut matrix = QuoteMatrix::new();
        matrix.set_quote(&a, par500.id_typed(), 9).unwrap();
        matrix.set_quote(&b, par500.id_typed(), 8).unwrap();

        let list: ProcurementList = [par500.id_typed()].into_iter().collect();
        let drafts = finalize(
            &list,
            &[par500.clone()],
            &BTreeMap::new(),
            &[a, b.clone()],
            &matrix,
        )
        .unwrap();

        assert_eq!(drafts.len(), 1);
        let draft = &drafts[0];
        assert_eq!(draft.vendor_id, b.id_typed());
        assert_eq!(draft.lines.len(), 1);
        let line = &draft.lines[0];
        assert_eq!(line.item_id, par500.id_typed());
        assert_eq!(line.description, "Paracetamol 500mg");
        assert_eq!(line.quantity, 1);
        assert_eq!(line.unit_price, 8);
        assert_eq!(line.total, 8);
        assert_eq!(draft.grand_total, 8);
    }

    #[test]
    fn a_zero_quote_in_a_saved_session_cannot_reach_the_finalizer() {
        let par500 = item("Paracetamol", Some("500mg"));
        let a = vendor("Alpha Pharma", &[par500.id_typed()]);
        let b = vendor("Beta Supplies", &[par500.id_typed()]);
        let mut session = ProcurementSession::new(SessionId::new(), Utc::now());
        session.list.add(par500.id_typed());
        session.quotes.set_quote(&b, par500.id_typed(), 5).unwrap();

        // A hand-edited save granting vendor A a free quote must not load.
        let mut value = serde_json::to_value(&session).unwrap();
        value["quotes"]["quotes"][par500.id_typed().to_string()][a.id_typed().to_string()] =
            serde_json::json!(0);
        assert!(serde_json::from_value::<ProcurementSession>(value).is_err());

        // The untampered save still prices the item at the real minimum.
        let restored: ProcurementSession =
            serde_json::from_value(serde_json::to_value(&session).unwrap()).unwrap();
        let drafts = finalize(
            &restored.list,
            &[par500.clone()],
            &restored.quantities,
            &[a, b.clone()],
            &restored.quotes,
        )
        .unwrap();
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].vendor_id, b.id_typed());
        assert_eq!(drafts[0].lines[0].unit_price, 5);
    }

    #[test]
    fn items_without_quotes_generate_no_lines_and_no_error() {
        let quoted = item("Paracetamol", None);
        let unquoted = item("Ibuprofen", None);
        let v = vendor("Alpha", &[quoted.id_typed()]);
        let mut matrix = QuoteMatrix::new();
        matrix.set_quote(&v, quoted.id_typed(), 12).unwrap();

        let list: ProcurementList = [quoted.id_typed(), unquoted.id_typed()]
            .into_iter()
            .collect();
        let drafts = finalize(
            &list,
            &[quoted.clone(), unquoted],
            &BTreeMap::new(),
            &[v],
            &matrix,
        )
        .unwrap();

        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].lines.len(), 1);
        assert_eq!(drafts[0].lines[0].item_id, quoted.id_typed());
    }

    #[test]
    fn an_empty_matrix_yields_zero_drafts() {
        let it = item("Paracetamol", None);
        let v = vendor("Alpha", &[it.id_typed()]);
        let list: ProcurementList = [it.id_typed()].into_iter().collect();
        let drafts =
            finalize(&list, &[it], &BTreeMap::new(), &[v], &QuoteMatrix::new()).unwrap();
        assert!(drafts.is_empty());
    }

    #[test]
    fn price_ties_break_by_vendor_name_regardless_of_entry_order() {
        let it = item("Paracetamol", None);
        let zeta = vendor("Zeta Pharma", &[it.id_typed()]);
        let alpha = vendor("Alpha Pharma", &[it.id_typed()]);
        let list: ProcurementList = [it.id_typed()].into_iter().collect();

        for order in [[&zeta, &alpha], [&alpha, &zeta]] {
            let mut matrix = QuoteMatrix::new();
            for v in order {
                matrix.set_quote(v, it.id_typed(), 10).unwrap();
            }
            let drafts = finalize(
                &list,
                std::slice::from_ref(&it),
                &BTreeMap::new(),
                &[zeta.clone(), alpha.clone()],
                &matrix,
            )
            .unwrap();
            assert_eq!(drafts.len(), 1);
            assert_eq!(drafts[0].vendor_id, alpha.id_typed());
        }
    }

    #[test]
    fn explicit_quantities_are_used_and_default_is_one() {
        let a = item("Paracetamol", None);
        let b = item("Ibuprofen", None);
        let v = vendor("Alpha", &[a.id_typed(), b.id_typed()]);
        let mut matrix = QuoteMatrix::new();
        matrix.set_quote(&v, a.id_typed(), 8).unwrap();
        matrix.set_quote(&v, b.id_typed(), 3).unwrap();

        let list: ProcurementList = [a.id_typed(), b.id_typed()].into_iter().collect();
        let quantities = BTreeMap::from([(a.id_typed(), 200)]);
        let drafts = finalize(&list, &[a.clone(), b.clone()], &quantities, &[v], &matrix).unwrap();

        assert_eq!(drafts.len(), 1);
        let lines = &drafts[0].lines;
        assert_eq!(lines[0].quantity, 200);
        assert_eq!(lines[0].total, 1600);
        assert_eq!(lines[1].quantity, 1);
        assert_eq!(lines[1].total, 3);
        assert_eq!(drafts[0].grand_total, 1603);
    }

    #[test]
    fn lifecycle_follows_draft_sent_completed() {
        let d = DraftLpo {
            vendor_id: VendorId::new(),
            vendor_name: "Alpha".to_string(),
            lines: Vec::new(),
            grand_total: 0,
        };
        let mut lpo = Lpo::from_draft(LpoId::new(), d, Utc::now());
        assert_eq!(lpo.status(), LpoStatus::Draft);

        lpo.mark_sent().unwrap();
        assert_eq!(lpo.status(), LpoStatus::Sent);
        assert!(lpo.mark_sent().is_err());
        assert!(lpo.reject().is_err());

        lpo.mark_completed().unwrap();
        assert_eq!(lpo.status(), LpoStatus::Completed);
        assert!(lpo.reject().is_err());
        assert!(lpo.mark_completed().is_err());
    }

    #[test]
    fn a_draft_can_be_rejected() {
        let d = DraftLpo {
            vendor_id: VendorId::new(),
            vendor_name: "Alpha".to_string(),
            lines: Vec::new(),
            grand_total: 0,
        };
        let mut lpo = Lpo::from_draft(LpoId::new(), d, Utc::now());
        lpo.reject().unwrap();
        assert_eq!(lpo.status(), LpoStatus::Rejected);
        assert!(lpo.mark_sent().is_err());
    }
}

#[cfg(test)]
mod properties {
    use proptest::prelude::*;

    use super::*;
    use crate::quotes::test_support::vendor;
    use clinistock_catalog::ItemDraft;

    fn test_item(idx: usize) -> Item {
        Item::new(
            ItemId::new(),
            ItemDraft {
                generic_name: format!("Item {idx}"),
                brand_name: None,
                strength: None,
                pack_size: None,
                category: "general".to_string(),
                unit: "unit".to_string(),
                reorder_level_dispensary: 0,
                reorder_level_bulk: 0,
                unit_cost: 1,
                selling_price: 2,
            },
        )
        .unwrap()
    }

    proptest! {
        /// Every quoted item lands in exactly one draft, priced at its
        /// minimum quote; unquoted items land nowhere; grand totals add up.
        #[test]
        fn finalize_groups_each_quoted_item_exactly_once(
            quotes in proptest::collection::vec(
                (0usize..6, 0usize..4, 1u64..10_000),
                0..40,
            ),
            quantities in proptest::collection::vec(1i64..1_000, 6),
        ) {
            let items: Vec<Item> = (0..6).map(test_item).collect();
            let item_ids: Vec<ItemId> = items.iter().map(|i| i.id_typed()).collect();
            let vendors: Vec<Vendor> = (0..4)
                .map(|v| vendor(&format!("Vendor {v}"), &item_ids))
                .collect();

            let mut matrix = QuoteMatrix::new();
            for (item_idx, vendor_idx, price) in &quotes {
                matrix
                    .set_quote(&vendors[*vendor_idx], item_ids[*item_idx], *price)
                    .unwrap();
            }

            let list: ProcurementList = item_ids.iter().copied().collect();
            let quantity_map: BTreeMap<ItemId, Quantity> = item_ids
                .iter()
                .copied()
                .zip(quantities.iter().copied())
                .collect();

            let drafts = finalize(&list, &items, &quantity_map, &vendors, &matrix).unwrap();

            for (idx, item_id) in item_ids.iter().enumerate() {
                let appearances: Vec<&LpoLine> = drafts
                    .iter()
                    .flat_map(|d| d.lines.iter())
                    .filter(|l| l.item_id == *item_id)
                    .collect();
                match matrix.min_quote(*item_id) {
                    None => prop_assert!(appearances.is_empty()),
                    Some(min) => {
                        prop_assert_eq!(appearances.len(), 1);
                        prop_assert_eq!(appearances[0].unit_price, min);
                        prop_assert_eq!(appearances[0].quantity, quantities[idx]);
                    }
                }
            }

            for draft in &drafts {
                let sum: Money = draft.lines.iter().map(|l| l.total).sum();
                prop_assert_eq!(draft.grand_total, sum);
                for line in &draft.lines {
                    prop_assert_eq!(
                        line.total,
                        (line.quantity as u64) * line.unit_price
                    );
                }
                prop_assert!(!draft.lines.is_empty());
            }
        }
    }
}
