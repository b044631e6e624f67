use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use clinistock_core::{
    DomainError, DomainResult, Entity, ItemId, Location, Quantity, StockBatchId,
};

use crate::stock_take::StockAdjustment;

/// One batch of one item at one location.
///
/// Several batch records may reference the same item (different batches,
/// different locations).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockBatch {
    id: StockBatchId,
    item_id: ItemId,
    location: Location,
    quantity: Quantity,
    expiry: Option<NaiveDate>,
    batch_no: Option<String>,
}

impl StockBatch {
    pub fn new(
        id: StockBatchId,
        item_id: ItemId,
        location: Location,
        quantity: Quantity,
        expiry: Option<NaiveDate>,
        batch_no: Option<String>,
    ) -> DomainResult<Self> {
        if quantity < 0 {
            return Err(DomainError::validation("batch quantity cannot be negative"));
        }
        Ok(Self {
            id,
            item_id,
            location,
            quantity,
            expiry,
            batch_no,
        })
    }

    pub fn id_typed(&self) -> StockBatchId {
        self.id
    }

    pub fn item_id(&self) -> ItemId {
        self.item_id
    }

    pub fn location(&self) -> Location {
        self.location
    }

    pub fn quantity(&self) -> Quantity {
        self.quantity
    }

    pub fn expiry(&self) -> Option<NaiveDate> {
        self.expiry
    }

    pub fn batch_no(&self) -> Option<&str> {
        self.batch_no.as_deref()
    }

    fn draw(&mut self, quantity: Quantity) -> DomainResult<()> {
        if quantity <= 0 {
            return Err(DomainError::validation("draw quantity must be positive"));
        }
        if quantity > self.quantity {
            return Err(DomainError::invariant("draw exceeds batch quantity"));
        }
        self.quantity -= quantity;
        Ok(())
    }

    fn add(&mut self, quantity: Quantity) -> DomainResult<()> {
        if quantity <= 0 {
            return Err(DomainError::validation("added quantity must be positive"));
        }
        self.quantity += quantity;
        Ok(())
    }
}

impl Entity for StockBatch {
    type Id = StockBatchId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Summed on-hand quantity per item at a location.
pub fn on_hand(batches: &[StockBatch], location: Location) -> BTreeMap<ItemId, Quantity> {
    let mut totals: BTreeMap<ItemId, Quantity> = BTreeMap::new();
    for batch in batches.iter().filter(|b| b.location == location) {
        *totals.entry(batch.item_id).or_default() += batch.quantity;
    }
    totals
}

/// A planned deduction from one batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchDraw {
    pub batch_id: StockBatchId,
    pub quantity: Quantity,
}

/// Plan a draw-down of `quantity` units of `item_id` at `location`.
///
/// Batches are consumed earliest-expiry-first; batches without expiry last.
/// Fails before touching anything when total on hand is short, so the caller
/// never applies a partial dispense.
pub fn plan_draw(
    batches: &[StockBatch],
    item_id: ItemId,
    location: Location,
    quantity: Quantity,
) -> DomainResult<Vec<BatchDraw>> {
    if quantity <= 0 {
        return Err(DomainError::validation("quantity must be positive"));
    }

    let mut candidates: Vec<&StockBatch> = batches
        .iter()
        .filter(|b| b.item_id == item_id && b.location == location && b.quantity > 0)
        .collect();
    // `None` expiries sort after every concrete date.
    candidates.sort_by_key(|b| (b.expiry.is_none(), b.expiry, b.id));

    let available: Quantity = candidates.iter().map(|b| b.quantity).sum();
    if available < quantity {
        return Err(DomainError::invariant(format!(
            "insufficient stock: requested {quantity}, on hand {available}"
        )));
    }

    let mut remaining = quantity;
    let mut draws = Vec::new();
    for batch in candidates {
        if remaining == 0 {
            break;
        }
        let take = remaining.min(batch.quantity);
        draws.push(BatchDraw {
            batch_id: batch.id,
            quantity: take,
        });
        remaining -= take;
    }
    Ok(draws)
}

/// Apply planned draws to a batch set.
///
/// The plan must come from `plan_draw` over the same batches; an unknown
/// batch id or an over-draw is an invariant error and leaves the input
/// untouched (the caller only persists on `Ok`).
pub fn apply_draws(batches: &mut [StockBatch], draws: &[BatchDraw]) -> DomainResult<()> {
    // Validate the whole plan before mutating anything.
    for draw in draws {
        let batch = batches
            .iter()
            .find(|b| b.id == draw.batch_id)
            .ok_or_else(|| DomainError::invariant("draw references unknown batch"))?;
        if draw.quantity > batch.quantity {
            return Err(DomainError::invariant("draw exceeds batch quantity"));
        }
    }
    for draw in draws {
        let batch = batches
            .iter_mut()
            .find(|b| b.id == draw.batch_id)
            .expect("validated above");
        batch.draw(draw.quantity)?;
    }
    Ok(())
}

/// Apply a stock-take correction to a batch set.
///
/// Positive variance lands in a fresh correction batch (no expiry); negative
/// variance draws down existing batches expiry-first. Returns any batch
/// created so the caller can persist it alongside the mutated ones.
pub fn apply_adjustment(
    batches: &mut Vec<StockBatch>,
    adjustment: &StockAdjustment,
) -> DomainResult<()> {
    if adjustment.delta == 0 {
        return Ok(());
    }
    if adjustment.delta > 0 {
        if let Some(batch) = batches
            .iter_mut()
            .find(|b| {
                b.item_id == adjustment.item_id
                    && b.location == adjustment.location
                    && b.expiry.is_none()
            })
        {
            return batch.add(adjustment.delta);
        }
        let batch = StockBatch::new(
            StockBatchId::new(),
            adjustment.item_id,
            adjustment.location,
            adjustment.delta,
            None,
            Some("STOCK-TAKE".to_string()),
        )?;
        batches.push(batch);
        return Ok(());
    }

    let draws = plan_draw(
        batches,
        adjustment.item_id,
        adjustment.location,
        -adjustment.delta,
    )?;
    apply_draws(batches, &draws)
}



#[cfg(test)]
mod properties {
    use proptest::prelude::*;

    use super::test_support::batch;
    use super::*;

    proptest! {
        #[test]
        fn draws_conserve_stock_exactly(
            quantities in proptest::collection::vec(0i64..200, 1..6),
            requested in 1i64..500,
        ) {
            let item = ItemId::new();
            let mut batches: Vec<StockBatch> = quantities
                .iter()
                .map(|q| batch(item, Location::Dispensary, *q, None))
                .collect();
            let total: Quantity = quantities.iter().sum();

            match plan_draw(&batches, item, Location::Dispensary, requested) {
                Ok(draws) => {
                    prop_assert!(requested <= total);
                    let drawn: Quantity = draws.iter().map(|d| d.quantity).sum();
                    prop_assert_eq!(drawn, requested);
                    apply_draws(&mut batches, &draws).unwrap();
                    let left: Quantity = batches.iter().map(|b| b.quantity()).sum();
                    prop_assert_eq!(left, total - requested);
                }
                Err(_) => prop_assert!(requested > total),
            }
        }
    }
}
