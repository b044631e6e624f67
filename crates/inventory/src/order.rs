//! Internal transfer orders between stock-holding locations.
//!
//! The dispensary requests stock from the bulk store; fulfilment moves
//! quantities as a batch-preserving transfer (same expiry and batch number on
//! the receiving side).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use clinistock_core::{
    DomainError, DomainResult, Entity, InternalOrderId, ItemId, Location, Quantity, StockBatchId,
};

use crate::stock::{StockBatch, apply_draws, plan_draw};

/// One requested item + quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub item_id: ItemId,
    pub quantity: Quantity,
}

/// Internal order lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InternalOrderStatus {
    Requested,
    Fulfilled,
    Rejected,
}

/// A request to move stock from one location to another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InternalOrder {
    id: InternalOrderId,
    from: Location,
    to: Location,
    lines: Vec<OrderLine>,
    status: InternalOrderStatus,
    requested_at: DateTime<Utc>,
}

impl InternalOrder {
    pub fn new(
        id: InternalOrderId,
        from: Location,
        to: Location,
        lines: Vec<OrderLine>,
        requested_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        if from == to {
            return Err(DomainError::validation(
                "transfer source and destination must differ",
            ));
        }
        if lines.is_empty() {
            return Err(DomainError::validation("order needs at least one line"));
        }
        if lines.iter().any(|l| l.quantity <= 0) {
            return Err(DomainError::validation("line quantities must be positive"));
        }
        Ok(Self {
            id,
            from,
            to,
            lines,
            status: InternalOrderStatus::Requested,
            requested_at,
        })
    }

    pub fn id_typed(&self) -> InternalOrderId {
        self.id
    }

    pub fn from(&self) -> Location {
        self.from
    }

    pub fn to(&self) -> Location {
        self.to
    }

    pub fn lines(&self) -> &[OrderLine] {
        &self.lines
    }

    pub fn status(&self) -> InternalOrderStatus {
        self.status
    }

    /// Fulfil against the source location's batches.
    ///
    /// Validates every line before moving anything; on any shortfall the
    /// order stays `Requested` and the batches are untouched.
    pub fn fulfil(&mut self, batches: &mut Vec<StockBatch>) -> DomainResult<()> {
        if self.status != InternalOrderStatus::Requested {
            return Err(DomainError::invariant(
                "only requested orders can be fulfilled",
            ));
        }

        // Plan all lines first so a later shortfall cannot leave a partial
        // transfer behind.
        let mut plans = Vec::with_capacity(self.lines.len());
        let mut working = batches.clone();
        for line in &self.lines {
            let draws = plan_draw(&working, line.item_id, self.from, line.quantity)?;
            apply_draws(&mut working, &draws)?;
            plans.push((line.item_id, draws));
        }

        for (item_id, draws) in &plans {
            for draw in draws {
                let source = batches
                    .iter()
                    .find(|b| b.id_typed() == draw.batch_id)
                    .ok_or_else(|| DomainError::invariant("draw references unknown batch"))?;
                let received = StockBatch::new(
                    StockBatchId::new(),
                    *item_id,
                    self.to,
                    draw.quantity,
                    source.expiry(),
                    source.batch_no().map(str::to_string),
                )?;
                batches.push(received);
            }
            apply_draws(batches, draws)?;
        }

        self.status = InternalOrderStatus::Fulfilled;
        Ok(())
    }

    pub fn reject(&mut self) -> DomainResult<()> {
        if self.status != InternalOrderStatus::Requested {
            return Err(DomainError::invariant(
                "only requested orders can be rejected",
            ));
        }
        self.status = InternalOrderStatus::Rejected;
        Ok(())
    }
}

impl Entity for InternalOrder {
    type Id = InternalOrderId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stock::on_hand;
    use crate::stock::test_support::{batch, date};

    fn order(item: ItemId, quantity: Quantity) -> InternalOrder {
        InternalOrder::new(
            InternalOrderId::new(),
            Location::BulkStore,
            Location::Dispensary,
            vec![OrderLine { item_id: item, quantity }],
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn fulfil_moves_stock_and_preserves_expiry() {
        let item = ItemId::new();
        let expiry = date(2027, 3, 1);
        let mut batches = vec![batch(item, Location::BulkStore, 100, Some(expiry))];
        let mut ord = order(item, 60);

        ord.fulfil(&mut batches).unwrap();

        assert_eq!(ord.status(), InternalOrderStatus::Fulfilled);
        assert_eq!(on_hand(&batches, Location::BulkStore).get(&item), Some(&40));
        assert_eq!(on_hand(&batches, Location::Dispensary).get(&item), Some(&60));
        let received = batches
            .iter()
            .find(|b| b.location() == Location::Dispensary)
            .unwrap();
        assert_eq!(received.expiry(), Some(expiry));
    }

    #[test]
    fn fulfil_aborts_atomically_on_shortfall() {
        let item_a = ItemId::new();
        let item_b = ItemId::new();
        let mut batches = vec![
            batch(item_a, Location::BulkStore, 100, None),
            batch(item_b, Location::BulkStore, 5, None),
        ];
        let mut ord = InternalOrder::new(
            InternalOrderId::new(),
            Location::BulkStore,
            Location::Dispensary,
            vec![
                OrderLine { item_id: item_a, quantity: 50 },
                OrderLine { item_id: item_b, quantity: 10 },
            ],
            Utc::now(),
        )
        .unwrap();

        let err = ord.fulfil(&mut batches).unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));
        assert_eq!(ord.status(), InternalOrderStatus::Requested);
        assert_eq!(on_hand(&batches, Location::BulkStore).get(&item_a), Some(&100));
        assert!(on_hand(&batches, Location::Dispensary).is_empty());
    }

    #[test]
    fn fulfilled_order_cannot_be_rejected() {
        let item = ItemId::new();
        let mut batches = vec![batch(item, Location::BulkStore, 100, None)];
        let mut ord = order(item, 10);
        ord.fulfil(&mut batches).unwrap();
        assert!(ord.reject().is_err());
    }

    #[test]
    fn source_must_differ_from_destination() {
        let err = InternalOrder::new(
            InternalOrderId::new(),
            Location::BulkStore,
            Location::BulkStore,
            vec![OrderLine { item_id: ItemId::new(), quantity: 1 }],
            Utc::now(),
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }
}
