//! Stock-take sessions: physical counts reconciled against system counts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use clinistock_core::{DomainError, DomainResult, Entity, ItemId, Location, Quantity, StockTakeId};

/// One counted item within a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockTakeLine {
    pub item_id: ItemId,
    /// Recorded quantity at the time the line was captured.
    pub system_count: Quantity,
    /// Physically counted quantity.
    pub physical_count: Quantity,
}

/// A correction to be applied to stock (non-zero variance only).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockAdjustment {
    pub item_id: ItemId,
    pub location: Location,
    /// `physical - system`; positive means the shelf holds more than the
    /// system thought.
    pub delta: Quantity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockTakeStatus {
    Open,
    Completed,
}

/// A physical inventory count at one location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockTakeSession {
    id: StockTakeId,
    location: Location,
    status: StockTakeStatus,
    lines: Vec<StockTakeLine>,
    started_at: DateTime<Utc>,
}

impl StockTakeSession {
    pub fn new(id: StockTakeId, location: Location, started_at: DateTime<Utc>) -> Self {
        Self {
            id,
            location,
            status: StockTakeStatus::Open,
            lines: Vec::new(),
            started_at,
        }
    }

    pub fn id_typed(&self) -> StockTakeId {
        self.id
    }

    pub fn location(&self) -> Location {
        self.location
    }

    pub fn status(&self) -> StockTakeStatus {
        self.status
    }

    pub fn lines(&self) -> &[StockTakeLine] {
        &self.lines
    }

    /// Capture (or recapture) a count for one item.
    pub fn record_line(&mut self, line: StockTakeLine) -> DomainResult<()> {
        if self.status != StockTakeStatus::Open {
            return Err(DomainError::invariant(
                "cannot record counts on a completed session",
            ));
        }
        if line.physical_count < 0 {
            return Err(DomainError::validation("physical count cannot be negative"));
        }
        if let Some(existing) = self.lines.iter_mut().find(|l| l.item_id == line.item_id) {
            *existing = line;
        } else {
            self.lines.push(line);
        }
        Ok(())
    }

    /// Diff physical vs. system counts.
    ///
    /// Emits one adjustment per line with non-zero variance; lines that match
    /// exactly produce nothing.
    pub fn reconcile(&self) -> DomainResult<Vec<StockAdjustment>> {
        if self.status != StockTakeStatus::Open {
            return Err(DomainError::invariant(
                "session already completed; counts were reconciled once",
            ));
        }
        Ok(self
            .lines
            .iter()
            .filter(|l| l.physical_count != l.system_count)
            .map(|l| StockAdjustment {
                item_id: l.item_id,
                location: self.location,
                delta: l.physical_count - l.system_count,
            })
            .collect())
    }

    /// Mark the session done after its adjustments were written.
    pub fn complete(&mut self) -> DomainResult<()> {
        if self.status != StockTakeStatus::Open {
            return Err(DomainError::invariant("session already completed"));
        }
        self.status = StockTakeStatus::Completed;
        Ok(())
    }
}

impl Entity for StockTakeSession {
    type Id = StockTakeId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> StockTakeSession {
        StockTakeSession::new(StockTakeId::new(), Location::BulkStore, Utc::now())
    }

    #[test]
    fn reconcile_emits_adjustments_only_for_variance() {
        let matched = ItemId::new();
        let short = ItemId::new();
        let over = ItemId::new();
        let mut s = session();
        s.record_line(StockTakeLine { item_id: matched, system_count: 50, physical_count: 50 })
            .unwrap();
        s.record_line(StockTakeLine { item_id: short, system_count: 80, physical_count: 72 })
            .unwrap();
        s.record_line(StockTakeLine { item_id: over, system_count: 10, physical_count: 14 })
            .unwrap();

        let adjustments = s.reconcile().unwrap();
        assert_eq!(adjustments.len(), 2);
        assert!(adjustments.contains(&StockAdjustment {
            item_id: short,
            location: Location::BulkStore,
            delta: -8,
        }));
        assert!(adjustments.contains(&StockAdjustment {
            item_id: over,
            location: Location::BulkStore,
            delta: 4,
        }));
    }

    #[test]
    fn recapturing_a_line_replaces_the_previous_count() {
        let item = ItemId::new();
        let mut s = session();
        s.record_line(StockTakeLine { item_id: item, system_count: 50, physical_count: 40 })
            .unwrap();
        s.record_line(StockTakeLine { item_id: item, system_count: 50, physical_count: 49 })
            .unwrap();
        assert_eq!(s.lines().len(), 1);
        assert_eq!(s.reconcile().unwrap()[0].delta, -1);
    }

    #[test]
    fn completed_session_cannot_reconcile_again() {
        let mut s = session();
        s.complete().unwrap();
        assert!(s.reconcile().is_err());
        assert!(s.complete().is_err());
        assert!(
            s.record_line(StockTakeLine {
                item_id: ItemId::new(),
                system_count: 0,
                physical_count: 0,
            })
            .is_err()
        );
    }
}
