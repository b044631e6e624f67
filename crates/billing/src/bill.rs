use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use clinistock_core::{BillId, DomainError, DomainResult, Entity, Money, PatientId, Quantity};

/// One billed line: a service rendered or an item dispensed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillLine {
    pub description: String,
    pub quantity: Quantity,
    pub unit_price: Money,
    /// `quantity × unit_price`.
    pub total: Money,
}

impl BillLine {
    pub fn new(description: String, quantity: Quantity, unit_price: Money) -> DomainResult<Self> {
        if description.trim().is_empty() {
            return Err(DomainError::validation("line description cannot be empty"));
        }
        if quantity <= 0 {
            return Err(DomainError::validation("line quantity must be positive"));
        }
        if unit_price == 0 {
            return Err(DomainError::validation("line unit price must be positive"));
        }
        let total = (quantity as u64)
            .checked_mul(unit_price)
            .ok_or_else(|| DomainError::invariant("bill line amount overflow"))?;
        Ok(Self { description, quantity, unit_price, total })
    }
}

/// Bill lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillStatus {
    Pending,
    Paid,
    Void,
}

/// A patient bill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bill {
    id: BillId,
    patient_id: PatientId,
    lines: Vec<BillLine>,
    grand_total: Money,
    status: BillStatus,
    created_at: DateTime<Utc>,
}

impl Bill {
    pub fn new(
        id: BillId,
        patient_id: PatientId,
        lines: Vec<BillLine>,
        created_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        if lines.is_empty() {
            return Err(DomainError::validation("a bill needs at least one line"));
        }
        let mut grand_total: Money = 0;
        for line in &lines {
            grand_total = grand_total
                .checked_add(line.total)
                .ok_or_else(|| DomainError::invariant("bill amount overflow"))?;
        }
        Ok(Self {
            id,
            patient_id,
            lines,
            grand_total,
            status: BillStatus::Pending,
            created_at,
        })
    }

    pub fn id_typed(&self) -> BillId {
        self.id
    }

    pub fn patient_id(&self) -> PatientId {
        self.patient_id
    }

    pub fn lines(&self) -> &[BillLine] {
        &self.lines
    }

    pub fn grand_total(&self) -> Money {
        self.grand_total
    }

    pub fn status(&self) -> BillStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// `Pending → Paid`.
    pub fn mark_paid(&mut self) -> DomainResult<()> {
        if self.status != BillStatus::Pending {
            return Err(DomainError::invariant("only pending bills can be paid"));
        }
        self.status = BillStatus::Paid;
        Ok(())
    }

    /// `Pending → Void`.
    pub fn void(&mut self) -> DomainResult<()> {
        if self.status != BillStatus::Pending {
            return Err(DomainError::invariant("only pending bills can be voided"));
        }
        self.status = BillStatus::Void;
        Ok(())
    }
}

impl Entity for Bill {
    type Id = BillId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}


#[cfg(test)]
mod properties {
    use proptest::prelude::*;

    use super::*;

    proptest! {
        #[test]
        fn grand_total_always_matches_line_sum(
            inputs in proptest::collection::vec((1i64..1_000, 1u64..100_000), 1..20),
        ) {
            let lines: Vec<BillLine> = inputs
                .iter()
                .map(|(q, p)| BillLine::new("line".to_string(), *q, *p).unwrap())
                .collect();
            let expected: Money = lines.iter().map(|l| l.total).sum();
            let bill = Bill::new(BillId::new(), PatientId::new(), lines, Utc::now()).unwrap();
            prop_assert_eq!(bill.grand_total(), expected);
        }
    }
}
