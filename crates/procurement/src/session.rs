//! Resumable procurement sessions.
//!
//! A session is a snapshot of in-progress list-building/quoting state, saved
//! verbatim and reloaded so the user can pick up where they left off. It is
//! not shared state: the last explicit save wins.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use clinistock_core::{Entity, ItemId, Quantity, SessionId};

use crate::list::ProcurementList;
use crate::quotes::QuoteMatrix;

/// Which stage the user was on when the session was saved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStage {
    Listing,
    Quoting,
    Review,
}

/// Snapshot of an in-progress procurement run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcurementSession {
    id: SessionId,
    pub stage: SessionStage,
    pub list: ProcurementList,
    /// Per-item order quantities; absent means the default of 1.
    pub quantities: BTreeMap<ItemId, Quantity>,
    pub quotes: QuoteMatrix,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ProcurementSession {
    pub fn new(id: SessionId, now: DateTime<Utc>) -> Self {
        Self {
            id,
            stage: SessionStage::Listing,
            list: ProcurementList::new(),
            quantities: BTreeMap::new(),
            quotes: QuoteMatrix::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id_typed(&self) -> SessionId {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Bump the save timestamp.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}

impl Entity for ProcurementSession {
    type Id = SessionId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a_session_round_trips_through_json() {
        let mut session = ProcurementSession::new(SessionId::new(), Utc::now());
        session.stage = SessionStage::Quoting;
        session.list.add(ItemId::new());
        session.quantities.insert(ItemId::new(), 50);

        let json = serde_json::to_string(&session).unwrap();
        let restored: ProcurementSession = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, session);
    }

    #[test]
    fn touch_updates_only_the_save_timestamp() {
        let created = Utc::now();
        let mut session = ProcurementSession::new(SessionId::new(), created);
        let later = created + chrono::Duration::minutes(5);
        session.touch(later);
        assert_eq!(session.created_at(), created);
        assert_eq!(session.updated_at(), later);
    }
}
