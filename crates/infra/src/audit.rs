use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use clinistock_core::UserId;

/// One line of the audit trail, written after a successful mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    id: Uuid,
    user_id: UserId,
    action: String,
    detail: String,
    at: DateTime<Utc>,
}

impl AuditEntry {
    pub fn new(user_id: UserId, action: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            user_id,
            action: action.into(),
            detail: detail.into(),
            at: Utc::now(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn action(&self) -> &str {
        &self.action
    }

    pub fn detail(&self) -> &str {
        &self.detail
    }

    pub fn at(&self) -> DateTime<Utc> {
        self.at
    }
}
