//! Organizational units that hold stock.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Stock-holding location within the clinic.
///
/// Billing is an organizational unit too, but it holds no stock, so it is not
/// represented here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Location {
    BulkStore,
    Dispensary,
}

impl Location {
    pub fn as_str(&self) -> &'static str {
        match self {
            Location::BulkStore => "bulk_store",
            Location::Dispensary => "dispensary",
        }
    }
}

impl core::fmt::Display for Location {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for Location {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bulk_store" => Ok(Location::BulkStore),
            "dispensary" => Ok(Location::Dispensary),
            other => Err(DomainError::validation(format!(
                "unknown location: {other}"
            ))),
        }
    }
}
