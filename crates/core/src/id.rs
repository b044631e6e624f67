//! Strongly-typed identifiers used across the domain.

use core::str::FromStr;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

macro_rules! impl_uuid_newtype {
    ($(#[$doc:meta])* $t:ident, $name:literal) => {
        $(#[$doc])*
        #[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $t(Uuid);

        impl $t {
            /// Create a new identifier.
            ///
            /// Uses UUIDv7 (time-ordered). Prefer passing IDs explicitly in tests
            /// for determinism.
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $t {
            fn default() -> Self {
                Self::new()
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<Uuid> for $t {
            fn from(value: Uuid) -> Self {
                Self(value)
            }
        }

        impl From<$t> for Uuid {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let uuid = Uuid::from_str(s)
                    .map_err(|e| DomainError::invalid_id(format!("{}: {}", $name, e)))?;
                Ok(Self(uuid))
            }
        }
    };
}

impl_uuid_newtype!(
    /// Identifier of a catalog item (immutable once created).
    ItemId,
    "ItemId"
);
impl_uuid_newtype!(
    /// Identifier of a per-location, per-batch stock record.
    StockBatchId,
    "StockBatchId"
);
impl_uuid_newtype!(
    /// Identifier of a vendor (supplier).
    VendorId,
    "VendorId"
);
impl_uuid_newtype!(
    /// Identifier of a local purchase order.
    LpoId,
    "LpoId"
);
impl_uuid_newtype!(
    /// Identifier of a resumable procurement session.
    SessionId,
    "SessionId"
);
impl_uuid_newtype!(
    /// Identifier of an internal transfer order.
    InternalOrderId,
    "InternalOrderId"
);
impl_uuid_newtype!(
    /// Identifier of a stock-take session.
    StockTakeId,
    "StockTakeId"
);
impl_uuid_newtype!(
    /// Identifier of a bill.
    BillId,
    "BillId"
);
impl_uuid_newtype!(
    /// Identifier of a patient.
    PatientId,
    "PatientId"
);
impl_uuid_newtype!(
    /// Identifier of a billable service.
    ServiceId,
    "ServiceId"
);
impl_uuid_newtype!(
    /// Identifier of a user (actor identity).
    UserId,
    "UserId"
);
