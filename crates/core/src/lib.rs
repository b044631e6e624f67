//! `clinistock-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod entity;
pub mod error;
pub mod id;
pub mod location;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{
    BillId, InternalOrderId, ItemId, LpoId, PatientId, ServiceId, SessionId, StockBatchId,
    StockTakeId, UserId, VendorId,
};
pub use location::Location;

/// Money values are carried as `u64` in the smallest currency unit (cents).
pub type Money = u64;

/// Stock quantities are carried as `i64` (deltas may be negative).
pub type Quantity = i64;
