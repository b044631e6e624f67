//! Item-master domain module.
//!
//! Catalog entries for the pharmacy: display-name components, per-location
//! reorder levels, costing. Also hosts the CSV bulk-import mapping and row
//! validation (pure; file IO and batch writes happen at the API boundary).

pub mod import;
pub mod item;

pub use import::{ColumnMapping, ImportError, ImportReport, RowError, parse_items_csv};
pub use item::{Item, ItemDraft};
