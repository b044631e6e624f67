//! Procurement domain module: the list → compare → finalize workflow.
//!
//! Three composable stages, each a pure transformation:
//!
//! 1. **List builder** — low-stock selection plus manual add/remove over an
//!    ordered item set.
//! 2. **Price comparator** — per (item, vendor) quotes restricted to vendors
//!    that supply the item; per-item minimum valid quote.
//! 3. **LPO finalizer** — group items under their winning (lowest-quote)
//!    vendor into draft local purchase orders with line and grand totals.
//!
//! Control flows strictly forward; each stage's output feeds the next. A
//! resumable [`ProcurementSession`] snapshots in-progress state.

pub mod list;
pub mod lpo;
pub mod quotes;
pub mod session;

pub use list::{ProcurementList, low_stock_items};
pub use lpo::{DraftLpo, Lpo, LpoLine, LpoStatus, finalize};
pub use quotes::{QuoteMatrix, relevant_vendors};
pub use session::{ProcurementSession, SessionStage};
