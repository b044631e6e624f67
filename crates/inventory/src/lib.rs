//! Stock domain module.
//!
//! Per-location, per-batch stock records, on-hand aggregation, dispensing,
//! internal transfer orders (bulk store → dispensary) and stock-take variance
//! reconciliation. Everything here is pure; persistence happens elsewhere.

pub mod order;
pub mod stock;
pub mod stock_take;

pub use order::{InternalOrder, InternalOrderStatus, OrderLine};
pub use stock::{BatchDraw, StockBatch, apply_adjustment, apply_draws, on_hand, plan_draw};
pub use stock_take::{StockAdjustment, StockTakeLine, StockTakeSession, StockTakeStatus};
