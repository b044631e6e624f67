use axum::{Router, routing::get};

pub mod ai;
pub mod billing;
pub mod common;
pub mod internal_orders;
pub mod items;
pub mod lpos;
pub mod procurement;
pub mod settings;
pub mod stock;
pub mod stock_takes;
pub mod system;
pub mod vendors;

/// Router for all authenticated endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/whoami", get(system::whoami))
        .nest("/items", items::router())
        .nest("/stock", stock::router())
        .nest("/internal-orders", internal_orders::router())
        .nest("/stock-takes", stock_takes::router())
        .nest("/vendors", vendors::router())
        .nest("/procurement", procurement::router())
        .nest("/lpos", lpos::router())
        .nest("/billing", billing::router())
        .nest("/ai", ai::router())
        .nest("/settings", settings::router())
}
