use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::Deserialize;

use clinistock_core::Location;
use clinistock_inventory::{StockAdjustment, apply_adjustment, apply_draws, on_hand, plan_draw};

use crate::app::routes::common;
use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_stock))
        .route("/on-hand", get(on_hand_totals))
        .route("/adjust", post(adjust_stock))
        .route("/dispense", post(dispense))
}

#[derive(Debug, Deserialize)]
pub struct StockQuery {
    pub location: Option<Location>,
}

pub async fn list_stock(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Query(query): Query<StockQuery>,
) -> axum::response::Response {
    if let Err(resp) = common::require(&principal, "inventory.stock.read") {
        return resp;
    }
    let batches = match services.repos.stocks.list().await {
        Ok(batches) => batches,
        Err(e) => return errors::store_error_to_response(e),
    };
    match query.location {
        Some(location) => Json(
            batches
                .into_iter()
                .filter(|b| b.location() == location)
                .collect::<Vec<_>>(),
        )
        .into_response(),
        None => Json(batches).into_response(),
    }
}

/// Per-item totals at one location, summed across batches.
pub async fn on_hand_totals(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Query(query): Query<dto::LocationQuery>,
) -> axum::response::Response {
    if let Err(resp) = common::require(&principal, "inventory.stock.read") {
        return resp;
    }
    match services.repos.stocks.list().await {
        Ok(batches) => Json(on_hand(&batches, query.location)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn adjust_stock(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Json(adjustment): Json<StockAdjustment>,
) -> axum::response::Response {
    if let Err(resp) = common::require(&principal, "inventory.stock.write") {
        return resp;
    }

    let mut batches = match services.repos.stocks.list().await {
        Ok(batches) => batches,
        Err(e) => return errors::store_error_to_response(e),
    };
    if let Err(e) = apply_adjustment(&mut batches, &adjustment) {
        return errors::domain_error_to_response(e);
    }
    if let Err(e) = services.repos.stocks.put_many(&batches).await {
        return errors::store_error_to_response(e);
    }

    common::audit(
        &services,
        &principal,
        "stock.adjust",
        format!(
            "{} {:+} at {}",
            adjustment.item_id, adjustment.delta, adjustment.location
        ),
    )
    .await;
    StatusCode::NO_CONTENT.into_response()
}

/// Draw down stock for a sale or issue, earliest expiry first.
pub async fn dispense(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Json(body): Json<dto::DispenseRequest>,
) -> axum::response::Response {
    if let Err(resp) = common::require(&principal, "inventory.stock.write") {
        return resp;
    }

    let mut batches = match services.repos.stocks.list().await {
        Ok(batches) => batches,
        Err(e) => return errors::store_error_to_response(e),
    };
    let draws = match plan_draw(&batches, body.item_id, body.location, body.quantity) {
        Ok(draws) => draws,
        Err(e) => return errors::domain_error_to_response(e),
    };
    if let Err(e) = apply_draws(&mut batches, &draws) {
        return errors::domain_error_to_response(e);
    }
    if let Err(e) = services.repos.stocks.put_many(&batches).await {
        return errors::store_error_to_response(e);
    }

    common::audit(
        &services,
        &principal,
        "stock.dispense",
        format!("{} x{} from {}", body.item_id, body.quantity, body.location),
    )
    .await;
    Json(draws).into_response()
}
