use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::Utc;

use clinistock_core::StockTakeId;
use clinistock_inventory::{StockTakeLine, StockTakeSession, apply_adjustment, on_hand};

use crate::app::routes::common;
use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_stock_take).get(list_stock_takes))
        .route("/:id", get(get_stock_take))
        .route("/:id/lines", post(record_line))
        .route("/:id/complete", post(complete_stock_take))
}

pub async fn list_stock_takes(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    if let Err(resp) = common::require(&principal, "inventory.stock.read") {
        return resp;
    }
    match services.repos.stock_takes.list().await {
        Ok(sessions) => Json(sessions).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn get_stock_take(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(resp) = common::require(&principal, "inventory.stock.read") {
        return resp;
    }
    let id: StockTakeId = match common::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.repos.stock_takes.get(id.into()).await {
        Ok(Some(session)) => Json(session).into_response(),
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "stock take not found"),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn create_stock_take(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Json(body): Json<dto::CreateStockTakeRequest>,
) -> axum::response::Response {
    if let Err(resp) = common::require(&principal, "inventory.stock.write") {
        return resp;
    }

    let session = StockTakeSession::new(StockTakeId::new(), body.location, Utc::now());
    if let Err(e) = services.repos.stock_takes.upsert(&session).await {
        return errors::store_error_to_response(e);
    }

    common::audit(&services, &principal, "stock_takes.create", session.id_typed().to_string())
        .await;
    (StatusCode::CREATED, Json(session)).into_response()
}

/// Capture one physical count. The system count is read from current stock
/// at the session's location, so the variance is fixed at entry time.
pub async fn record_line(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::StockTakeLineRequest>,
) -> axum::response::Response {
    if let Err(resp) = common::require(&principal, "inventory.stock.write") {
        return resp;
    }
    let id: StockTakeId = match common::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let mut session = match services.repos.stock_takes.get(id.into()).await {
        Ok(Some(session)) => session,
        Ok(None) => {
            return errors::json_error(StatusCode::NOT_FOUND, "not_found", "stock take not found");
        }
        Err(e) => return errors::store_error_to_response(e),
    };
    let batches = match services.repos.stocks.list().await {
        Ok(batches) => batches,
        Err(e) => return errors::store_error_to_response(e),
    };

    let system_count = on_hand(&batches, session.location())
        .get(&body.item_id)
        .copied()
        .unwrap_or(0);

    let line = StockTakeLine {
        item_id: body.item_id,
        system_count,
        physical_count: body.physical_count,
    };
    if let Err(e) = session.record_line(line) {
        return errors::domain_error_to_response(e);
    }
    if let Err(e) = services.repos.stock_takes.upsert(&session).await {
        return errors::store_error_to_response(e);
    }

    Json(session).into_response()
}

/// Reconcile variances into stock adjustments, write the corrected batches,
/// and close the session.
pub async fn complete_stock_take(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(resp) = common::require(&principal, "inventory.stock.write") {
        return resp;
    }
    let id: StockTakeId = match common::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let mut session = match services.repos.stock_takes.get(id.into()).await {
        Ok(Some(session)) => session,
        Ok(None) => {
            return errors::json_error(StatusCode::NOT_FOUND, "not_found", "stock take not found");
        }
        Err(e) => return errors::store_error_to_response(e),
    };

    let adjustments = match session.reconcile() {
        Ok(adjustments) => adjustments,
        Err(e) => return errors::domain_error_to_response(e),
    };

    let mut batches = match services.repos.stocks.list().await {
        Ok(batches) => batches,
        Err(e) => return errors::store_error_to_response(e),
    };
    for adjustment in &adjustments {
        if let Err(e) = apply_adjustment(&mut batches, adjustment) {
            return errors::domain_error_to_response(e);
        }
    }
    if let Err(e) = session.complete() {
        return errors::domain_error_to_response(e);
    }

    if let Err(e) = services.repos.stocks.put_many(&batches).await {
        return errors::store_error_to_response(e);
    }
    if let Err(e) = services.repos.stock_takes.upsert(&session).await {
        return errors::store_error_to_response(e);
    }

    common::audit(
        &services,
        &principal,
        "stock_takes.complete",
        format!("{} ({} adjustments)", id, adjustments.len()),
    )
    .await;
    Json(serde_json::json!({
        "session": session,
        "adjustments": adjustments,
    }))
    .into_response()
}
