use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::Utc;

use clinistock_core::InternalOrderId;
use clinistock_inventory::InternalOrder;

use crate::app::routes::common;
use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_order).get(list_orders))
        .route("/:id", get(get_order))
        .route("/:id/fulfil", post(fulfil_order))
        .route("/:id/reject", post(reject_order))
}

pub async fn list_orders(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    if let Err(resp) = common::require(&principal, "inventory.stock.read") {
        return resp;
    }
    match services.repos.internal_orders.list().await {
        Ok(orders) => Json(orders).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn get_order(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(resp) = common::require(&principal, "inventory.stock.read") {
        return resp;
    }
    let id: InternalOrderId = match common::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.repos.internal_orders.get(id.into()).await {
        Ok(Some(order)) => Json(order).into_response(),
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "order not found"),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn create_order(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Json(body): Json<dto::CreateInternalOrderRequest>,
) -> axum::response::Response {
    if let Err(resp) = common::require(&principal, "inventory.orders.request") {
        return resp;
    }

    let order = match InternalOrder::new(
        InternalOrderId::new(),
        body.from,
        body.to,
        body.lines,
        Utc::now(),
    ) {
        Ok(order) => order,
        Err(e) => return errors::domain_error_to_response(e),
    };
    if let Err(e) = services.repos.internal_orders.upsert(&order).await {
        return errors::store_error_to_response(e);
    }

    common::audit(&services, &principal, "internal_orders.create", order.id_typed().to_string())
        .await;
    (StatusCode::CREATED, Json(order)).into_response()
}

/// Move the requested quantities between locations.
///
/// The whole order is planned against current stock before anything moves;
/// a shortfall on any line leaves stock and order untouched.
pub async fn fulfil_order(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(resp) = common::require(&principal, "inventory.orders.fulfil") {
        return resp;
    }
    let id: InternalOrderId = match common::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let mut order = match services.repos.internal_orders.get(id.into()).await {
        Ok(Some(order)) => order,
        Ok(None) => return errors::json_error(StatusCode::NOT_FOUND, "not_found", "order not found"),
        Err(e) => return errors::store_error_to_response(e),
    };
    let mut batches = match services.repos.stocks.list().await {
        Ok(batches) => batches,
        Err(e) => return errors::store_error_to_response(e),
    };

    if let Err(e) = order.fulfil(&mut batches) {
        return errors::domain_error_to_response(e);
    }

    if let Err(e) = services.repos.stocks.put_many(&batches).await {
        return errors::store_error_to_response(e);
    }
    if let Err(e) = services.repos.internal_orders.upsert(&order).await {
        return errors::store_error_to_response(e);
    }

    common::audit(&services, &principal, "internal_orders.fulfil", id.to_string()).await;
    Json(order).into_response()
}

pub async fn reject_order(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(resp) = common::require(&principal, "inventory.orders.fulfil") {
        return resp;
    }
    let id: InternalOrderId = match common::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let mut order = match services.repos.internal_orders.get(id.into()).await {
        Ok(Some(order)) => order,
        Ok(None) => return errors::json_error(StatusCode::NOT_FOUND, "not_found", "order not found"),
        Err(e) => return errors::store_error_to_response(e),
    };
    if let Err(e) = order.reject() {
        return errors::domain_error_to_response(e);
    }
    if let Err(e) = services.repos.internal_orders.upsert(&order).await {
        return errors::store_error_to_response(e);
    }

    common::audit(&services, &principal, "internal_orders.reject", id.to_string()).await;
    Json(order).into_response()
}
