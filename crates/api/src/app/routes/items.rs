use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use clinistock_catalog::{Item, ItemDraft, parse_items_csv};
use clinistock_core::ItemId;

use crate::app::routes::common;
use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_item).get(list_items))
        .route("/import", post(import_items))
        .route("/:id", get(get_item).put(update_item).delete(delete_item))
}

pub async fn list_items(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    if let Err(resp) = common::require(&principal, "catalog.items.read") {
        return resp;
    }
    match services.repos.items.list().await {
        Ok(items) => Json(items).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn get_item(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(resp) = common::require(&principal, "catalog.items.read") {
        return resp;
    }
    let id: ItemId = match common::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.repos.items.get(id.into()).await {
        Ok(Some(item)) => Json(item).into_response(),
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "item not found"),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn create_item(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Json(draft): Json<ItemDraft>,
) -> axum::response::Response {
    if let Err(resp) = common::require(&principal, "catalog.items.write") {
        return resp;
    }

    let item = match Item::new(ItemId::new(), draft) {
        Ok(item) => item,
        Err(e) => return errors::domain_error_to_response(e),
    };
    if let Err(e) = services.repos.items.upsert(&item).await {
        return errors::store_error_to_response(e);
    }

    common::audit(&services, &principal, "items.create", item.id_typed().to_string()).await;
    (StatusCode::CREATED, Json(item)).into_response()
}

pub async fn update_item(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    Json(draft): Json<ItemDraft>,
) -> axum::response::Response {
    if let Err(resp) = common::require(&principal, "catalog.items.write") {
        return resp;
    }
    let id: ItemId = match common::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let mut item = match services.repos.items.get(id.into()).await {
        Ok(Some(item)) => item,
        Ok(None) => return errors::json_error(StatusCode::NOT_FOUND, "not_found", "item not found"),
        Err(e) => return errors::store_error_to_response(e),
    };
    if let Err(e) = item.update(draft) {
        return errors::domain_error_to_response(e);
    }
    if let Err(e) = services.repos.items.upsert(&item).await {
        return errors::store_error_to_response(e);
    }

    common::audit(&services, &principal, "items.update", id.to_string()).await;
    Json(item).into_response()
}

pub async fn delete_item(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(resp) = common::require(&principal, "catalog.items.write") {
        return resp;
    }
    let id: ItemId = match common::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.repos.items.delete(id.into()).await {
        Ok(true) => {
            common::audit(&services, &principal, "items.delete", id.to_string()).await;
            StatusCode::NO_CONTENT.into_response()
        }
        Ok(false) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "item not found"),
        Err(e) => errors::store_error_to_response(e),
    }
}

/// CSV bulk import: parse + validate rows, then write accepted drafts as one
/// batch. Skipped rows come back with their line numbers.
pub async fn import_items(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Json(body): Json<dto::ImportItemsRequest>,
) -> axum::response::Response {
    if let Err(resp) = common::require(&principal, "catalog.items.write") {
        return resp;
    }

    let report = match parse_items_csv(body.csv.as_bytes(), &body.mapping) {
        Ok(report) => report,
        Err(e) => return errors::json_error(StatusCode::BAD_REQUEST, "import_error", e.to_string()),
    };

    let mut items = Vec::with_capacity(report.drafts.len());
    for draft in report.drafts {
        match Item::new(ItemId::new(), draft) {
            Ok(item) => items.push(item),
            Err(e) => return errors::domain_error_to_response(e),
        }
    }
    if let Err(e) = services.repos.items.put_many(&items).await {
        return errors::store_error_to_response(e);
    }

    common::audit(
        &services,
        &principal,
        "items.import",
        format!("{} imported, {} skipped", items.len(), report.skipped.len()),
    )
    .await;

    Json(dto::ImportItemsResponse {
        imported: items.len(),
        skipped: report.skipped,
    })
    .into_response()
}
