use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use clinistock_core::VendorId;
use clinistock_vendors::{Vendor, VendorDraft};

use crate::app::errors;
use crate::app::routes::common;
use crate::app::services::AppServices;
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_vendor).get(list_vendors))
        .route("/:id", get(get_vendor).put(update_vendor).delete(delete_vendor))
}

pub async fn list_vendors(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    if let Err(resp) = common::require(&principal, "vendors.read") {
        return resp;
    }
    match services.repos.vendors.list().await {
        Ok(vendors) => Json(vendors).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn get_vendor(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(resp) = common::require(&principal, "vendors.read") {
        return resp;
    }
    let id: VendorId = match common::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.repos.vendors.get(id.into()).await {
        Ok(Some(vendor)) => Json(vendor).into_response(),
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "vendor not found"),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn create_vendor(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Json(draft): Json<VendorDraft>,
) -> axum::response::Response {
    if let Err(resp) = common::require(&principal, "vendors.write") {
        return resp;
    }

    let vendor = match Vendor::new(VendorId::new(), draft) {
        Ok(vendor) => vendor,
        Err(e) => return errors::domain_error_to_response(e),
    };
    if let Err(e) = services.repos.vendors.upsert(&vendor).await {
        return errors::store_error_to_response(e);
    }

    common::audit(&services, &principal, "vendors.create", vendor.id_typed().to_string()).await;
    (StatusCode::CREATED, Json(vendor)).into_response()
}

pub async fn update_vendor(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    Json(draft): Json<VendorDraft>,
) -> axum::response::Response {
    if let Err(resp) = common::require(&principal, "vendors.write") {
        return resp;
    }
    let id: VendorId = match common::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let mut vendor = match services.repos.vendors.get(id.into()).await {
        Ok(Some(vendor)) => vendor,
        Ok(None) => return errors::json_error(StatusCode::NOT_FOUND, "not_found", "vendor not found"),
        Err(e) => return errors::store_error_to_response(e),
    };
    if let Err(e) = vendor.update(draft) {
        return errors::domain_error_to_response(e);
    }
    if let Err(e) = services.repos.vendors.upsert(&vendor).await {
        return errors::store_error_to_response(e);
    }

    common::audit(&services, &principal, "vendors.update", id.to_string()).await;
    Json(vendor).into_response()
}

pub async fn delete_vendor(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(resp) = common::require(&principal, "vendors.write") {
        return resp;
    }
    let id: VendorId = match common::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.repos.vendors.delete(id.into()).await {
        Ok(true) => {
            common::audit(&services, &principal, "vendors.delete", id.to_string()).await;
            StatusCode::NO_CONTENT.into_response()
        }
        Ok(false) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "vendor not found"),
        Err(e) => errors::store_error_to_response(e),
    }
}
