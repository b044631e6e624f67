use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use clinistock_core::{DomainResult, LpoId};
use clinistock_procurement::Lpo;

use crate::app::errors;
use crate::app::routes::common;
use crate::app::services::AppServices;
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_lpos))
        .route("/:id", get(get_lpo))
        .route("/:id/send", post(send_lpo))
        .route("/:id/complete", post(complete_lpo))
        .route("/:id/reject", post(reject_lpo))
}

pub async fn list_lpos(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    if let Err(resp) = common::require(&principal, "procurement.read") {
        return resp;
    }
    match services.repos.lpos.list().await {
        Ok(lpos) => Json(lpos).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn get_lpo(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(resp) = common::require(&principal, "procurement.read") {
        return resp;
    }
    let id: LpoId = match common::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.repos.lpos.get(id.into()).await {
        Ok(Some(lpo)) => Json(lpo).into_response(),
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "LPO not found"),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn send_lpo(
    services: Extension<Arc<AppServices>>,
    principal: Extension<PrincipalContext>,
    id: Path<String>,
) -> axum::response::Response {
    transition(services, principal, id, "lpos.send", |lpo| lpo.mark_sent()).await
}

pub async fn complete_lpo(
    services: Extension<Arc<AppServices>>,
    principal: Extension<PrincipalContext>,
    id: Path<String>,
) -> axum::response::Response {
    transition(services, principal, id, "lpos.complete", |lpo| lpo.mark_completed()).await
}

pub async fn reject_lpo(
    services: Extension<Arc<AppServices>>,
    principal: Extension<PrincipalContext>,
    id: Path<String>,
) -> axum::response::Response {
    transition(services, principal, id, "lpos.reject", |lpo| lpo.reject()).await
}

/// Shared load → transition → upsert flow for the three status moves.
async fn transition(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    action: &'static str,
    apply: impl FnOnce(&mut Lpo) -> DomainResult<()>,
) -> axum::response::Response {
    if let Err(resp) = common::require(&principal, "procurement.write") {
        return resp;
    }
    let id: LpoId = match common::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let mut lpo = match services.repos.lpos.get(id.into()).await {
        Ok(Some(lpo)) => lpo,
        Ok(None) => return errors::json_error(StatusCode::NOT_FOUND, "not_found", "LPO not found"),
        Err(e) => return errors::store_error_to_response(e),
    };
    if let Err(e) = apply(&mut lpo) {
        return errors::domain_error_to_response(e);
    }
    if let Err(e) = services.repos.lpos.upsert(&lpo).await {
        return errors::store_error_to_response(e);
    }

    common::audit(&services, &principal, action, id.to_string()).await;
    Json(lpo).into_response()
}
