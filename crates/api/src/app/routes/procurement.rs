use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::Utc;

use clinistock_core::{LpoId, SessionId};
use clinistock_procurement::{Lpo, ProcurementList, ProcurementSession, finalize, low_stock_items};

use crate::app::routes::common;
use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/sessions", post(save_session).get(list_sessions))
        .route("/sessions/:id", get(get_session))
        .route("/low-stock", get(low_stock))
        .route("/finalize", post(finalize_session))
}

/// Items currently below their reorder level at the given location.
pub async fn low_stock(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Query(query): Query<dto::LocationQuery>,
) -> axum::response::Response {
    if let Err(resp) = common::require(&principal, "procurement.read") {
        return resp;
    }

    let catalog = match services.repos.items.list().await {
        Ok(items) => items,
        Err(e) => return errors::store_error_to_response(e),
    };
    let batches = match services.repos.stocks.list().await {
        Ok(batches) => batches,
        Err(e) => return errors::store_error_to_response(e),
    };

    let low = low_stock_items(&catalog, &batches, query.location, &ProcurementList::new());
    Json(low).into_response()
}

pub async fn list_sessions(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    if let Err(resp) = common::require(&principal, "procurement.read") {
        return resp;
    }
    match services.repos.procurement_sessions.list().await {
        Ok(sessions) => Json(sessions).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn get_session(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(resp) = common::require(&principal, "procurement.read") {
        return resp;
    }
    let id: SessionId = match common::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.repos.procurement_sessions.get(id.into()).await {
        Ok(Some(session)) => Json(session).into_response(),
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "session not found"),
        Err(e) => errors::store_error_to_response(e),
    }
}

/// Save a session snapshot verbatim. The last explicit save wins.
pub async fn save_session(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Json(mut session): Json<ProcurementSession>,
) -> axum::response::Response {
    if let Err(resp) = common::require(&principal, "procurement.write") {
        return resp;
    }

    session.touch(Utc::now());
    if let Err(e) = services.repos.procurement_sessions.upsert(&session).await {
        return errors::store_error_to_response(e);
    }

    common::audit(&services, &principal, "procurement.save_session", session.id_typed().to_string())
        .await;
    Json(session).into_response()
}

/// Turn a session's list + quotes into draft LPOs, one per winning vendor,
/// and persist them as a single batch.
pub async fn finalize_session(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Json(body): Json<dto::FinalizeRequest>,
) -> axum::response::Response {
    if let Err(resp) = common::require(&principal, "procurement.write") {
        return resp;
    }

    let session = match services
        .repos
        .procurement_sessions
        .get(body.session_id.into())
        .await
    {
        Ok(Some(session)) => session,
        Ok(None) => return errors::json_error(StatusCode::NOT_FOUND, "not_found", "session not found"),
        Err(e) => return errors::store_error_to_response(e),
    };
    let items = match services.repos.items.list().await {
        Ok(items) => items,
        Err(e) => return errors::store_error_to_response(e),
    };
    let vendors = match services.repos.vendors.list().await {
        Ok(vendors) => vendors,
        Err(e) => return errors::store_error_to_response(e),
    };

    let drafts = match finalize(
        &session.list,
        &items,
        &session.quantities,
        &vendors,
        &session.quotes,
    ) {
        Ok(drafts) => drafts,
        Err(e) => return errors::domain_error_to_response(e),
    };

    let now = Utc::now();
    let lpos: Vec<Lpo> = drafts
        .into_iter()
        .map(|draft| Lpo::from_draft(LpoId::new(), draft, now))
        .collect();
    if let Err(e) = services.repos.lpos.put_many(&lpos).await {
        return errors::store_error_to_response(e);
    }

    common::audit(
        &services,
        &principal,
        "procurement.finalize",
        format!("session {} -> {} LPOs", body.session_id, lpos.len()),
    )
    .await;
    (StatusCode::CREATED, Json(lpos)).into_response()
}
