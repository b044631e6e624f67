use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::Utc;

use clinistock_billing::{Bill, BillLine, Patient, PatientDraft, Service, ServiceDraft};
use clinistock_core::{BillId, DomainResult, PatientId, ServiceId};

use crate::app::routes::common;
use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/patients", post(create_patient).get(list_patients))
        .route("/patients/:id", get(get_patient).put(update_patient))
        .route("/services", post(create_service).get(list_services))
        .route("/services/:id", get(get_service).put(update_service))
        .route("/bills", post(create_bill).get(list_bills))
        .route("/bills/:id", get(get_bill))
        .route("/bills/:id/pay", post(pay_bill))
        .route("/bills/:id/void", post(void_bill))
}

pub async fn list_patients(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    if let Err(resp) = common::require(&principal, "billing.read") {
        return resp;
    }
    match services.repos.patients.list().await {
        Ok(patients) => Json(patients).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn get_patient(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(resp) = common::require(&principal, "billing.read") {
        return resp;
    }
    let id: PatientId = match common::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.repos.patients.get(id.into()).await {
        Ok(Some(patient)) => Json(patient).into_response(),
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "patient not found"),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn create_patient(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Json(draft): Json<PatientDraft>,
) -> axum::response::Response {
    if let Err(resp) = common::require(&principal, "billing.write") {
        return resp;
    }

    let patient = match Patient::new(PatientId::new(), draft) {
        Ok(patient) => patient,
        Err(e) => return errors::domain_error_to_response(e),
    };
    if let Err(e) = services.repos.patients.upsert(&patient).await {
        return errors::store_error_to_response(e);
    }

    common::audit(&services, &principal, "billing.patients.create", patient.id_typed().to_string())
        .await;
    (StatusCode::CREATED, Json(patient)).into_response()
}

pub async fn update_patient(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    Json(draft): Json<PatientDraft>,
) -> axum::response::Response {
    if let Err(resp) = common::require(&principal, "billing.write") {
        return resp;
    }
    let id: PatientId = match common::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let mut patient = match services.repos.patients.get(id.into()).await {
        Ok(Some(patient)) => patient,
        Ok(None) => return errors::json_error(StatusCode::NOT_FOUND, "not_found", "patient not found"),
        Err(e) => return errors::store_error_to_response(e),
    };
    if let Err(e) = patient.update(draft) {
        return errors::domain_error_to_response(e);
    }
    if let Err(e) = services.repos.patients.upsert(&patient).await {
        return errors::store_error_to_response(e);
    }
    Json(patient).into_response()
}

pub async fn list_services(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    if let Err(resp) = common::require(&principal, "billing.read") {
        return resp;
    }
    match services.repos.services.list().await {
        Ok(list) => Json(list).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn get_service(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(resp) = common::require(&principal, "billing.read") {
        return resp;
    }
    let id: ServiceId = match common::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.repos.services.get(id.into()).await {
        Ok(Some(service)) => Json(service).into_response(),
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "service not found"),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn create_service(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Json(draft): Json<ServiceDraft>,
) -> axum::response::Response {
    if let Err(resp) = common::require(&principal, "billing.write") {
        return resp;
    }

    let service = match Service::new(ServiceId::new(), draft) {
        Ok(service) => service,
        Err(e) => return errors::domain_error_to_response(e),
    };
    if let Err(e) = services.repos.services.upsert(&service).await {
        return errors::store_error_to_response(e);
    }

    common::audit(&services, &principal, "billing.services.create", service.id_typed().to_string())
        .await;
    (StatusCode::CREATED, Json(service)).into_response()
}

pub async fn update_service(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    Json(draft): Json<ServiceDraft>,
) -> axum::response::Response {
    if let Err(resp) = common::require(&principal, "billing.write") {
        return resp;
    }
    let id: ServiceId = match common::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let mut service = match services.repos.services.get(id.into()).await {
        Ok(Some(service)) => service,
        Ok(None) => return errors::json_error(StatusCode::NOT_FOUND, "not_found", "service not found"),
        Err(e) => return errors::store_error_to_response(e),
    };
    if let Err(e) = service.update(draft) {
        return errors::domain_error_to_response(e);
    }
    if let Err(e) = services.repos.services.upsert(&service).await {
        return errors::store_error_to_response(e);
    }
    Json(service).into_response()
}

pub async fn list_bills(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    if let Err(resp) = common::require(&principal, "billing.read") {
        return resp;
    }
    match services.repos.bills.list().await {
        Ok(bills) => Json(bills).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn get_bill(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(resp) = common::require(&principal, "billing.read") {
        return resp;
    }
    let id: BillId = match common::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.repos.bills.get(id.into()).await {
        Ok(Some(bill)) => Json(bill).into_response(),
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "bill not found"),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn create_bill(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Json(body): Json<dto::CreateBillRequest>,
) -> axum::response::Response {
    if let Err(resp) = common::require(&principal, "billing.write") {
        return resp;
    }

    // The patient must exist before money is attached to them.
    match services.repos.patients.get(body.patient_id.into()).await {
        Ok(Some(_)) => {}
        Ok(None) => return errors::json_error(StatusCode::NOT_FOUND, "not_found", "patient not found"),
        Err(e) => return errors::store_error_to_response(e),
    }

    let mut lines = Vec::with_capacity(body.lines.len());
    for line in body.lines {
        match BillLine::new(line.description, line.quantity, line.unit_price) {
            Ok(line) => lines.push(line),
            Err(e) => return errors::domain_error_to_response(e),
        }
    }
    let bill = match Bill::new(BillId::new(), body.patient_id, lines, Utc::now()) {
        Ok(bill) => bill,
        Err(e) => return errors::domain_error_to_response(e),
    };
    if let Err(e) = services.repos.bills.upsert(&bill).await {
        return errors::store_error_to_response(e);
    }

    common::audit(&services, &principal, "billing.bills.create", bill.id_typed().to_string())
        .await;
    (StatusCode::CREATED, Json(bill)).into_response()
}

pub async fn pay_bill(
    services: Extension<Arc<AppServices>>,
    principal: Extension<PrincipalContext>,
    id: Path<String>,
) -> axum::response::Response {
    transition(services, principal, id, "billing.bills.pay", |bill| bill.mark_paid()).await
}

pub async fn void_bill(
    services: Extension<Arc<AppServices>>,
    principal: Extension<PrincipalContext>,
    id: Path<String>,
) -> axum::response::Response {
    transition(services, principal, id, "billing.bills.void", |bill| bill.void()).await
}

async fn transition(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    action: &'static str,
    apply: impl FnOnce(&mut Bill) -> DomainResult<()>,
) -> axum::response::Response {
    if let Err(resp) = common::require(&principal, "billing.write") {
        return resp;
    }
    let id: BillId = match common::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let mut bill = match services.repos.bills.get(id.into()).await {
        Ok(Some(bill)) => bill,
        Ok(None) => return errors::json_error(StatusCode::NOT_FOUND, "not_found", "bill not found"),
        Err(e) => return errors::store_error_to_response(e),
    };
    if let Err(e) = apply(&mut bill) {
        return errors::domain_error_to_response(e);
    }
    if let Err(e) = services.repos.bills.upsert(&bill).await {
        return errors::store_error_to_response(e);
    }

    common::audit(&services, &principal, action, id.to_string()).await;
    Json(bill).into_response()
}
