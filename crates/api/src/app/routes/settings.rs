use std::sync::Arc;

use axum::{
    Json, Router,
    extract::Extension,
    response::IntoResponse,
    routing::get,
};

use clinistock_infra::ClinicSettings;
use clinistock_infra::settings::SETTINGS_DOC_ID;

use crate::app::errors;
use crate::app::routes::common;
use crate::app::services::AppServices;
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new().route("/", get(get_settings).put(put_settings))
}

/// Read the settings document; defaults apply until the first save.
pub async fn get_settings(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    if let Err(resp) = common::require(&principal, "settings.read") {
        return resp;
    }
    match services.repos.settings.get(SETTINGS_DOC_ID).await {
        Ok(settings) => Json(settings.unwrap_or_default()).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn put_settings(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Json(settings): Json<ClinicSettings>,
) -> axum::response::Response {
    if let Err(resp) = common::require(&principal, "settings.write") {
        return resp;
    }
    if let Err(e) = services.repos.settings.upsert(&settings).await {
        return errors::store_error_to_response(e);
    }

    common::audit(&services, &principal, "settings.update", settings.name.clone()).await;
    Json(settings).into_response()
}
