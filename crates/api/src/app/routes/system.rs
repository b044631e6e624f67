use axum::{Extension, Json, response::IntoResponse};
use serde_json::json;

use crate::context::PrincipalContext;

pub async fn health() -> axum::response::Response {
    Json(json!({"status": "ok"})).into_response()
}

pub async fn whoami(Extension(principal): Extension<PrincipalContext>) -> axum::response::Response {
    Json(json!({
        "user_id": principal.user_id().to_string(),
        "role": principal.role().as_str(),
    }))
    .into_response()
}
