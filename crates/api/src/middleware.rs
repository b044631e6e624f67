use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};

use clinistock_infra::Repositories;

use crate::context::PrincipalContext;

#[derive(Clone)]
pub struct AuthState {
    pub repos: Repositories,
}

/// Resolve the bearer token to a user in the `users` collection.
///
/// Unknown tokens and deactivated users both get a plain 401.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let token = extract_bearer(req.headers())?;

    let users = state
        .repos
        .users
        .list()
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    let user = users
        .iter()
        .find(|u| u.token() == token)
        .ok_or(StatusCode::UNAUTHORIZED)?;

    if !user.is_active() {
        return Err(StatusCode::UNAUTHORIZED);
    }

    req.extensions_mut().insert(PrincipalContext::new(
        user.id_typed(),
        user.role().clone(),
    ));

    Ok(next.run(req).await)
}

fn extract_bearer(headers: &HeaderMap) -> Result<&str, StatusCode> {
    let header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let header = header.to_str().map_err(|_| StatusCode::UNAUTHORIZED)?;

    let header = header
        .strip_prefix("Bearer ")
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let token = header.trim();
    if token.is_empty() {
        return Err(StatusCode::UNAUTHORIZED);
    }

    Ok(token)
}
