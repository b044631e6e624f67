//! Helpers shared by route handlers.

use std::str::FromStr;

use axum::http::StatusCode;

use clinistock_auth::Permission;
use clinistock_core::DomainError;
use clinistock_infra::AuditEntry;

use crate::app::errors;
use crate::app::services::AppServices;
use crate::context::PrincipalContext;

/// Check the caller's role against a required permission.
pub fn require(
    principal: &PrincipalContext,
    permission: &'static str,
) -> Result<(), axum::response::Response> {
    clinistock_auth::authorize(principal.role(), &Permission::new(permission)).map_err(|e| {
        errors::json_error(StatusCode::FORBIDDEN, "forbidden", e.to_string())
    })
}

/// Parse a typed id out of a path segment.
pub fn parse_id<T>(raw: &str) -> Result<T, axum::response::Response>
where
    T: FromStr<Err = DomainError>,
{
    raw.parse::<T>()
        .map_err(|e| errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", e.to_string()))
}

/// Record a successful mutation in the audit trail.
///
/// Failures are logged, not surfaced; the mutation already happened.
pub async fn audit(
    services: &AppServices,
    principal: &PrincipalContext,
    action: &'static str,
    detail: impl Into<String>,
) {
    let entry = AuditEntry::new(principal.user_id(), action, detail.into());
    if let Err(e) = services.repos.logs.upsert(&entry).await {
        tracing::warn!(action, "audit write failed: {e}");
    }
}
