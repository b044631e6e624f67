//! Infrastructure wiring shared by every handler.

use std::sync::Arc;

use clinistock_ai::SuggestionClient;
use clinistock_auth::{Role, User};
use clinistock_core::UserId;
use clinistock_infra::{CannedSuggestionClient, Repositories};

pub struct AppServices {
    pub repos: Repositories,
    pub ai: Arc<dyn SuggestionClient>,
}

/// Wire the store and AI client from the environment.
pub async fn build_services() -> AppServices {
    let repos = build_repositories().await;
    seed_admin(&repos).await;

    // Without a configured model endpoint the AI routes answer with an empty
    // suggestion set rather than failing.
    let ai: Arc<dyn SuggestionClient> =
        Arc::new(CannedSuggestionClient::new(r#"{"suggestions": []}"#));

    AppServices { repos, ai }
}

#[cfg(feature = "postgres")]
async fn build_repositories() -> Repositories {
    let url = std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| panic!("DATABASE_URL must be set for the postgres store"));
    let pool = sqlx::PgPool::connect(&url)
        .await
        .unwrap_or_else(|e| panic!("failed to connect to postgres: {e}"));
    clinistock_infra::store::postgres::ensure_schema(&pool)
        .await
        .unwrap_or_else(|e| panic!("failed to prepare schema: {e}"));
    Repositories::postgres(pool)
}

#[cfg(not(feature = "postgres"))]
async fn build_repositories() -> Repositories {
    tracing::warn!("no persistent store configured; using in-memory collections");
    Repositories::in_memory()
}

/// Ensure at least one login exists on an empty user collection.
async fn seed_admin(repos: &Repositories) {
    let existing = match repos.users.list().await {
        Ok(users) => users,
        Err(e) => {
            tracing::warn!("could not inspect users collection: {e}");
            return;
        }
    };
    if !existing.is_empty() {
        return;
    }

    let token = std::env::var("CLINISTOCK_ADMIN_TOKEN").unwrap_or_else(|_| {
        tracing::warn!("CLINISTOCK_ADMIN_TOKEN not set; using insecure dev default");
        "dev-token".to_string()
    });

    match User::new(UserId::new(), "admin".to_string(), Role::admin(), token) {
        Ok(admin) => {
            if let Err(e) = repos.users.upsert(&admin).await {
                tracing::warn!("failed to seed admin user: {e}");
            } else {
                tracing::info!("seeded initial admin user");
            }
        }
        Err(e) => tracing::warn!("failed to build admin user: {e}"),
    }
}
