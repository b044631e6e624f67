//! Postgres-backed collection.
//!
//! One table per collection, each `(id UUID PRIMARY KEY, body JSONB,
//! updated_at TIMESTAMPTZ)`. Upserts overwrite the body wholesale, so the
//! last write wins exactly as in the in-memory backend. Batch writes run in
//! a single transaction.

use std::marker::PhantomData;

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use super::{Collection, Document, StoreError};
use crate::documents::COLLECTIONS;

/// Create the backing table for every known collection.
///
/// Idempotent; intended to run at startup.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), StoreError> {
    for name in COLLECTIONS {
        let ddl = format!(
            "CREATE TABLE IF NOT EXISTS {name} (
                id UUID PRIMARY KEY,
                body JSONB NOT NULL,
                updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
            )"
        );
        sqlx::query(&ddl)
            .execute(pool)
            .await
            .map_err(|e| map_sqlx_error("ensure_schema", e))?;
    }
    Ok(())
}

/// Postgres collection over the table named by `T::COLLECTION`.
#[derive(Debug, Clone)]
pub struct PostgresCollection<T> {
    pool: PgPool,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Document> PostgresCollection<T> {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _marker: PhantomData,
        }
    }
}

#[async_trait]
impl<T: Document> Collection<T> for PostgresCollection<T> {
    async fn get(&self, id: Uuid) -> Result<Option<T>, StoreError> {
        let sql = format!("SELECT body FROM {} WHERE id = $1", T::COLLECTION);
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(T::COLLECTION, e))?;

        match row {
            Some(row) => {
                let body: JsonValue = row
                    .try_get("body")
                    .map_err(|e| map_sqlx_error(T::COLLECTION, e))?;
                Ok(Some(serde_json::from_value(body)?))
            }
            None => Ok(None),
        }
    }

    async fn list(&self) -> Result<Vec<T>, StoreError> {
        let sql = format!("SELECT body FROM {} ORDER BY id", T::COLLECTION);
        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(T::COLLECTION, e))?;

        let mut docs = Vec::with_capacity(rows.len());
        for row in rows {
            let body: JsonValue = row
                .try_get("body")
                .map_err(|e| map_sqlx_error(T::COLLECTION, e))?;
            docs.push(serde_json::from_value(body)?);
        }
        Ok(docs)
    }

    async fn upsert(&self, doc: &T) -> Result<(), StoreError> {
        let sql = format!(
            "INSERT INTO {} (id, body) VALUES ($1, $2)
             ON CONFLICT (id) DO UPDATE SET body = EXCLUDED.body, updated_at = now()",
            T::COLLECTION
        );
        sqlx::query(&sql)
            .bind(doc.doc_id())
            .bind(serde_json::to_value(doc)?)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(T::COLLECTION, e))?;
        Ok(())
    }

    async fn put_many(&self, docs: &[T]) -> Result<(), StoreError> {
        if docs.is_empty() {
            return Ok(());
        }

        let sql = format!(
            "INSERT INTO {} (id, body) VALUES ($1, $2)
             ON CONFLICT (id) DO UPDATE SET body = EXCLUDED.body, updated_at = now()",
            T::COLLECTION
        );

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error(T::COLLECTION, e))?;
        for doc in docs {
            sqlx::query(&sql)
                .bind(doc.doc_id())
                .bind(serde_json::to_value(doc)?)
                .execute(&mut *tx)
                .await
                .map_err(|e| map_sqlx_error(T::COLLECTION, e))?;
        }
        tx.commit()
            .await
            .map_err(|e| map_sqlx_error(T::COLLECTION, e))?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let sql = format!("DELETE FROM {} WHERE id = $1", T::COLLECTION);
        let result = sqlx::query(&sql)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(T::COLLECTION, e))?;
        Ok(result.rows_affected() > 0)
    }
}

fn map_sqlx_error(context: &str, e: sqlx::Error) -> StoreError {
    StoreError::Backend(format!("{context}: {e}"))
}
