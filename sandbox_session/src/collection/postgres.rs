use chrono::Utc;
use sqlx::{Pool, Postgres};

use crate::collection::errors::CollectionError;

pub(super) async fn create_table_postgres(
    pool: &Pool<Postgres>,
    table_name: &str,
) -> Result<(), CollectionError> {
    sqlx::query(&format!(
        r#"
        CREATE TABLE IF NOT EXISTS {table_name} (
            id BIGSERIAL PRIMARY KEY,
            body JSONB NOT NULL,
            created_at TIMESTAMPTZ NOT NULL
        )
        "#
    ))
    .execute(pool)
    .await
    .map_err(|e| CollectionError::Storage(e.to_string()))?;

    Ok(())
}

pub(super) async fn insert_document_postgres(
    pool: &Pool<Postgres>,
    table_name: &str,
    body: &serde_json::Value,
) -> Result<i64, CollectionError> {
    sqlx::query_scalar(&format!(
        r#"
        INSERT INTO {table_name} (body, created_at) VALUES ($1, $2)
        RETURNING id
        "#
    ))
    .bind(body)
    .bind(Utc::now())
    .fetch_one(pool)
    .await
    .map_err(|e| CollectionError::Storage(e.to_string()))
}

pub(super) async fn find_one_by_postgres(
    pool: &Pool<Postgres>,
    table_name: &str,
    field: &str,
    value: &str,
) -> Result<Option<serde_json::Value>, CollectionError> {
    sqlx::query_scalar(&format!(
        r#"
        SELECT body FROM {table_name}
        WHERE body ->> $1 = $2
        ORDER BY id ASC
        LIMIT 1
        "#
    ))
    .bind(field)
    .bind(value)
    .fetch_optional(pool)
    .await
    .map_err(|e| CollectionError::Storage(e.to_string()))
}

pub(super) async fn count_postgres(
    pool: &Pool<Postgres>,
    table_name: &str,
) -> Result<i64, CollectionError> {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table_name}"))
        .fetch_one(pool)
        .await
        .map_err(|e| CollectionError::Storage(e.to_string()))
}
