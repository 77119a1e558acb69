use chrono::Utc;
use sqlx::{Pool, Sqlite};

use crate::collection::errors::CollectionError;

pub(super) async fn create_table_sqlite(
    pool: &Pool<Sqlite>,
    table_name: &str,
) -> Result<(), CollectionError> {
    sqlx::query(&format!(
        r#"
        CREATE TABLE IF NOT EXISTS {table_name} (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            body TEXT NOT NULL,
            created_at TIMESTAMP NOT NULL
        )
        "#
    ))
    .execute(pool)
    .await
    .map_err(|e| CollectionError::Storage(e.to_string()))?;

    Ok(())
}

pub(super) async fn insert_document_sqlite(
    pool: &Pool<Sqlite>,
    table_name: &str,
    body: &serde_json::Value,
) -> Result<i64, CollectionError> {
    // Ensure the table exists before any operation; in-memory databases start empty
    create_table_sqlite(pool, table_name).await?;

    let result = sqlx::query(&format!(
        r#"
        INSERT INTO {table_name} (body, created_at) VALUES (?, ?)
        "#
    ))
    .bind(body.to_string())
    .bind(Utc::now())
    .execute(pool)
    .await
    .map_err(|e| CollectionError::Storage(e.to_string()))?;

    Ok(result.last_insert_rowid())
}

pub(super) async fn find_one_by_sqlite(
    pool: &Pool<Sqlite>,
    table_name: &str,
    field: &str,
    value: &str,
) -> Result<Option<serde_json::Value>, CollectionError> {
    create_table_sqlite(pool, table_name).await?;

    let body: Option<String> = sqlx::query_scalar(&format!(
        r#"
        SELECT body FROM {table_name}
        WHERE json_extract(body, ?) = ?
        ORDER BY id ASC
        LIMIT 1
        "#
    ))
    .bind(format!("$.{field}"))
    .bind(value)
    .fetch_optional(pool)
    .await
    .map_err(|e| CollectionError::Storage(e.to_string()))?;

    body.map(|b| serde_json::from_str(&b).map_err(CollectionError::from))
        .transpose()
}

pub(super) async fn count_sqlite(
    pool: &Pool<Sqlite>,
    table_name: &str,
) -> Result<i64, CollectionError> {
    create_table_sqlite(pool, table_name).await?;

    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table_name}"))
        .fetch_one(pool)
        .await
        .map_err(|e| CollectionError::Storage(e.to_string()))
}
