use sqlx::{Pool, Postgres, Sqlite};
use std::str::FromStr;

use crate::collection::errors::CollectionError;
use crate::config::{DocumentStoreConfig, DocumentStoreKind};

/// Connection pool to the database holding the document collections.
#[derive(Clone, Debug)]
pub enum DocumentPool {
    Sqlite(Pool<Sqlite>),
    Postgres(Pool<Postgres>),
}

impl DocumentPool {
    /// Create the pool described by `config`. Connections are opened lazily.
    pub fn connect(config: &DocumentStoreConfig) -> Result<Self, CollectionError> {
        tracing::info!(
            "Initializing document store with type: {:?}, url: {}",
            config.kind,
            config.url
        );

        let pool = match config.kind {
            DocumentStoreKind::Sqlite => {
                let opts = sqlx::sqlite::SqliteConnectOptions::from_str(&config.url)
                    .map_err(|e| CollectionError::Config(e.to_string()))?
                    .create_if_missing(true);

                let pool_options = if config.url.contains(":memory:") {
                    // Every connection to :memory: is a separate database, so
                    // keep exactly one alive for the lifetime of the pool.
                    sqlx::sqlite::SqlitePoolOptions::new()
                        .max_connections(1)
                        .min_connections(1)
                        .idle_timeout(None)
                        .max_lifetime(None)
                } else {
                    sqlx::sqlite::SqlitePoolOptions::new()
                };
                Self::Sqlite(pool_options.connect_lazy_with(opts))
            }
            DocumentStoreKind::Postgres => Self::Postgres(
                sqlx::postgres::PgPoolOptions::new()
                    .connect_lazy(&config.url)
                    .map_err(|e| CollectionError::Config(e.to_string()))?,
            ),
        };

        Ok(pool)
    }

    pub fn as_sqlite(&self) -> Option<&Pool<Sqlite>> {
        match self {
            Self::Sqlite(pool) => Some(pool),
            Self::Postgres(_) => None,
        }
    }

    pub fn as_postgres(&self) -> Option<&Pool<Postgres>> {
        match self {
            Self::Postgres(pool) => Some(pool),
            Self::Sqlite(_) => None,
        }
    }

    pub async fn close(&self) {
        match self {
            Self::Sqlite(pool) => pool.close().await,
            Self::Postgres(pool) => pool.close().await,
        }
    }
}

/// Collection, table and field names end up in SQL text, so only ASCII
/// letters, digits and underscores are accepted.
pub(crate) fn validate_identifier(kind: &str, name: &str) -> Result<(), CollectionError> {
    let valid = !name.is_empty()
        && name.len() <= 63
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(())
    } else {
        Err(CollectionError::InvalidName(format!("{kind} '{name}'")))
    }
}
