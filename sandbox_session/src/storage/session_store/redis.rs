use async_trait::async_trait;
use redis::{AsyncCommands, aio::MultiplexedConnection};
use tokio::sync::RwLock;

use crate::storage::errors::StorageError;

use super::traits::SessionStorage;

/// Session store holding one persistent redis connection for its lifetime.
///
/// The multiplexed connection pipelines concurrent commands over a single
/// socket and serializes access internally, so the store can be shared by
/// concurrent requests without extra locking.
pub struct RedisSessionStore {
    conn: RwLock<Option<MultiplexedConnection>>,
}

impl RedisSessionStore {
    /// Open the connection to `url` (for example `redis://localhost:36379`).
    pub async fn connect(url: &str) -> Result<Self, StorageError> {
        let client = redis::Client::open(url)?;
        let conn = client.get_multiplexed_async_connection().await?;
        tracing::info!("Connected redis session store: url={}", url);
        Ok(Self {
            conn: RwLock::new(Some(conn)),
        })
    }

    async fn connection(&self) -> Result<MultiplexedConnection, StorageError> {
        self.conn
            .read()
            .await
            .clone()
            .ok_or_else(|| StorageError::Backend("Redis connection is closed".to_string()))
    }
}

#[async_trait]
impl SessionStorage for RedisSessionStore {
    fn backend(&self) -> &'static str {
        "redis"
    }

    async fn init(&self) -> Result<(), StorageError> {
        let mut conn = self.connection().await?;
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }

    async fn read(&self, id: &str) -> Result<Option<String>, StorageError> {
        let mut conn = self.connection().await?;
        let value: Option<String> = conn.get(id).await.inspect_err(|e| {
            tracing::error!("Redis GET failed for session {}: {}", id, e);
        })?;
        tracing::debug!(found = value.is_some(), "Redis GET session {}", id);
        Ok(value)
    }

    async fn write(&self, id: &str, payload: Option<&str>) -> Result<(), StorageError> {
        let Some(payload) = payload else {
            return self.invalidate(id).await;
        };
        let mut conn = self.connection().await?;
        let _: () = conn.set(id, payload).await.inspect_err(|e| {
            tracing::error!("Redis SET failed for session {}: {}", id, e);
        })?;
        tracing::debug!("Redis SET session {}", id);
        Ok(())
    }

    async fn invalidate(&self, id: &str) -> Result<(), StorageError> {
        let mut conn = self.connection().await?;
        let _: () = conn.del(id).await.inspect_err(|e| {
            tracing::error!("Redis DEL failed for session {}: {}", id, e);
        })?;
        tracing::debug!("Redis DEL session {}", id);
        Ok(())
    }

    async fn close(&self) -> Result<(), StorageError> {
        // Dropping the last handle shuts the multiplexed connection down.
        if self.conn.write().await.take().is_some() {
            tracing::info!("Closed redis session store connection");
        }
        Ok(())
    }
}
