use async_trait::async_trait;
use redis::Commands;
use tokio::sync::RwLock;

use crate::storage::errors::StorageError;

use super::traits::SessionStorage;

/// Bounded pool of blocking redis connections.
pub type RedisPool = r2d2::Pool<redis::Client>;

/// Snapshot of the pool occupancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStatus {
    pub max_size: u32,
    pub connections: u32,
    pub idle_connections: u32,
}

/// Session store backed by a bounded redis connection pool.
///
/// Each operation checks one connection out of the pool, issues a single
/// command and hands the connection back when the checkout guard goes out of
/// scope, including when the command fails. Broken connections are discarded
/// by the pool instead of being reused. When every connection is in use the
/// caller waits for one to be returned, up to the pool's checkout timeout.
///
/// The pool is built once at startup (see
/// [`build_redis_pool`](crate::build_redis_pool)) and injected here.
pub struct PooledRedisSessionStore {
    pool: RwLock<Option<RedisPool>>,
}

impl PooledRedisSessionStore {
    pub fn new(pool: RedisPool) -> Self {
        tracing::info!(
            "Creating pooled redis session store: max_size={}",
            pool.max_size()
        );
        Self {
            pool: RwLock::new(Some(pool)),
        }
    }

    pub async fn status(&self) -> Option<PoolStatus> {
        self.pool.read().await.as_ref().map(|pool| {
            let state = pool.state();
            PoolStatus {
                max_size: pool.max_size(),
                connections: state.connections,
                idle_connections: state.idle_connections,
            }
        })
    }

    async fn pool(&self) -> Result<RedisPool, StorageError> {
        self.pool
            .read()
            .await
            .clone()
            .ok_or_else(|| StorageError::Pool("Connection pool is closed".to_string()))
    }

    /// Run one blocking command on a pooled connection.
    async fn with_connection<T, F>(&self, command: &'static str, f: F) -> Result<T, StorageError>
    where
        T: Send + 'static,
        F: FnOnce(&mut redis::Connection) -> redis::RedisResult<T> + Send + 'static,
    {
        let pool = self.pool().await?;
        let result = tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;
            f(&mut conn).map_err(StorageError::from)
        })
        .await?;

        if let Err(e) = &result {
            tracing::error!("Pooled redis {} failed: {}", command, e);
        }
        result
    }
}

#[async_trait]
impl SessionStorage for PooledRedisSessionStore {
    fn backend(&self) -> &'static str {
        "redis-pool"
    }

    async fn init(&self) -> Result<(), StorageError> {
        self.with_connection("PING", |conn| -> redis::RedisResult<String> {
            redis::cmd("PING").query(conn)
        })
        .await?;
        Ok(())
    }

    async fn read(&self, id: &str) -> Result<Option<String>, StorageError> {
        let key = id.to_string();
        let value = self
            .with_connection("GET", move |conn| -> redis::RedisResult<Option<String>> {
                conn.get(&key)
            })
            .await?;
        tracing::debug!(found = value.is_some(), "Pooled redis GET session {}", id);
        Ok(value)
    }

    async fn write(&self, id: &str, payload: Option<&str>) -> Result<(), StorageError> {
        let Some(payload) = payload else {
            return self.invalidate(id).await;
        };
        let key = id.to_string();
        let value = payload.to_string();
        self.with_connection("SET", move |conn| -> redis::RedisResult<()> {
            conn.set(&key, &value)
        })
        .await?;
        tracing::debug!("Pooled redis SET session {}", id);
        Ok(())
    }

    async fn invalidate(&self, id: &str) -> Result<(), StorageError> {
        let key = id.to_string();
        self.with_connection("DEL", move |conn| -> redis::RedisResult<()> { conn.del(&key) })
            .await?;
        tracing::debug!("Pooled redis DEL session {}", id);
        Ok(())
    }

    async fn close(&self) -> Result<(), StorageError> {
        // Checkouts already in flight keep their own handle on the pool and
        // finish normally; the connections close once the last handle drops.
        if let Some(pool) = self.pool.write().await.take() {
            tracing::info!(
                "Closing redis session pool: connections={}",
                pool.state().connections
            );
        }
        Ok(())
    }
}
