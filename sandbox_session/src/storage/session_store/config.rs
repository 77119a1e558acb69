use std::sync::Arc;

use crate::config::{SessionStoreConfig, SessionStoreKind};
use crate::storage::errors::StorageError;

use super::memory::InMemorySessionStore;
use super::pooled::{PooledRedisSessionStore, RedisPool};
use super::redis::RedisSessionStore;
use super::traits::SessionStorage;

/// Build the bounded redis pool described by `config`.
///
/// No connection is opened here; connections are created on first checkout
/// and kept up to `pool_size`.
pub fn build_redis_pool(config: &SessionStoreConfig) -> Result<RedisPool, StorageError> {
    let client = redis::Client::open(config.url.as_str())?;
    let pool = r2d2::Pool::builder()
        .max_size(config.pool_size)
        .min_idle(Some(0))
        .connection_timeout(config.pool_timeout)
        // Checkout must not cost an extra round trip; broken connections are
        // dropped when they are returned instead.
        .test_on_check_out(false)
        .build_unchecked(client);
    Ok(pool)
}

/// Build the session store selected by `config` and verify it is reachable.
pub async fn build_session_store(
    config: &SessionStoreConfig,
) -> Result<Arc<dyn SessionStorage>, StorageError> {
    tracing::info!(
        "Initializing session store with type: {}, url: {}",
        config.kind,
        config.url
    );

    let store: Arc<dyn SessionStorage> = match config.kind {
        SessionStoreKind::Memory => Arc::new(InMemorySessionStore::new()),
        SessionStoreKind::Redis => Arc::new(RedisSessionStore::connect(&config.url).await?),
        SessionStoreKind::RedisPool => {
            Arc::new(PooledRedisSessionStore::new(build_redis_pool(config)?))
        }
    };

    store.init().await.inspect_err(|e| {
        tracing::error!("Failed to connect to session store: {}", e);
    })?;

    tracing::info!(
        "Connected to session store: type={}, url={}",
        config.kind,
        config.url
    );
    Ok(store)
}
