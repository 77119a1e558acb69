mod errors;
mod session_store;

pub use errors::StorageError;
pub use session_store::{
    BufferedSessionStorage, InMemorySessionStore, PoolStatus, PooledRedisSessionStore, RedisPool,
    RedisSessionStore, SessionReader, SessionStorage, build_redis_pool, build_session_store,
};
