mod buffered;
mod config;
mod memory;
mod pooled;
mod redis;
mod traits;

pub use buffered::{BufferedSessionStorage, SessionReader};
pub use config::{build_redis_pool, build_session_store};
pub use memory::InMemorySessionStore;
pub use pooled::{PoolStatus, PooledRedisSessionStore, RedisPool};
pub use redis::RedisSessionStore;
pub use traits::SessionStorage;
