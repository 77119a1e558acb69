//! sandbox-session - session storage and document collections for the sandbox app
//!
//! The core of this crate is [`SessionStorage`], a string-keyed store for
//! opaque session payloads with three backends:
//!
//! - [`InMemorySessionStore`] keeps sessions in process memory
//! - [`RedisSessionStore`] holds a single persistent redis connection
//! - [`PooledRedisSessionStore`] checks connections out of a bounded pool
//!
//! The backend is picked from an explicit [`SessionStoreConfig`] with
//! [`build_session_store`]. [`SessionManager`] layers typed, JSON-serialized
//! sessions on top, and [`BufferedSessionStorage`] exposes the same store
//! through readers and writers.
//!
//! [`DocumentCollection`] stores JSON documents in SQLite or Postgres.

mod collection;
mod config;
mod session;
mod storage;
mod utils;

pub use config::{DocumentStoreConfig, DocumentStoreKind, SessionStoreConfig, SessionStoreKind};

pub use storage::{
    BufferedSessionStorage, InMemorySessionStore, PoolStatus, PooledRedisSessionStore, RedisPool,
    RedisSessionStore, SessionReader, SessionStorage, StorageError, build_redis_pool,
    build_session_store,
};

pub use session::{JsonSessionSerializer, SessionError, SessionManager, SessionSerializer};

pub use collection::{CollectionError, DocumentCollection, DocumentPool};

pub use utils::{CookieAttributes, UtilError, gen_random_string, header_set_cookie};
