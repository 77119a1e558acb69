//! Configuration read once at startup and passed explicitly to the stores.

use std::{env, fmt, str::FromStr, time::Duration};

use crate::collection::CollectionError;
use crate::storage::StorageError;

const DEFAULT_SESSION_STORE_URL: &str = "redis://localhost:36379";
const DEFAULT_POOL_SIZE: u32 = 8;
const DEFAULT_POOL_TIMEOUT_SECS: u64 = 30;
const DEFAULT_DOCUMENT_STORE_URL: &str = "sqlite:sandbox.db";
const DEFAULT_TABLE_PREFIX: &str = "sandbox_";

/// Which session storage backend to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStoreKind {
    Memory,
    /// One persistent redis connection.
    Redis,
    /// Bounded pool of redis connections.
    RedisPool,
}

impl FromStr for SessionStoreKind {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "memory" => Ok(Self::Memory),
            "redis" => Ok(Self::Redis),
            "redis-pool" => Ok(Self::RedisPool),
            t => Err(StorageError::Config(format!(
                "Unsupported session store type: {t}. Supported types are 'memory', 'redis' and 'redis-pool'"
            ))),
        }
    }
}

impl fmt::Display for SessionStoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Memory => "memory",
            Self::Redis => "redis",
            Self::RedisPool => "redis-pool",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionStoreConfig {
    pub kind: SessionStoreKind,
    pub url: String,
    pub pool_size: u32,
    /// Longest a caller waits for a pooled connection.
    pub pool_timeout: Duration,
}

impl Default for SessionStoreConfig {
    fn default() -> Self {
        Self {
            kind: SessionStoreKind::RedisPool,
            url: DEFAULT_SESSION_STORE_URL.to_string(),
            pool_size: DEFAULT_POOL_SIZE,
            pool_timeout: Duration::from_secs(DEFAULT_POOL_TIMEOUT_SECS),
        }
    }
}

impl SessionStoreConfig {
    pub fn memory() -> Self {
        Self {
            kind: SessionStoreKind::Memory,
            ..Self::default()
        }
    }

    /// Pooled redis store at `host:port`.
    pub fn redis(host: &str, port: u16) -> Self {
        Self {
            kind: SessionStoreKind::RedisPool,
            url: format!("redis://{host}:{port}"),
            ..Self::default()
        }
    }

    /// Read `SESSION_STORE_TYPE`, `SESSION_STORE_URL`,
    /// `SESSION_STORE_POOL_SIZE` and `SESSION_STORE_POOL_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self, StorageError> {
        let defaults = Self::default();

        let kind = match env::var("SESSION_STORE_TYPE") {
            Ok(kind) => kind.parse()?,
            Err(_) => defaults.kind,
        };
        let url = env::var("SESSION_STORE_URL").unwrap_or(defaults.url);
        let pool_size = parse_env("SESSION_STORE_POOL_SIZE", defaults.pool_size)
            .map_err(StorageError::Config)?;
        if pool_size == 0 {
            return Err(StorageError::Config(
                "SESSION_STORE_POOL_SIZE must be at least 1".to_string(),
            ));
        }
        let pool_timeout = parse_env("SESSION_STORE_POOL_TIMEOUT_SECS", DEFAULT_POOL_TIMEOUT_SECS)
            .map(Duration::from_secs)
            .map_err(StorageError::Config)?;

        Ok(Self {
            kind,
            url,
            pool_size,
            pool_timeout,
        })
    }
}

/// Which SQL database backs the document collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentStoreKind {
    Sqlite,
    Postgres,
}

impl FromStr for DocumentStoreKind {
    type Err = CollectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sqlite" => Ok(Self::Sqlite),
            "postgres" => Ok(Self::Postgres),
            t => Err(CollectionError::Config(format!(
                "Unsupported document store type: {t}. Supported types are 'sqlite' and 'postgres'"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentStoreConfig {
    pub kind: DocumentStoreKind,
    pub url: String,
    pub table_prefix: String,
}

impl Default for DocumentStoreConfig {
    fn default() -> Self {
        Self {
            kind: DocumentStoreKind::Sqlite,
            url: DEFAULT_DOCUMENT_STORE_URL.to_string(),
            table_prefix: DEFAULT_TABLE_PREFIX.to_string(),
        }
    }
}

impl DocumentStoreConfig {
    /// Private in-memory SQLite database, mostly for tests.
    pub fn sqlite_memory() -> Self {
        Self {
            url: "sqlite::memory:".to_string(),
            ..Self::default()
        }
    }

    /// Read `DOCUMENT_STORE_TYPE`, `DOCUMENT_STORE_URL` and
    /// `DOCUMENT_TABLE_PREFIX`.
    pub fn from_env() -> Result<Self, CollectionError> {
        let defaults = Self::default();

        let kind = match env::var("DOCUMENT_STORE_TYPE") {
            Ok(kind) => kind.parse()?,
            Err(_) => defaults.kind,
        };

        Ok(Self {
            kind,
            url: env::var("DOCUMENT_STORE_URL").unwrap_or(defaults.url),
            table_prefix: env::var("DOCUMENT_TABLE_PREFIX").unwrap_or(defaults.table_prefix),
        })
    }
}

fn parse_env<T: FromStr>(key: &str, default: T) -> Result<T, String> {
    match env::var(key) {
        Ok(value) => value
            .parse()
            .map_err(|_| format!("{key} has an invalid value: {value}")),
        Err(_) => Ok(default),
    }
}
