use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::storage::errors::StorageError;

use super::traits::SessionStorage;

/// Session store that keeps payloads in process memory.
///
/// Entries live until they are invalidated, the store is closed or the
/// process exits. Like the redis stores, a closed store rejects every
/// further operation.
pub struct InMemorySessionStore {
    entries: RwLock<Option<HashMap<String, String>>>,
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self {
            entries: RwLock::new(Some(HashMap::new())),
        }
    }
}

fn closed() -> StorageError {
    StorageError::Backend("In-memory session store is closed".to_string())
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        tracing::info!("Creating new in-memory session store");
        Self::default()
    }

    /// Number of stored sessions. A closed store holds none.
    pub async fn len(&self) -> usize {
        self.entries.read().await.as_ref().map_or(0, HashMap::len)
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl SessionStorage for InMemorySessionStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn init(&self) -> Result<(), StorageError> {
        Ok(()) // Nothing to initialize for in-memory store
    }

    async fn read(&self, id: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries.read().await;
        let entries = entries.as_ref().ok_or_else(closed)?;
        Ok(entries.get(id).cloned())
    }

    async fn write(&self, id: &str, payload: Option<&str>) -> Result<(), StorageError> {
        let Some(payload) = payload else {
            return self.invalidate(id).await;
        };
        let mut entries = self.entries.write().await;
        entries
            .as_mut()
            .ok_or_else(closed)?
            .insert(id.to_string(), payload.to_string());
        Ok(())
    }

    async fn invalidate(&self, id: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.write().await;
        entries.as_mut().ok_or_else(closed)?.remove(id);
        Ok(())
    }

    async fn close(&self) -> Result<(), StorageError> {
        self.entries.write().await.take();
        tracing::info!("Closed in-memory session store");
        Ok(())
    }
}
