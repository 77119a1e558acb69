use serde::{Serialize, de::DeserializeOwned};
use std::sync::Arc;

use crate::session::errors::SessionError;
use crate::session::serializer::{JsonSessionSerializer, SessionSerializer};
use crate::storage::SessionStorage;
use crate::utils::gen_random_string;

const SESSION_ID_BYTES: usize = 32;

/// Typed sessions on top of a [`SessionStorage`].
///
/// Session ids are generated here and handed to the store unmodified.
pub struct SessionManager<T> {
    storage: Arc<dyn SessionStorage>,
    serializer: Arc<dyn SessionSerializer<T>>,
}

impl<T> Clone for SessionManager<T> {
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
            serializer: Arc::clone(&self.serializer),
        }
    }
}

impl<T> SessionManager<T>
where
    T: Serialize + DeserializeOwned + Send + Sync + 'static,
{
    /// Session manager storing JSON payloads.
    pub fn json(storage: Arc<dyn SessionStorage>) -> Self {
        Self::new(storage, Arc::new(JsonSessionSerializer::<T>::new()))
    }
}

impl<T: 'static> SessionManager<T> {
    pub fn new(
        storage: Arc<dyn SessionStorage>,
        serializer: Arc<dyn SessionSerializer<T>>,
    ) -> Self {
        Self {
            storage,
            serializer,
        }
    }

    pub fn storage(&self) -> &Arc<dyn SessionStorage> {
        &self.storage
    }

    /// Load the session stored under `id`.
    ///
    /// Returns `Ok(None)` when nothing is stored and also when the stored
    /// payload no longer deserializes into `T`; callers decide whether a
    /// missing session is fatal.
    #[tracing::instrument(skip(self))]
    pub async fn load(&self, id: &str) -> Result<Option<T>, SessionError> {
        let Some(payload) = self.storage.read(id).await? else {
            tracing::debug!("No session stored for id");
            return Ok(None);
        };

        match self.serializer.deserialize(&payload) {
            Ok(session) => Ok(Some(session)),
            Err(e) => {
                tracing::warn!("Discarding unreadable session payload: {}", e);
                Ok(None)
            }
        }
    }

    /// Store `session` and return the id it is stored under.
    ///
    /// An id the client already holds is reused; otherwise a fresh random id
    /// is generated.
    #[tracing::instrument(skip(self, session))]
    pub async fn save(&self, id: Option<&str>, session: &T) -> Result<String, SessionError> {
        let id = match id {
            Some(id) => id.to_string(),
            None => gen_random_string(SESSION_ID_BYTES)?,
        };
        let payload = self.serializer.serialize(session)?;
        self.storage.write(&id, Some(&payload)).await?;
        tracing::debug!(backend = self.storage.backend(), "Saved session");
        Ok(id)
    }

    /// Remove the session stored under `id`, if any.
    #[tracing::instrument(skip(self))]
    pub async fn clear(&self, id: &str) -> Result<(), SessionError> {
        self.storage.write(id, None).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemorySessionStore;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct UserSession {
        id: String,
        count: i32,
    }

    fn manager() -> (Arc<InMemorySessionStore>, SessionManager<UserSession>) {
        let store = Arc::new(InMemorySessionStore::new());
        let manager = SessionManager::json(store.clone());
        (store, manager)
    }

    fn user_session(count: i32) -> UserSession {
        UserSession {
            id: "123abc".to_string(),
            count,
        }
    }

    #[tokio::test]
    async fn test_save_generates_id_and_stores_json() {
        // Given a manager over an empty store
        let (store, manager) = manager();

        // When saving a session without an existing id
        let id = manager.save(None, &user_session(0)).await.unwrap();

        // Then a fresh id is generated and the JSON payload is stored under it
        assert_eq!(id.len(), 43);
        assert_eq!(
            store.read(&id).await.unwrap().as_deref(),
            Some("{\"id\":\"123abc\",\"count\":0}")
        );
    }

    #[tokio::test]
    async fn test_save_reuses_existing_id() {
        let (store, manager) = manager();

        let id = manager
            .save(Some("session-1"), &user_session(1))
            .await
            .unwrap();

        assert_eq!(id, "session-1");
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_load_round_trip() {
        let (_, manager) = manager();
        let id = manager.save(None, &user_session(5)).await.unwrap();

        let loaded = manager.load(&id).await.unwrap();

        assert_eq!(loaded, Some(user_session(5)));
    }

    #[tokio::test]
    async fn test_load_missing_is_none() {
        let (_, manager) = manager();

        let loaded = manager.load("unknown").await.unwrap();

        assert_eq!(loaded, None);
    }

    #[tokio::test]
    async fn test_load_unreadable_payload_is_none() {
        // Given a payload that is not a UserSession
        let (store, manager) = manager();
        store.write("session-1", Some("not json")).await.unwrap();

        // When loading it
        let loaded = manager.load("session-1").await.unwrap();

        // Then it is treated as no session, and the payload is left alone
        assert_eq!(loaded, None);
        assert!(store.read("session-1").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_clear_removes_session() {
        let (store, manager) = manager();
        let id = manager.save(None, &user_session(0)).await.unwrap();

        manager.clear(&id).await.unwrap();

        assert_eq!(manager.load(&id).await.unwrap(), None);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_clear_missing_is_ok() {
        let (_, manager) = manager();

        assert!(manager.clear("never-saved").await.is_ok());
    }
}
