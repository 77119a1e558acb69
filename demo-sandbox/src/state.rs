use axum::extract::FromRef;
use ring::rand::SystemRandom;
use std::sync::Arc;

use sandbox_session::{
    DocumentCollection, DocumentPool, DocumentStoreConfig, SessionManager, SessionStorage,
    SessionStoreConfig, build_session_store,
};
use sandbox_session_axum::{CookieSessions, SessionCookieConfig};

use crate::types::{Jedi, UserSession};

const JEDI_COLLECTION: &str = "jedi";

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) sessions: CookieSessions<UserSession>,
    pub(crate) jedi: DocumentCollection<Jedi>,
    pub(crate) documents: DocumentPool,
    pub(crate) rng: SystemRandom,
}

impl FromRef<AppState> for CookieSessions<UserSession> {
    fn from_ref(state: &AppState) -> Self {
        state.sessions.clone()
    }
}

impl AppState {
    /// Wire the application onto an already built session store.
    pub(crate) async fn new(
        store: Arc<dyn SessionStorage>,
        cookie: SessionCookieConfig,
        documents: &DocumentStoreConfig,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let pool = DocumentPool::connect(documents)?;
        let jedi = DocumentCollection::new(pool.clone(), &documents.table_prefix, JEDI_COLLECTION)?;
        jedi.init().await?;

        Ok(Self {
            sessions: CookieSessions::new(SessionManager::json(store), cookie),
            jedi,
            documents: pool,
            rng: SystemRandom::new(),
        })
    }

    pub(crate) async fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        let store = build_session_store(&SessionStoreConfig::from_env()?).await?;
        Self::new(
            store,
            SessionCookieConfig::from_env(),
            &DocumentStoreConfig::from_env()?,
        )
        .await
    }

    /// Release the session store and the document pool.
    pub(crate) async fn close(&self) {
        if let Err(e) = self.sessions.manager().storage().close().await {
            tracing::error!("Failed to close session store: {}", e);
        }
        self.documents.close().await;
        tracing::info!("Closed session store and document pool");
    }
}
