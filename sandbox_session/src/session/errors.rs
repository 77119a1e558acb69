use thiserror::Error;

use crate::storage::StorageError;
use crate::utils::UtilError;

#[derive(Debug, Error, Clone)]
pub enum SessionError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Session serialization error: {0}")]
    Serde(String),

    /// Error from utils operations
    #[error("Utils error: {0}")]
    Utils(#[from] UtilError),
}

impl From<serde_json::Error> for SessionError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_error_converts() {
        // Given a backend failure from the store
        let storage_error = StorageError::Backend("Connection refused".to_string());

        // When converting into a SessionError
        let session_error = SessionError::from(storage_error);

        // Then the message keeps the backend detail
        assert_eq!(
            session_error.to_string(),
            "Storage error: Storage backend error: Connection refused"
        );
    }

    #[test]
    fn test_serde_error_converts() {
        let serde_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();

        let session_error = SessionError::from(serde_error);

        assert!(matches!(session_error, SessionError::Serde(_)));
    }
}
