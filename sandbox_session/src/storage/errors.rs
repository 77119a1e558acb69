use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum StorageError {
    /// Any failure reported by the backing key-value cache. Connection loss,
    /// timeouts and malformed replies are not told apart.
    #[error("Storage backend error: {0}")]
    Backend(String),

    #[error("Connection pool error: {0}")]
    Pool(String),

    #[error("Session payload is not valid UTF-8: {0}")]
    Encoding(String),

    #[error("I/O error while buffering session payload: {0}")]
    Io(String),

    #[error("Invalid storage configuration: {0}")]
    Config(String),
}

impl From<redis::RedisError> for StorageError {
    fn from(err: redis::RedisError) -> Self {
        Self::Backend(err.to_string())
    }
}

impl From<r2d2::Error> for StorageError {
    fn from(err: r2d2::Error) -> Self {
        Self::Pool(err.to_string())
    }
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<std::string::FromUtf8Error> for StorageError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        Self::Encoding(err.to_string())
    }
}

impl From<tokio::task::JoinError> for StorageError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Backend(format!("Blocking redis task failed: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_error_display() {
        // Given a StorageError with a Backend variant
        let error = StorageError::Backend("Connection failed".to_string());

        // When converting to a string
        let error_string = error.to_string();

        // Then it should format correctly
        assert_eq!(error_string, "Storage backend error: Connection failed");
    }

    #[test]
    fn test_from_redis_error() {
        // Given a RedisError
        let redis_error =
            redis::RedisError::from((redis::ErrorKind::IoError, "Connection refused"));

        // When converting to StorageError
        let storage_error = StorageError::from(redis_error);

        // Then it should be a Backend variant carrying the message
        match storage_error {
            StorageError::Backend(msg) => assert!(msg.contains("Connection refused")),
            other => panic!("Expected Backend variant, got {other:?}"),
        }
    }

    #[test]
    fn test_from_utf8_error() {
        let utf8_error = String::from_utf8(vec![0xff, 0xfe]).unwrap_err();

        let storage_error = StorageError::from(utf8_error);

        assert!(matches!(storage_error, StorageError::Encoding(_)));
    }

    #[test]
    fn test_from_io_error() {
        let io_error = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "stream closed");

        let storage_error = StorageError::from(io_error);

        match storage_error {
            StorageError::Io(msg) => assert!(msg.contains("stream closed")),
            other => panic!("Expected Io variant, got {other:?}"),
        }
    }

    #[test]
    fn test_error_is_sync_and_send() {
        fn assert_sync_send<T: Sync + Send>() {}
        assert_sync_send::<StorageError>();
    }
}
