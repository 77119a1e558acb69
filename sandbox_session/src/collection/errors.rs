use thiserror::Error;

#[derive(Clone, Error, Debug)]
pub enum CollectionError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Document serialization error: {0}")]
    Serde(String),

    #[error("Invalid name: {0}")]
    InvalidName(String),

    #[error("Invalid document store configuration: {0}")]
    Config(String),
}

impl From<serde_json::Error> for CollectionError {
    fn from(err: serde_json::Error) -> Self {
        CollectionError::Serde(err.to_string())
    }
}

impl From<sqlx::Error> for CollectionError {
    fn from(err: sqlx::Error) -> Self {
        CollectionError::Storage(err.to_string())
    }
}
