use async_trait::async_trait;

use crate::storage::errors::StorageError;

/// String-keyed session storage.
///
/// Maps an opaque session identifier to an opaque serialized payload. The
/// store never inspects either value. Every operation is a single
/// request/response exchange with the backend; there are no retries and no
/// timeouts.
///
/// Implementations are shared between concurrently running requests, so all
/// operations take `&self`.
#[async_trait]
pub trait SessionStorage: Send + Sync + 'static {
    /// Short backend name used in log lines.
    fn backend(&self) -> &'static str;

    /// Verify that the backend is reachable. Called once at startup.
    async fn init(&self) -> Result<(), StorageError>;

    /// Look up the payload stored under `id`.
    ///
    /// A missing session is `Ok(None)`, never an error.
    async fn read(&self, id: &str) -> Result<Option<String>, StorageError>;

    /// Store `payload` under `id`, overwriting any previous value.
    ///
    /// `None` invalidates the session instead of storing an empty value.
    async fn write(&self, id: &str, payload: Option<&str>) -> Result<(), StorageError>;

    /// Delete the entry for `id`. Deleting a missing entry is a no-op.
    async fn invalidate(&self, id: &str) -> Result<(), StorageError>;

    /// Release the resources held by the store. Every operation on a closed
    /// store fails.
    async fn close(&self) -> Result<(), StorageError> {
        Ok(())
    }
}
