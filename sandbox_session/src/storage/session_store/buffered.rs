use std::io::Cursor;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::storage::errors::StorageError;

use super::traits::SessionStorage;

/// In-memory reader over a fully materialized session payload.
pub type SessionReader = Cursor<Vec<u8>>;

/// Byte-stream view over a [`SessionStorage`].
///
/// Middleware that speaks in readers and writers can use this decorator on
/// top of any string-keyed store. Both directions buffer the whole payload in
/// memory before handing it on: reads fetch the complete value before the
/// consumer sees a byte, writes drain the incoming stream to its end before
/// the store is called. Memory use therefore grows with the session size and
/// nothing bounds it; large payloads should not go through this path.
pub struct BufferedSessionStorage {
    inner: Arc<dyn SessionStorage>,
}

impl BufferedSessionStorage {
    pub fn new(inner: Arc<dyn SessionStorage>) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &Arc<dyn SessionStorage> {
        &self.inner
    }

    /// Fetch the payload for `id` as a reader.
    ///
    /// A missing session is `Ok(None)`; an existing but empty payload is
    /// `Ok(Some(reader))` yielding zero bytes.
    pub async fn read_stream(&self, id: &str) -> Result<Option<SessionReader>, StorageError> {
        let payload = self.inner.read(id).await?;
        Ok(payload.map(|p| Cursor::new(p.into_bytes())))
    }

    /// Drain `reader` and store the bytes as the payload for `id`.
    ///
    /// The bytes must be valid UTF-8.
    pub async fn write_stream<R>(&self, id: &str, mut reader: R) -> Result<(), StorageError>
    where
        R: AsyncRead + Unpin + Send,
    {
        let mut buf = Vec::new();
        let n = reader.read_to_end(&mut buf).await?;
        let payload = String::from_utf8(buf)?;
        tracing::debug!("Buffered {} bytes for session {}", n, id);
        self.inner.write(id, Some(&payload)).await
    }

    pub async fn invalidate(&self, id: &str) -> Result<(), StorageError> {
        self.inner.invalidate(id).await
    }
}
