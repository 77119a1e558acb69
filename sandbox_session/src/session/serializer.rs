use serde::{Serialize, de::DeserializeOwned};
use std::marker::PhantomData;

use crate::session::errors::SessionError;

/// Converts a typed session value to and from the opaque payload kept by the
/// session store.
pub trait SessionSerializer<T>: Send + Sync + 'static {
    fn serialize(&self, session: &T) -> Result<String, SessionError>;

    fn deserialize(&self, text: &str) -> Result<T, SessionError>;
}

/// JSON session payloads via `serde_json`.
pub struct JsonSessionSerializer<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonSessionSerializer<T> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for JsonSessionSerializer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SessionSerializer<T> for JsonSessionSerializer<T>
where
    T: Serialize + DeserializeOwned + 'static,
{
    fn serialize(&self, session: &T) -> Result<String, SessionError> {
        Ok(serde_json::to_string(session)?)
    }

    fn deserialize(&self, text: &str) -> Result<T, SessionError> {
        Ok(serde_json::from_str(text)?)
    }
}
