mod errors;
mod manager;
mod serializer;

pub use errors::SessionError;
pub use manager::SessionManager;
pub use serializer::{JsonSessionSerializer, SessionSerializer};
