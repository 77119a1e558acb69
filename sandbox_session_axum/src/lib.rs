//! Axum integration for `sandbox-session`.
//!
//! Provides the [`Session`] extractor for cookie-based sessions, a
//! middleware adding default response headers and a tracing helper.

mod config;
mod error;
mod middleware;
mod router;
mod session;

pub use config::SessionCookieConfig;
pub use error::IntoResponseError;
pub use middleware::default_headers;
pub use router::with_http_trace;
pub use session::{CookieSessions, Session, SessionRejection};
