use axum::{extract::Request, middleware::Next, response::Response};
use chrono::Utc;
use http::header::{DATE, HeaderValue, SERVER};

const SERVER_NAME: &str = concat!("sandbox-session/", env!("CARGO_PKG_VERSION"));

/// Adds `Server` and `Date` to every response that does not already carry
/// them.
///
/// Use with `axum::middleware::from_fn(default_headers)`.
pub async fn default_headers(req: Request, next: Next) -> Response {
    let mut response = next.run(req).await;
    let headers = response.headers_mut();

    if !headers.contains_key(SERVER) {
        headers.insert(SERVER, HeaderValue::from_static(SERVER_NAME));
    }

    if !headers.contains_key(DATE) {
        // IMF-fixdate, as HTTP requires
        let now = Utc::now().format("%a, %d %b %Y %H:%M:%S GMT").to_string();
        match HeaderValue::from_str(&now) {
            Ok(value) => {
                headers.insert(DATE, value);
            }
            Err(e) => tracing::error!("Failed to build Date header: {}", e),
        }
    }

    response
}
