use axum::{
    extract::{FromRef, FromRequestParts},
    response::{IntoResponse, Response},
};
use axum_extra::{TypedHeader, headers};
use http::{HeaderMap, StatusCode, request::Parts};
use serde::{Serialize, de::DeserializeOwned};

use sandbox_session::{CookieAttributes, SessionError, SessionManager, header_set_cookie};

use super::config::SessionCookieConfig;

/// Cookie sessions holding values of type `T`.
///
/// Put this into the router state (directly or through [`FromRef`]) to make
/// the [`Session`] extractor available to handlers.
pub struct CookieSessions<T> {
    manager: SessionManager<T>,
    cookie: SessionCookieConfig,
}

impl<T> Clone for CookieSessions<T> {
    fn clone(&self) -> Self {
        Self {
            manager: self.manager.clone(),
            cookie: self.cookie.clone(),
        }
    }
}

impl<T> CookieSessions<T> {
    pub fn new(manager: SessionManager<T>, cookie: SessionCookieConfig) -> Self {
        Self { manager, cookie }
    }

    pub fn manager(&self) -> &SessionManager<T> {
        &self.manager
    }

    pub fn cookie(&self) -> &SessionCookieConfig {
        &self.cookie
    }
}

/// Rejection returned when the session store cannot be reached.
#[derive(Debug)]
pub struct SessionRejection(pub SessionError);

impl IntoResponse for SessionRejection {
    fn into_response(self) -> Response {
        tracing::error!("Session lookup failed: {}", self.0);
        (StatusCode::INTERNAL_SERVER_ERROR, self.0.to_string()).into_response()
    }
}

/// The current request's session, as an Axum extractor.
///
/// Extraction never fails for a missing, expired or unreadable session; those
/// all show up as `get() == None`. Only a failing session store rejects the
/// request.
///
/// # Example
///
/// ```no_run
/// use axum::{Json, http::StatusCode, response::IntoResponse};
/// use sandbox_session_axum::Session;
///
/// # #[derive(serde::Serialize, serde::Deserialize, Clone)]
/// # struct UserSession { id: String, count: i32 }
/// async fn show(session: Session<UserSession>) -> impl IntoResponse {
///     match session.into_inner() {
///         Some(s) => Json(s).into_response(),
///         None => StatusCode::GONE.into_response(),
///     }
/// }
/// ```
pub struct Session<T> {
    id: Option<String>,
    /// Id the request's cookie named, even when nothing usable was stored
    /// under it.
    cookie_id: Option<String>,
    data: Option<T>,
    sessions: CookieSessions<T>,
}

impl<T> Session<T>
where
    T: Serialize + DeserializeOwned + Send + Sync + 'static,
{
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn get(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn into_inner(self) -> Option<T> {
        self.data
    }

    /// Store `value` as the session and return the `Set-Cookie` headers for
    /// the response.
    pub async fn set(&mut self, value: T) -> Result<HeaderMap, SessionError> {
        let id = self
            .sessions
            .manager
            .save(self.id.as_deref(), &value)
            .await?;
        self.discard_cookie_entry(Some(&id)).await?;

        let mut headers = HeaderMap::new();
        header_set_cookie(
            &mut headers,
            &self.sessions.cookie.name,
            &id,
            &CookieAttributes {
                max_age: self.sessions.cookie.max_age,
                secure: self.sessions.cookie.secure,
            },
        )?;

        self.id = Some(id);
        self.data = Some(value);
        Ok(headers)
    }

    /// Delete the session from the store and return headers that expire the
    /// cookie.
    pub async fn clear(&mut self) -> Result<HeaderMap, SessionError> {
        let id = self.id.take();
        if let Some(id) = &id {
            self.sessions.manager.clear(id).await?;
        }
        self.discard_cookie_entry(id.as_deref()).await?;
        self.data = None;

        let mut headers = HeaderMap::new();
        header_set_cookie(
            &mut headers,
            &self.sessions.cookie.name,
            "",
            &CookieAttributes {
                max_age: 0,
                secure: self.sessions.cookie.secure,
            },
        )?;
        Ok(headers)
    }

    /// Delete whatever is stored under the cookie's id unless it is `keep`.
    /// Unreadable payloads would otherwise stay in the store once the client
    /// moves on to another id or logs out.
    async fn discard_cookie_entry(&mut self, keep: Option<&str>) -> Result<(), SessionError> {
        let stale = self
            .cookie_id
            .take()
            .filter(|cookie_id| keep != Some(cookie_id.as_str()));
        if let Some(cookie_id) = stale {
            self.sessions.manager.clear(&cookie_id).await?;
        }
        Ok(())
    }
}

impl<S, T> FromRequestParts<S> for Session<T>
where
    CookieSessions<T>: FromRef<S>,
    S: Send + Sync,
    T: Serialize + DeserializeOwned + Send + Sync + 'static,
{
    type Rejection = SessionRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let sessions = CookieSessions::<T>::from_ref(state);

        let cookie_id = TypedHeader::<headers::Cookie>::from_request_parts(parts, state)
            .await
            .ok()
            .and_then(|TypedHeader(cookies)| {
                cookies.get(sessions.cookie.name.as_str()).map(str::to_string)
            })
            .filter(|id| !id.is_empty());

        let Some(id) = cookie_id else {
            tracing::debug!("No session cookie '{}' found", sessions.cookie.name);
            return Ok(Self {
                id: None,
                cookie_id: None,
                data: None,
                sessions,
            });
        };

        let data = sessions.manager.load(&id).await.map_err(SessionRejection)?;

        // A cookie whose session is gone is not reused for the next session,
        // so a client cannot choose its own session id.
        let session_id = if data.is_some() {
            Some(id.clone())
        } else {
            tracing::warn!("Ignoring session cookie with no usable stored session");
            None
        };

        Ok(Self {
            id: session_id,
            cookie_id: Some(id),
            data,
            sessions,
        })
    }
}
