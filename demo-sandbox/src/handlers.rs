use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    middleware::from_fn,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};

use sandbox_session_axum::{IntoResponseError, Session, default_headers, with_http_trace};

use crate::state::AppState;
use crate::types::{Customer, Jedi, UserSession};

const JEDI_NAME: &str = "Luke Skywalker";

pub(crate) fn router(state: AppState) -> Router {
    with_http_trace(
        Router::new()
            .route("/", get(hello))
            .route("/customer", post(customer))
            .route("/login", get(login))
            .route("/session", get(session_info))
            .route("/logout", get(logout))
            .route("/random", get(random))
            .route("/mongo", get(find_jedi).post(insert_jedi))
            .layer(from_fn(default_headers))
            .with_state(state),
    )
}

async fn hello() -> &'static str {
    "Hello World!"
}

async fn customer() -> Json<Customer> {
    Json(Customer {
        id: 1,
        first_name: "Jet".to_string(),
        last_name: "Brains".to_string(),
    })
}

async fn login(mut session: Session<UserSession>) -> Result<Response, (StatusCode, String)> {
    let headers = session
        .set(UserSession {
            id: "123abc".to_string(),
            count: 0,
        })
        .await
        .into_response_error()?;
    Ok((headers, Redirect::to("/")).into_response())
}

async fn session_info(session: Session<UserSession>) -> Response {
    match session.into_inner() {
        Some(user_session) => Json(user_session).into_response(),
        None => StatusCode::GONE.into_response(),
    }
}

async fn logout(mut session: Session<UserSession>) -> Result<Response, (StatusCode, String)> {
    let headers = session.clear().await.into_response_error()?;
    Ok((headers, Redirect::to("/")).into_response())
}

async fn random(State(state): State<AppState>) -> Result<Json<i32>, (StatusCode, String)> {
    let bytes: [u8; 4] = ring::rand::generate(&state.rng)
        .map_err(|_| {
            tracing::error!("System random number generator failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to generate random number".to_string(),
            )
        })?
        .expose();
    Ok(Json(i32::from_be_bytes(bytes)))
}

async fn insert_jedi(State(state): State<AppState>) -> Result<StatusCode, (StatusCode, String)> {
    let id = state
        .jedi
        .insert_one(&Jedi {
            name: JEDI_NAME.to_string(),
            age: 19,
        })
        .await
        .into_response_error()?;
    tracing::debug!("Inserted jedi with id {}", id);
    Ok(StatusCode::OK)
}

async fn find_jedi(State(state): State<AppState>) -> Result<Response, (StatusCode, String)> {
    let jedi = state
        .jedi
        .find_one_by("name", JEDI_NAME)
        .await
        .into_response_error()?;
    Ok(match jedi {
        Some(jedi) => Json(jedi).into_response(),
        None => StatusCode::GONE.into_response(),
    })
}
