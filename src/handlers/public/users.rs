// handlers/public/users.rs - POST /users

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json},
};
use chrono::Utc;
use serde_json::Value;
use uuid::Uuid;

use crate::app::AppState;
use crate::database::models::User;
use crate::database::{DatabaseError, UserRepository};
use crate::error::{ApiError, ApiResult};
use crate::session::{self, SessionToken};
use crate::validation;

/// POST /users - Register a user and open their session
///
/// Body: `{ "name": string, "email": string }`. Responds 201 with an empty
/// body and a `Set-Cookie` carrying a freshly issued session token.
pub async fn register_post(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(body) = payload?;
    let new_user = validation::parse_new_user(&body)?;

    if state.store.find_user_by_email(&new_user.email).await?.is_some() {
        tracing::info!("Registration rejected: {} is already registered", new_user.email);
        return Err(ApiError::bad_request("User already exists"));
    }

    let session_config = &state.config.session;
    let token = SessionToken::generate();
    let now = Utc::now();
    let expires_at = session::expires_at(session_config, now).ok_or_else(|| {
        tracing::error!("Cannot issue a session with max age {}s", session_config.max_age_secs);
        ApiError::internal_server_error("Unable to open a session")
    })?;

    let user = User {
        id: Uuid::new_v4(),
        name: new_user.name,
        email: new_user.email,
        session_hash: token.digest(),
        session_expires_at: expires_at,
        created_at: now,
    };

    match state.store.insert_user(&user).await {
        Ok(()) => {}
        // Lost a race against a concurrent registration for the same email
        Err(DatabaseError::UniqueViolation(_)) => {
            return Err(ApiError::bad_request("User already exists"));
        }
        Err(e) => return Err(e.into()),
    }

    tracing::info!("Registered user {} ({})", user.id, user.email);

    Ok((
        StatusCode::CREATED,
        [(header::SET_COOKIE, session::session_cookie(session_config, &token))],
    ))
}
