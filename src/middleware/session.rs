use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use uuid::Uuid;

use crate::app::AppState;
use crate::database::models::User;
use crate::database::UserRepository;
use crate::error::ApiError;
use crate::session;

/// Authenticated user resolved from the session cookie
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

impl From<User> for SessionUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
        }
    }
}

/// Rejects requests without a live session and injects [`SessionUser`] for handlers
pub async fn require_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let cookie_name = &state.config.session.cookie_name;

    let token = session::cookie_value(request.headers(), cookie_name).ok_or_else(|| {
        tracing::debug!("Request to {} without a {} cookie", request.uri().path(), cookie_name);
        ApiError::unauthorized("Unauthorized")
    })?;

    let user = state
        .store
        .find_user_by_session_hash(&session::hash_token(&token))
        .await?
        .ok_or_else(|| {
            tracing::warn!("Session lookup failed: unknown session token");
            ApiError::unauthorized("Unauthorized")
        })?;

    if user.session_expired(Utc::now()) {
        tracing::warn!("Session for user {} expired at {}", user.id, user.session_expires_at);
        return Err(ApiError::unauthorized("Session expired"));
    }

    tracing::debug!("Session resolved to user {} ({})", user.id, user.email);
    request.extensions_mut().insert(SessionUser::from(user));

    Ok(next.run(request).await)
}
