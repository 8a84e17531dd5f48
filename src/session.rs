//! Opaque session tokens.
//!
//! A token is issued once, at registration, and handed to the client in a
//! cookie. Only its SHA-256 digest is persisted, so a leaked users table does
//! not leak live sessions.

use axum::http::{header, HeaderMap};
use chrono::{DateTime, TimeDelta, Utc};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::config::SessionConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn digest(&self) -> String {
        hash_token(&self.0)
    }
}

/// Lowercase hex SHA-256 of a raw token, as stored in `users.session_hash`
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// When a session issued at `now` stops being accepted.
///
/// None when the configured lifetime is not positive or does not fit in a
/// timestamp.
pub fn expires_at(config: &SessionConfig, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    if config.max_age_secs <= 0 {
        return None;
    }
    TimeDelta::try_seconds(config.max_age_secs).and_then(|age| now.checked_add_signed(age))
}

/// `Set-Cookie` value carrying a freshly issued token
pub fn session_cookie(config: &SessionConfig, token: &SessionToken) -> String {
    let mut cookie = format!(
        "{}={}; Path=/; Max-Age={}; HttpOnly; SameSite=Lax",
        config.cookie_name,
        token.as_str(),
        config.max_age_secs
    );
    if config.secure_cookie {
        cookie.push_str("; Secure");
    }
    cookie
}

/// First value of the named cookie across all `Cookie` headers
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
