//! Session store — maps a browser session cookie to the active profile id.
//!
//! Only the identifier lives in the session. Profile fields are always
//! re-read from the profile store.

use async_trait::async_trait;
use axum::http::{header, HeaderMap, HeaderValue};
use redis::AsyncCommands;
use tracing::debug;
use uuid::Uuid;

use crate::errors::AppError;

pub const SESSION_COOKIE: &str = "melodex_sid";
const KEY_PREFIX: &str = "melodex:session:";

#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn active_profile(&self, session_id: &str) -> Result<Option<Uuid>, AppError>;

    async fn set_active_profile(&self, session_id: &str, profile_id: Uuid)
        -> Result<(), AppError>;
}

pub struct RedisSessionStore {
    client: redis::Client,
    ttl_secs: u64,
}

impl RedisSessionStore {
    pub fn new(client: redis::Client, ttl_secs: u64) -> Self {
        Self { client, ttl_secs }
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn active_profile(&self, session_id: &str) -> Result<Option<Uuid>, AppError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let raw: Option<String> = conn.get(format!("{KEY_PREFIX}{session_id}")).await?;

        // A corrupted entry reads as "no active profile".
        Ok(raw.and_then(|s| Uuid::parse_str(&s).ok()))
    }

    async fn set_active_profile(
        &self,
        session_id: &str,
        profile_id: Uuid,
    ) -> Result<(), AppError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        conn.set_ex::<_, _, ()>(
            format!("{KEY_PREFIX}{session_id}"),
            profile_id.to_string(),
            self.ttl_secs,
        )
        .await?;

        debug!("Session {session_id} now points at profile {profile_id}");
        Ok(())
    }
}

/// Reads the session id from the request's `Cookie` headers.
pub fn session_id_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Builds the `Set-Cookie` value for a session id.
pub fn session_cookie(session_id: &str, ttl_secs: u64) -> Result<HeaderValue, AppError> {
    HeaderValue::from_str(&format!(
        "{SESSION_COOKIE}={session_id}; Path=/; HttpOnly; SameSite=Lax; Max-Age={ttl_secs}"
    ))
    .map_err(|e| AppError::Internal(anyhow::anyhow!("invalid session cookie: {e}")))
}
