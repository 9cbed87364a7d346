//! Server-side admin sessions.
//!
//! The browser holds only an opaque token, signed with the configured secret
//! and carried in an HTTP-only cookie. The identity itself lives in a
//! [`SessionStore`]: a moka cache for tests and single instances, or the
//! `admin_sessions` table in production.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::http::{HeaderMap, HeaderValue, header};
use chrono::{TimeDelta, Utc};
use hmac::{Hmac, Mac};
use moka::future::Cache;
use rand::RngCore;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use utoipa::ToSchema;

use crate::config::{Config, SessionBackend};
use crate::entity::admin_sessions;
use crate::error::{AppError, AppResult};

pub const SESSION_COOKIE: &str = "geo5lux.sid";

type HmacSha256 = Hmac<Sha256>;

/// What a logged-in session remembers about the admin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AdminIdentity {
    pub id: i32,
    pub username: String,
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn load(&self, token: &str) -> AppResult<Option<AdminIdentity>>;
    async fn store(&self, token: &str, identity: &AdminIdentity) -> AppResult<()>;
    async fn destroy(&self, token: &str) -> AppResult<()>;
}

/// Process-local store; entries expire after the session TTL.
pub struct MemorySessionStore {
    sessions: Cache<String, AdminIdentity>,
}

impl MemorySessionStore {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: Cache::builder().time_to_live(ttl).build(),
        }
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self, token: &str) -> AppResult<Option<AdminIdentity>> {
        Ok(self.sessions.get(token).await)
    }

    async fn store(&self, token: &str, identity: &AdminIdentity) -> AppResult<()> {
        self.sessions
            .insert(token.to_string(), identity.clone())
            .await;
        Ok(())
    }

    async fn destroy(&self, token: &str) -> AppResult<()> {
        self.sessions.invalidate(token).await;
        Ok(())
    }
}

/// Sessions persisted in `admin_sessions`, surviving restarts and shared
/// between instances.
pub struct DatabaseSessionStore {
    db: DatabaseConnection,
    ttl: TimeDelta,
}

impl DatabaseSessionStore {
    #[must_use]
    pub fn new(db: DatabaseConnection, ttl: Duration) -> Self {
        Self {
            db,
            ttl: TimeDelta::from_std(ttl).unwrap_or(TimeDelta::days(1)),
        }
    }

    /// Delete every expired row.
    pub async fn purge_expired(&self) -> AppResult<u64> {
        let now = Utc::now().naive_utc();
        let result = admin_sessions::Entity::delete_many()
            .filter(admin_sessions::Column::ExpiryDate.lte(now))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected)
    }
}

#[async_trait]
impl SessionStore for DatabaseSessionStore {
    async fn load(&self, token: &str) -> AppResult<Option<AdminIdentity>> {
        let now = Utc::now().naive_utc();
        let Some(row) = admin_sessions::Entity::find_by_id(token.to_string())
            .filter(admin_sessions::Column::ExpiryDate.gt(now))
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };

        serde_json::from_str(&row.data)
            .map(Some)
            .map_err(|e| AppError::Internal(format!("corrupt session {token}: {e}")))
    }

    async fn store(&self, token: &str, identity: &AdminIdentity) -> AppResult<()> {
        let purged = self.purge_expired().await?;
        if purged > 0 {
            tracing::debug!(purged, "Expired admin sessions removed");
        }

        let data =
            serde_json::to_string(identity).map_err(|e| AppError::Internal(e.to_string()))?;
        admin_sessions::ActiveModel {
            token: Set(token.to_string()),
            data: Set(data),
            expiry_date: Set(Utc::now().naive_utc() + self.ttl),
        }
        .insert(&self.db)
        .await?;
        Ok(())
    }

    async fn destroy(&self, token: &str) -> AppResult<()> {
        admin_sessions::Entity::delete_by_id(token.to_string())
            .exec(&self.db)
            .await?;
        Ok(())
    }
}

/// Issues, resolves and ends admin sessions on top of a [`SessionStore`].
#[derive(Clone)]
pub struct SessionManager {
    store: Arc<dyn SessionStore>,
    secret: Arc<[u8]>,
    ttl: Duration,
    secure_cookie: bool,
}

impl SessionManager {
    pub fn new(
        store: Arc<dyn SessionStore>,
        secret: &str,
        ttl: Duration,
        secure_cookie: bool,
    ) -> Self {
        Self {
            store,
            secret: Arc::from(secret.as_bytes()),
            ttl,
            secure_cookie,
        }
    }

    /// Pick the store named by the configuration.
    #[must_use]
    pub fn from_config(config: &Config, db: DatabaseConnection) -> Self {
        let ttl = Duration::from_secs(config.session_ttl_seconds);
        let store: Arc<dyn SessionStore> = match config.session_backend {
            SessionBackend::Memory => Arc::new(MemorySessionStore::new(ttl)),
            SessionBackend::Database => Arc::new(DatabaseSessionStore::new(db, ttl)),
        };
        Self::new(
            store,
            &config.session_secret,
            ttl,
            config.session_cookie_secure,
        )
    }

    /// Store a fresh session and return the `Set-Cookie` value for it.
    pub async fn start(&self, identity: &AdminIdentity) -> AppResult<HeaderValue> {
        let token = new_token();
        self.store.store(&token, identity).await?;
        let signed = format!("{token}.{}", self.sign(&token)?);
        self.cookie(&signed, self.ttl.as_secs())
    }

    /// Identity behind the request's session cookie, if it is valid and live.
    pub async fn current(&self, headers: &HeaderMap) -> AppResult<Option<AdminIdentity>> {
        match self.token_from(headers) {
            Some(token) => self.store.load(&token).await,
            None => Ok(None),
        }
    }

    /// Destroy the request's session (if any) and return a clearing cookie.
    /// A store failure is logged; the cookie is cleared regardless.
    pub async fn end(&self, headers: &HeaderMap) -> AppResult<HeaderValue> {
        if let Some(token) = self.token_from(headers) {
            match self.store.destroy(&token).await {
                Ok(()) => tracing::debug!("Admin session destroyed"),
                Err(e) => tracing::warn!(error = %e, "Failed to destroy admin session"),
            }
        }
        self.cookie("", 0)
    }

    fn token_from(&self, headers: &HeaderMap) -> Option<String> {
        let raw = cookie_value(headers, SESSION_COOKIE)?;
        let (token, signature) = raw.rsplit_once('.')?;
        let signature = hex::decode(signature).ok()?;

        let mut mac = HmacSha256::new_from_slice(&self.secret).ok()?;
        mac.update(token.as_bytes());
        mac.verify_slice(&signature).ok()?;
        Some(token.to_string())
    }

    fn sign(&self, token: &str) -> AppResult<String> {
        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .map_err(|e| AppError::Internal(e.to_string()))?;
        mac.update(token.as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }

    fn cookie(&self, value: &str, max_age: u64) -> AppResult<HeaderValue> {
        let secure = if self.secure_cookie { "; Secure" } else { "" };
        HeaderValue::from_str(&format!(
            "{SESSION_COOKIE}={value}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age}{secure}"
        ))
        .map_err(|e| AppError::Internal(e.to_string()))
    }
}

fn new_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Value of the named cookie across all `Cookie` headers.
#[must_use]
pub fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|line| line.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> SessionManager {
        SessionManager::new(
            Arc::new(MemorySessionStore::new(Duration::from_secs(60))),
            "test-secret",
            Duration::from_secs(60),
            false,
        )
    }

    fn identity() -> AdminIdentity {
        AdminIdentity {
            id: 1,
            username: "ops".to_string(),
        }
    }

    /// Turn a `Set-Cookie` value into the request header a browser would send.
    fn request_headers(set_cookie: &HeaderValue) -> HeaderMap {
        let pair = set_cookie.to_str().unwrap().split(';').next().unwrap();
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(pair).unwrap());
        headers
    }

    #[test]
    fn finds_cookie_among_others() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; geo5lux.sid=abc.def; lang=fr"),
        );
        assert_eq!(cookie_value(&headers, SESSION_COOKIE), Some("abc.def"));
        assert_eq!(cookie_value(&headers, "missing"), None);
    }

    #[tokio::test]
    async fn session_round_trip() {
        let sessions = manager();
        let set_cookie = sessions.start(&identity()).await.unwrap();

        let cookie = set_cookie.to_str().unwrap();
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(cookie.contains("Max-Age=60"));

        let headers = request_headers(&set_cookie);
        assert_eq!(sessions.current(&headers).await.unwrap(), Some(identity()));

        let cleared = sessions.end(&headers).await.unwrap();
        assert!(cleared.to_str().unwrap().contains("Max-Age=0"));
        assert_eq!(sessions.current(&headers).await.unwrap(), None);
    }

    #[tokio::test]
    async fn tampered_signature_is_ignored() {
        let sessions = manager();
        let set_cookie = sessions.start(&identity()).await.unwrap();
        let pair = set_cookie.to_str().unwrap().split(';').next().unwrap();
        let (token, _) = pair.rsplit_once('.').unwrap();

        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_str(&format!("{token}.{}", "00".repeat(32))).unwrap(),
        );
        assert_eq!(sessions.current(&headers).await.unwrap(), None);
    }

    #[tokio::test]
    async fn other_secret_cannot_read_session() {
        let store: Arc<dyn SessionStore> =
            Arc::new(MemorySessionStore::new(Duration::from_secs(60)));
        let issuer = SessionManager::new(store.clone(), "one", Duration::from_secs(60), false);
        let reader = SessionManager::new(store, "two", Duration::from_secs(60), false);

        let set_cookie = issuer.start(&identity()).await.unwrap();
        let headers = request_headers(&set_cookie);
        assert_eq!(reader.current(&headers).await.unwrap(), None);
    }

    #[tokio::test]
    async fn ending_without_session_still_clears_cookie() {
        let cleared = manager().end(&HeaderMap::new()).await.unwrap();
        assert!(cleared.to_str().unwrap().starts_with("geo5lux.sid=;"));
    }
}
