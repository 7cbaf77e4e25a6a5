//! Cookie-backed session layer.
//!
//! Every browser gets a random session id signed with HMAC-SHA256 under a
//! per-process secret; the secret never travels over the wire. The id keys
//! an in-memory registry holding that session's list store and any pending
//! flash message. Sessions do not survive a restart, and idle sessions are
//! purged opportunistically on access.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::api::state::AppState;
use crate::store::ListStore;

type HmacSha256 = Hmac<Sha256>;

/// Name of the cookie carrying the signed session id.
pub const SESSION_COOKIE: &str = "checklist_session";

/// Sessions idle longer than this are dropped on the next registry access.
const SESSION_TTL_SECS: i64 = 60 * 60 * 24;

/// One-shot message rendered on the next page load, then cleared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flash {
    Success(String),
    Error(String),
}

/// Per-session state.
#[derive(Debug)]
pub struct SessionData {
    pub store: ListStore,
    flash: Option<Flash>,
    last_seen: DateTime<Utc>,
}

impl SessionData {
    fn new() -> Self {
        Self {
            store: ListStore::new(),
            flash: None,
            last_seen: Utc::now(),
        }
    }

    pub fn set_flash(&mut self, flash: Flash) {
        self.flash = Some(flash);
    }

    /// Take the pending flash message, clearing it.
    pub fn take_flash(&mut self) -> Option<Flash> {
        self.flash.take()
    }
}

/// Session registry: signed-cookie verification plus the id → data map.
pub struct SessionStore {
    secret: String,
    sessions: RwLock<HashMap<String, SessionData>>,
}

impl SessionStore {
    /// Registry with a fresh random secret. Cookies from a previous
    /// process fail verification and get replaced.
    pub fn new() -> Self {
        Self::with_secret(random_hex_key())
    }

    pub fn with_secret(secret: String) -> Self {
        Self {
            secret,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    fn sign(&self, id: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
            .expect("HMAC accepts any key length");
        mac.update(id.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    /// Cookie value for a session id: `"{id}.{hmac_hex}"`.
    pub fn cookie_value(&self, id: &str) -> String {
        format!("{}.{}", id, self.sign(id))
    }

    /// Verify a cookie value, returning the session id when the signature
    /// holds. Hex signatures are lowercase on both sides.
    pub fn verify_cookie(&self, value: &str) -> Option<String> {
        let (id, signature) = value.split_once('.')?;
        if id.is_empty() || self.sign(id) != signature {
            return None;
        }
        Some(id.to_string())
    }

    /// Resolve the session for a request. A valid cookie maps to its
    /// existing (or re-created) session; anything else mints a new one.
    /// Returns the session id and whether a cookie must be set.
    pub fn resolve(&self, cookie: Option<&str>) -> (String, bool) {
        let mut sessions = self.sessions.write().unwrap();
        purge_stale(&mut sessions);

        if let Some(id) = cookie.and_then(|v| self.verify_cookie(v)) {
            let entry = sessions.entry(id.clone()).or_insert_with(SessionData::new);
            entry.last_seen = Utc::now();
            return (id, false);
        }

        let id = random_hex_key();
        sessions.insert(id.clone(), SessionData::new());
        (id, true)
    }

    /// Run `f` against one session's data under the write lock.
    pub fn with_session<R>(&self, id: &str, f: impl FnOnce(&mut SessionData) -> R) -> R {
        let mut sessions = self.sessions.write().unwrap();
        let entry = sessions
            .entry(id.to_string())
            .or_insert_with(SessionData::new);
        entry.last_seen = Utc::now();
        f(entry)
    }

    #[cfg(test)]
    fn session_count(&self) -> usize {
        self.sessions.read().unwrap().len()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

fn purge_stale(sessions: &mut HashMap<String, SessionData>) {
    let now = Utc::now();
    sessions.retain(|_, data| (now - data.last_seen).num_seconds() <= SESSION_TTL_SECS);
}

/// Generate a cryptographically random 64-character hex string.
fn random_hex_key() -> String {
    let mut bytes = [0u8; 32];
    getrandom::getrandom(&mut bytes).expect("Failed to generate random bytes");
    hex::encode(bytes)
}

// ─── Middleware ──────────────────────────────────────────────────────────────

/// Session id stored in request extensions by [`session_middleware`].
#[derive(Debug, Clone)]
pub struct SessionToken(pub String);

/// Extract a single cookie from a `Cookie` header: `name=value; …`
fn cookie_param(header: &str, name: &str) -> Option<String> {
    for part in header.split(';') {
        let part = part.trim();
        if let Some(value) = part
            .strip_prefix(name)
            .and_then(|rest| rest.strip_prefix('='))
        {
            if !value.is_empty() {
                return Some(value.to_string());
            }
        }
    }
    None
}

/// Axum middleware — resolves the session for every request and stashes
/// the id in request extensions. Sets the cookie on the way out when a
/// new session was minted.
pub async fn session_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let cookie = request
        .headers()
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|h| cookie_param(h, SESSION_COOKIE));

    let (id, created) = state.sessions.resolve(cookie.as_deref());
    request.extensions_mut().insert(SessionToken(id.clone()));

    let mut response = next.run(request).await;

    if created {
        let value = format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax",
            SESSION_COOKIE,
            state.sessions.cookie_value(&id)
        );
        if let Ok(value) = header::HeaderValue::from_str(&value) {
            response.headers_mut().insert(header::SET_COOKIE, value);
        }
        tracing::debug!(session = %id, "issued new session");
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cookie_sign_and_verify_round_trip() {
        let store = SessionStore::with_secret("test-secret".to_string());
        let value = store.cookie_value("abc123");
        assert_eq!(store.verify_cookie(&value), Some("abc123".to_string()));
    }

    #[test]
    fn test_tampered_cookie_is_rejected() {
        let store = SessionStore::with_secret("test-secret".to_string());
        let value = store.cookie_value("abc123");
        let tampered = value.replacen("abc123", "abc124", 1);
        assert_eq!(store.verify_cookie(&tampered), None);
        assert_eq!(store.verify_cookie("garbage"), None);
        assert_eq!(store.verify_cookie(".deadbeef"), None);
    }

    #[test]
    fn test_cookie_signed_under_other_secret_is_rejected() {
        let a = SessionStore::with_secret("secret-a".to_string());
        let b = SessionStore::with_secret("secret-b".to_string());
        let value = a.cookie_value("abc123");
        assert_eq!(b.verify_cookie(&value), None);
    }

    #[test]
    fn test_resolve_mints_session_without_cookie() {
        let store = SessionStore::new();
        let (id, created) = store.resolve(None);
        assert!(created);
        assert_eq!(store.session_count(), 1);

        // Same cookie resolves to the same session, no new Set-Cookie
        let cookie = store.cookie_value(&id);
        let (again, created) = store.resolve(Some(&cookie));
        assert_eq!(again, id);
        assert!(!created);
        assert_eq!(store.session_count(), 1);
    }

    #[test]
    fn test_resolve_replaces_invalid_cookie() {
        let store = SessionStore::new();
        let (_, created) = store.resolve(Some("not-a-valid-cookie"));
        assert!(created);
    }

    #[test]
    fn test_flash_is_taken_once() {
        let store = SessionStore::new();
        let (id, _) = store.resolve(None);

        store.with_session(&id, |s| {
            s.set_flash(Flash::Success("The list has been created.".to_string()));
        });
        let first = store.with_session(&id, |s| s.take_flash());
        assert_eq!(
            first,
            Some(Flash::Success("The list has been created.".to_string()))
        );
        let second = store.with_session(&id, |s| s.take_flash());
        assert_eq!(second, None);
    }

    #[test]
    fn test_sessions_are_isolated() {
        let store = SessionStore::new();
        let (a, _) = store.resolve(None);
        let (b, _) = store.resolve(None);
        assert_ne!(a, b);

        store.with_session(&a, |s| {
            s.store.create_list("Groceries").unwrap();
        });
        let b_lists = store.with_session(&b, |s| s.store.lists().len());
        assert_eq!(b_lists, 0);
    }

    #[test]
    fn test_cookie_param_extraction() {
        let header = "theme=dark; checklist_session=abc.def; other=1";
        assert_eq!(
            cookie_param(header, SESSION_COOKIE),
            Some("abc.def".to_string())
        );
        assert_eq!(cookie_param(header, "missing"), None);
        assert_eq!(cookie_param("checklist_session=", SESSION_COOKIE), None);
    }
}
