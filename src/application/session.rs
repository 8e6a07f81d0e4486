//! Owner session: the single source of truth for login state.
//!
//! A `SessionManager` is opened once at startup from durable storage and
//! shared by clone; the token only changes through `set_token` and
//! `clear_token`. There is no client-side expiry: the server's 401 answers
//! decide when a token stops being valid.

use std::sync::{Arc, Mutex};

use tracing::debug;

use crate::infra::{error::InfraError, lock::mutex_lock, storage::KeyValueStore};

/// Storage key holding the bearer token.
pub const TOKEN_KEY: &str = "blog_token";

#[derive(Clone)]
pub struct SessionManager {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    store: Arc<dyn KeyValueStore>,
    token: Mutex<Option<String>>,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("logged_in", &self.is_logged_in())
            .finish_non_exhaustive()
    }
}

impl SessionManager {
    /// Restores any token persisted by a previous run.
    pub fn open(store: Arc<dyn KeyValueStore>) -> Result<Self, InfraError> {
        let token = store.get(TOKEN_KEY)?.filter(|token| !token.is_empty());
        debug!(restored = token.is_some(), "session opened");
        Ok(Self {
            inner: Arc::new(SessionInner {
                store,
                token: Mutex::new(token),
            }),
        })
    }

    #[must_use]
    pub fn token(&self) -> Option<String> {
        mutex_lock(&self.inner.token, "application::session", "token").clone()
    }

    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        mutex_lock(&self.inner.token, "application::session", "is_logged_in").is_some()
    }

    /// Installs `token` for this process, then persists it.
    pub fn set_token(&self, token: &str) -> Result<(), InfraError> {
        let value = (!token.is_empty()).then(|| token.to_string());
        *mutex_lock(&self.inner.token, "application::session", "set_token") = value;
        if token.is_empty() {
            self.inner.store.remove(TOKEN_KEY)
        } else {
            self.inner.store.set(TOKEN_KEY, token)
        }
    }

    /// Forgets the token for this process, then removes it from storage.
    pub fn clear_token(&self) -> Result<(), InfraError> {
        *mutex_lock(&self.inner.token, "application::session", "clear_token") = None;
        self.inner.store.remove(TOKEN_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::storage::{FileStore, MemoryStore};

    #[test]
    fn restores_persisted_token() {
        let session =
            SessionManager::open(Arc::new(MemoryStore::with_entry(TOKEN_KEY, "tok"))).expect("open");
        assert!(session.is_logged_in());
        assert_eq!(session.token().as_deref(), Some("tok"));
    }

    #[test]
    fn empty_token_counts_as_logged_out() {
        let session =
            SessionManager::open(Arc::new(MemoryStore::with_entry(TOKEN_KEY, ""))).expect("open");
        assert!(!session.is_logged_in());
        session.set_token("").expect("set empty");
        assert!(!session.is_logged_in());
    }

    #[test]
    fn set_and_clear_write_through_to_storage() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = dir.path().join("session.toml");
        let session = SessionManager::open(Arc::new(FileStore::new(&path))).expect("open");
        assert!(!session.is_logged_in());

        session.set_token("abc").expect("set");
        let reopened = SessionManager::open(Arc::new(FileStore::new(&path))).expect("reopen");
        assert_eq!(reopened.token().as_deref(), Some("abc"));

        reopened.clear_token().expect("clear");
        assert!(!reopened.is_logged_in());
        let third = SessionManager::open(Arc::new(FileStore::new(&path))).expect("reopen");
        assert!(!third.is_logged_in());
    }

    #[test]
    fn clones_share_state() {
        let session = SessionManager::open(Arc::new(MemoryStore::default())).expect("open");
        let other = session.clone();
        session.set_token("shared").expect("set");
        assert_eq!(other.token().as_deref(), Some("shared"));
    }
}
