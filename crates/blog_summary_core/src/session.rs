//! crates/blog_summary_core/src/session.rs
//!
//! Client-side session state. A `SessionState` is created once at the root of a
//! client application and handed to whatever needs to know who is signed in.
//! It restores itself from, and writes itself back to, a `SessionStorage`.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::domain::{Session, User};
use crate::ports::{PortError, PortResult, SessionStorage};

/// Storage key holding the signed-in user as JSON.
pub const USER_KEY: &str = "blog_summary_auth";
/// Storage key holding the bearer token.
pub const TOKEN_KEY: &str = "blog_summary_token";

pub struct SessionState<S: SessionStorage> {
    storage: S,
    current: Option<Session>,
}

impl<S: SessionStorage> SessionState<S> {
    /// Creates a signed-out state. Call `load` to restore a stored session.
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            current: None,
        }
    }

    /// Restores the session from storage.
    ///
    /// Incomplete or unparseable stored data is removed so it is not tried again.
    pub fn load(&mut self) -> PortResult<Option<&Session>> {
        let user = self.storage.load(USER_KEY)?;
        let token = self.storage.load(TOKEN_KEY)?;

        self.current = None;
        match (user, token) {
            (Some(user), Some(token)) => match parse_user(&user) {
                Some(user) if !token.is_empty() => {
                    self.current = Some(Session { user, token });
                }
                _ => {
                    tracing::warn!("Invalid user data in session storage, clearing...");
                    self.clear_storage()?;
                }
            },
            (None, None) => {}
            _ => self.clear_storage()?,
        }
        Ok(self.current.as_ref())
    }

    /// Records a freshly issued session and persists it.
    pub fn sign_in(&mut self, session: Session) -> PortResult<()> {
        let user = serde_json::to_string(&session.user)
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        self.storage.save(USER_KEY, &user)?;
        self.storage.save(TOKEN_KEY, &session.token)?;
        self.current = Some(session);
        Ok(())
    }

    pub fn sign_out(&mut self) -> PortResult<()> {
        self.current = None;
        self.clear_storage()
    }

    pub fn user(&self) -> Option<&User> {
        self.current.as_ref().map(|s| &s.user)
    }

    pub fn token(&self) -> Option<&str> {
        self.current.as_ref().map(|s| s.token.as_str())
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.is_some()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn clear_storage(&self) -> PortResult<()> {
        self.storage.remove(USER_KEY)?;
        self.storage.remove(TOKEN_KEY)
    }
}

fn parse_user(raw: &str) -> Option<User> {
    let user: User = serde_json::from_str(raw).ok()?;
    if user.name.is_empty() || user.email.is_empty() || user.id.is_nil() {
        return None;
    }
    Some(user)
}

//=========================================================================================
// In-Memory Storage
//=========================================================================================

/// A `SessionStorage` that lives only as long as the process.
#[derive(Default)]
pub struct MemorySessionStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemorySessionStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> PortResult<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| PortError::Unexpected("session storage lock poisoned".to_string()))
    }
}

impl SessionStorage for MemorySessionStorage {
    fn load(&self, key: &str) -> PortResult<Option<String>> {
        Ok(self.entries()?.get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> PortResult<()> {
        self.entries()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> PortResult<()> {
        self.entries()?.remove(key);
        Ok(())
    }
}
