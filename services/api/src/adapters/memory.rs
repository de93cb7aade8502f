//! services/api/src/adapters/memory.rs
//!
//! An in-process `UserRepository`. Used by the tests and by `USER_STORE=memory`
//! for local runs without a database. Nothing survives a restart.

use async_trait::async_trait;
use blog_summary_core::domain::{NewUser, User, UserCredentials};
use blog_summary_core::ports::{PortError, PortResult, UserRepository};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Users keyed by lowercased email, which keeps the uniqueness check and the insert
/// atomic. Emails match case-insensitively; the stored user keeps the case it was
/// registered with.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<String, UserCredentials>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> PortResult<Option<UserCredentials>> {
        Ok(self.users.read().await.get(&email.to_lowercase()).cloned())
    }

    async fn create(&self, new_user: NewUser) -> PortResult<User> {
        let key = new_user.email.to_lowercase();
        let mut users = self.users.write().await;
        if users.contains_key(&key) {
            return Err(PortError::Conflict("email already registered".to_string()));
        }
        let user = User {
            id: Uuid::new_v4(),
            name: new_user.name,
            email: new_user.email,
        };
        users.insert(
            key,
            UserCredentials {
                user: user.clone(),
                password_hash: new_user.password_hash,
            },
        );
        Ok(user)
    }
}
