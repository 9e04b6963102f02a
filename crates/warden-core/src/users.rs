// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! User store abstraction and password hashing.
//!
//! The gateway treats the user store as an external collaborator: the
//! credential verifier only needs `find_user`. Passwords are stored as
//! salted Argon2 hashes and compared with the constant-time verifier from
//! the `argon2` crate, never with plaintext equality.

use std::collections::HashMap;
use std::sync::Arc;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// =============================================================================
// Errors
// =============================================================================

/// Errors from the user store.
#[derive(Debug, Error)]
pub enum UserStoreError {
    /// The backing store could not be reached.
    #[error("User store unavailable: {message}")]
    Unavailable {
        /// Error message.
        message: String,
    },

    /// Password hashing failed.
    #[error("Password hashing failed: {message}")]
    HashingFailed {
        /// Error message.
        message: String,
    },
}

impl UserStoreError {
    /// Creates an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Creates a hashing failed error.
    pub fn hashing_failed(message: impl Into<String>) -> Self {
        Self::HashingFailed {
            message: message.into(),
        }
    }
}

/// Result type for user store operations.
pub type UserStoreResult<T> = Result<T, UserStoreError>;

// =============================================================================
// Stored User
// =============================================================================

/// A credential record as held by the user store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredUser {
    /// Unique username.
    pub username: String,
    /// Argon2 password hash in PHC string format.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Role names assigned to this user. Never empty.
    pub roles: Vec<String>,
}

// =============================================================================
// Password Hashing
// =============================================================================

/// Hashes a password with Argon2 and a fresh random salt.
pub fn hash_password(password: &str) -> UserStoreResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| UserStoreError::hashing_failed(e.to_string()))
}

/// Verifies a password against an Argon2 hash.
///
/// The comparison runs in time independent of where a mismatch occurs.
/// A structurally invalid hash counts as a mismatch.
pub fn verify_password(password: &str, password_hash: &str) -> bool {
    match PasswordHash::new(password_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

// =============================================================================
// User Store Trait
// =============================================================================

/// Trait for user store implementations.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Looks up a user by username.
    async fn find_user(&self, username: &str) -> UserStoreResult<Option<StoredUser>>;
}

// =============================================================================
// In-Memory User Store
// =============================================================================

/// In-memory user store.
///
/// Suitable for tests and single-node deployments seeded from configuration.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserStore {
    users: Arc<RwLock<HashMap<String, StoredUser>>>,
}

impl InMemoryUserStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a user, hashing the given plaintext password.
    pub fn add_user(
        &self,
        username: impl Into<String>,
        password: &str,
        roles: Vec<String>,
    ) -> UserStoreResult<()> {
        let username = username.into();
        let password_hash = hash_password(password)?;

        self.users.write().insert(
            username.clone(),
            StoredUser {
                username,
                password_hash,
                roles,
            },
        );

        Ok(())
    }

    /// Adds a user with a pre-computed hash.
    pub fn add_user_hashed(&self, user: StoredUser) {
        self.users.write().insert(user.username.clone(), user);
    }

    /// Returns the number of users.
    pub fn len(&self) -> usize {
        self.users.read().len()
    }

    /// Returns `true` if the store has no users.
    pub fn is_empty(&self) -> bool {
        self.users.read().is_empty()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_user(&self, username: &str) -> UserStoreResult<Option<StoredUser>> {
        Ok(self.users.read().get(username).cloned())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("shaken-not-stirred").unwrap();

        assert!(verify_password("shaken-not-stirred", &hash));
        assert!(!verify_password("stirred-not-shaken", &hash));
    }

    #[test]
    fn test_verify_rejects_garbage_hash() {
        assert!(!verify_password("anything", "not-a-phc-string"));
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("password").unwrap();
        let b = hash_password("password").unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_in_memory_store() {
        let store = InMemoryUserStore::new();
        store
            .add_user("bond", "007", vec!["field_agent".to_string()])
            .unwrap();

        let user = store.find_user("bond").await.unwrap().unwrap();
        assert_eq!(user.username, "bond");
        assert!(verify_password("007", &user.password_hash));

        assert!(store.find_user("blofeld").await.unwrap().is_none());
    }
}
