// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Credential verification.

use std::sync::Arc;

use thiserror::Error;
use warden_core::users::{hash_password, verify_password, UserStore};

use super::{Principal, Role};

// =============================================================================
// CredentialError
// =============================================================================

/// Credential verification failures.
///
/// An unknown identity and a wrong password both map to
/// [`CredentialError::InvalidCredentials`]; callers cannot distinguish the
/// two from the response.
#[derive(Debug, Error)]
pub enum CredentialError {
    /// The identity/password pair did not match any stored user.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The user store could not be consulted.
    #[error("user store unavailable: {0}")]
    StoreUnavailable(String),
}

// =============================================================================
// CredentialVerifier
// =============================================================================

/// Verifies identity/password pairs against the user store.
///
/// Passwords are stored as salted Argon2 hashes. Verification runs in time
/// independent of where a lookup fails: unknown identities are checked
/// against a precomputed dummy hash so the hashing work is always done.
pub struct CredentialVerifier {
    store: Arc<dyn UserStore>,
    // Verified against when the identity is unknown, keeping the timing
    // profile identical to a known-identity mismatch.
    dummy_hash: String,
}

impl CredentialVerifier {
    /// Creates a verifier over the given user store.
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        let dummy_hash = hash_password("warden-dummy-password-for-timing")
            .unwrap_or_else(|_| String::new());

        Self { store, dummy_hash }
    }

    /// Verifies a credential pair and resolves the caller's principal.
    ///
    /// Role strings attached to the stored user that do not name a known
    /// role are dropped with a warning rather than failing the login. A user
    /// left with no known roles cannot log in at all: every principal must
    /// hold at least one role, and a roleless token would be rejected by the
    /// authentication gate on its first use anyway.
    pub async fn verify(&self, identity: &str, password: &str) -> Result<Principal, CredentialError> {
        let user = self
            .store
            .find_user(identity)
            .await
            .map_err(|e| CredentialError::StoreUnavailable(e.to_string()))?;

        let Some(user) = user else {
            // Burn the same hashing work as a real verification
            let _ = verify_password(password, &self.dummy_hash);
            return Err(CredentialError::InvalidCredentials);
        };

        if !verify_password(password, &user.password_hash) {
            return Err(CredentialError::InvalidCredentials);
        }

        let roles: Vec<Role> = user
            .roles
            .iter()
            .filter_map(|r| {
                let parsed = Role::parse(r);
                if parsed.is_none() {
                    tracing::warn!(identity = %identity, role = %r, "Ignoring unknown role on stored user");
                }
                parsed
            })
            .collect();

        if roles.is_empty() {
            tracing::warn!(identity = %identity, "Stored user has no known roles; refusing login");
            return Err(CredentialError::InvalidCredentials);
        }

        Ok(Principal::new(user.username, roles))
    }
}

impl std::fmt::Debug for CredentialVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialVerifier").finish_non_exhaustive()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use warden_core::users::InMemoryUserStore;

    fn verifier_with_user(username: &str, password: &str, roles: &[&str]) -> CredentialVerifier {
        let store = InMemoryUserStore::new();
        store
            .add_user(username, password, roles.iter().map(|r| r.to_string()).collect())
            .unwrap();
        CredentialVerifier::new(Arc::new(store))
    }

    #[tokio::test]
    async fn test_valid_credentials() {
        let verifier = verifier_with_user("bond", "shaken-not-stirred", &["FIELD_AGENT"]);

        let principal = verifier.verify("bond", "shaken-not-stirred").await.unwrap();
        assert_eq!(principal.identity, "bond");
        assert_eq!(principal.roles, vec![Role::FieldAgent]);
    }

    #[tokio::test]
    async fn test_wrong_password() {
        let verifier = verifier_with_user("bond", "shaken-not-stirred", &["FIELD_AGENT"]);

        let err = verifier.verify("bond", "stirred-not-shaken").await.unwrap_err();
        assert!(matches!(err, CredentialError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_unknown_identity() {
        let verifier = verifier_with_user("bond", "shaken-not-stirred", &["FIELD_AGENT"]);

        let err = verifier.verify("blofeld", "anything").await.unwrap_err();
        assert!(matches!(err, CredentialError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_unknown_stored_role_is_dropped() {
        let verifier = verifier_with_user("moneypenny", "secret", &["HR", "RECEPTIONIST"]);

        let principal = verifier.verify("moneypenny", "secret").await.unwrap();
        assert_eq!(principal.roles, vec![Role::Hr]);
    }

    #[tokio::test]
    async fn test_user_without_any_known_role_cannot_log_in() {
        let verifier = verifier_with_user("ghost", "secret", &["RECEPTIONIST"]);

        let err = verifier.verify("ghost", "secret").await.unwrap_err();
        assert!(matches!(err, CredentialError::InvalidCredentials));
    }
}
