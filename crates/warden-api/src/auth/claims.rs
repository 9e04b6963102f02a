// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Bearer token claims.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::Role;

/// Claims embedded in a bearer token.
///
/// Tokens are self-contained: roles are carried verbatim and trusted until
/// expiry, with no live re-lookup against the user store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the caller identity.
    pub sub: String,

    /// Expiration time (Unix timestamp).
    pub exp: i64,

    /// Issued at time (Unix timestamp).
    pub iat: i64,

    /// Issuer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,

    /// Role names held by the caller.
    #[serde(default)]
    pub roles: Vec<String>,
}

impl Claims {
    /// Creates claims for an identity with the given roles and lifetime.
    pub fn new(identity: impl Into<String>, roles: &[Role], ttl_secs: i64) -> Self {
        let now = Utc::now().timestamp();

        Self {
            sub: identity.into(),
            exp: now + ttl_secs,
            iat: now,
            iss: None,
            roles: roles.iter().map(|r| r.as_str().to_string()).collect(),
        }
    }

    /// Sets the issuer.
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.iss = Some(issuer.into());
        self
    }

    /// Returns `true` if the token has expired.
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_creation() {
        let claims = Claims::new("bond", &[Role::FieldAgent], 3600);

        assert_eq!(claims.sub, "bond");
        assert_eq!(claims.roles, vec!["FIELD_AGENT".to_string()]);
        assert!(!claims.is_expired());
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_claims_expiry() {
        let claims = Claims::new("bond", &[Role::FieldAgent], -60);
        assert!(claims.is_expired());
    }
}
