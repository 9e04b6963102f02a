// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Resolved caller identity.

use serde::{Deserialize, Serialize};

use super::Role;

/// The resolved identity and role set of an authenticated caller.
///
/// Produced by the credential verifier at login or by token decode at the
/// authentication gate. Immutable once constructed; lives in request
/// extensions for the duration of one request and is never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// Caller identity, unique within the system.
    pub identity: String,
    /// Roles held by the caller. Never empty.
    pub roles: Vec<Role>,
}

impl Principal {
    /// Creates a new principal.
    pub fn new(identity: impl Into<String>, roles: Vec<Role>) -> Self {
        Self {
            identity: identity.into(),
            roles,
        }
    }

    /// Returns `true` if the principal holds the given role.
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    /// Returns `true` if the principal holds the ADMIN role.
    pub fn is_admin(&self) -> bool {
        self.has_role(Role::Admin)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_principal_roles() {
        let principal = Principal::new("bond", vec![Role::FieldAgent]);

        assert!(principal.has_role(Role::FieldAgent));
        assert!(!principal.has_role(Role::Hr));
        assert!(!principal.is_admin());
    }

    #[test]
    fn test_principal_equality() {
        let a = Principal::new("bond", vec![Role::FieldAgent]);
        let b = Principal::new("bond", vec![Role::FieldAgent]);

        assert_eq!(a, b);
        assert_ne!(a, Principal::new("bond", vec![Role::Hr]));
    }

    #[test]
    fn test_admin_principal() {
        let principal = Principal::new("m", vec![Role::Admin, Role::Hr]);
        assert!(principal.is_admin());
    }
}
