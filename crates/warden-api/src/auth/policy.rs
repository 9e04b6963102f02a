// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Access decision engine.

use warden_core::{Action, Resource};

use super::{Principal, Role};

// =============================================================================
// Decision
// =============================================================================

/// Outcome of an access policy check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// At least one held role grants the requested action.
    Allow,
    /// No held role grants the requested action.
    Deny,
}

impl Decision {
    /// Returns `true` if the decision permits the action.
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }
}

// =============================================================================
// AccessPolicy
// =============================================================================

/// The fixed role-to-permission mapping.
///
/// The table is compiled in and cannot be altered at runtime. A principal
/// with multiple roles gets the union of each role's grants; anything the
/// table does not explicitly allow is denied.
#[derive(Debug, Clone, Copy, Default)]
pub struct AccessPolicy;

impl AccessPolicy {
    /// Creates the policy engine.
    pub fn new() -> Self {
        Self
    }

    /// Checks whether a single role grants an action on a resource.
    pub fn role_allows(role: Role, resource: Resource, action: Action) -> bool {
        match role {
            Role::Admin => true,
            Role::FieldAgent => {
                matches!(
                    (resource, action),
                    (Resource::Agent, Action::Read) | (Resource::Alias, Action::Read)
                )
            }
            Role::Hr => resource == Resource::Clearance,
            Role::IntelligenceAnalyst => {
                resource == Resource::Alias && action != Action::Read
            }
        }
    }

    /// Decides whether a principal may perform an action on a resource.
    ///
    /// Pure: same principal, resource, and action always yield the same
    /// decision. The policy never consults request payloads or record
    /// contents.
    pub fn authorize(&self, principal: &Principal, resource: Resource, action: Action) -> Decision {
        let allowed = principal
            .roles
            .iter()
            .any(|role| Self::role_allows(*role, resource, action));

        if allowed {
            Decision::Allow
        } else {
            Decision::Deny
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
