// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Role definitions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of roles a principal can hold.
///
/// Role strings in tokens must match one of these exactly; anything else is
/// rejected at decode time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Full access to every resource and action.
    Admin,
    /// Read-only access to agents and aliases.
    FieldAgent,
    /// Full access to clearance records.
    Hr,
    /// Manages cover identities (create/update/delete aliases).
    IntelligenceAnalyst,
}

impl Role {
    /// Returns the role name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::FieldAgent => "FIELD_AGENT",
            Role::Hr => "HR",
            Role::IntelligenceAnalyst => "INTELLIGENCE_ANALYST",
        }
    }

    /// Parses a role from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "ADMIN" => Some(Role::Admin),
            "FIELD_AGENT" => Some(Role::FieldAgent),
            "HR" => Some(Role::Hr),
            "INTELLIGENCE_ANALYST" => Some(Role::IntelligenceAnalyst),
            _ => None,
        }
    }

    /// Returns all roles.
    pub fn all() -> &'static [Role] {
        &[
            Role::Admin,
            Role::FieldAgent,
            Role::Hr,
            Role::IntelligenceAnalyst,
        ]
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Tests
// =============================================================================
