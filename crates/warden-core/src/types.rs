// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Shared resource and action types.

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Resource
// =============================================================================

/// The resource types managed behind the gateway.
///
/// This is a closed set: access policy, audit records, and the registry all
/// key on these three kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resource {
    /// Field agent records.
    Agent,
    /// Cover identities assigned to agents.
    Alias,
    /// Security clearance records.
    Clearance,
}

impl Resource {
    /// Returns the resource name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Resource::Agent => "agent",
            Resource::Alias => "alias",
            Resource::Clearance => "clearance",
        }
    }

    /// Parses a resource from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "agent" | "agents" => Some(Resource::Agent),
            "alias" | "aliases" => Some(Resource::Alias),
            "clearance" | "clearances" => Some(Resource::Clearance),
            _ => None,
        }
    }

    /// Returns all resource kinds.
    pub fn all() -> &'static [Resource] {
        &[Resource::Agent, Resource::Alias, Resource::Clearance]
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Action
// =============================================================================

/// The operations a caller can perform on a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Read a record or list records.
    Read,
    /// Create a new record.
    Create,
    /// Update an existing record.
    Update,
    /// Delete a record.
    Delete,
}

impl Action {
    /// Returns the action name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Read => "read",
            Action::Create => "create",
            Action::Update => "update",
            Action::Delete => "delete",
        }
    }

    /// Parses an action from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "read" => Some(Action::Read),
            "create" => Some(Action::Create),
            "update" => Some(Action::Update),
            "delete" => Some(Action::Delete),
            _ => None,
        }
    }

    /// Returns all actions.
    pub fn all() -> &'static [Action] {
        &[Action::Read, Action::Create, Action::Update, Action::Delete]
    }

    /// Returns `true` if this action changes state.
    pub fn is_mutating(&self) -> bool {
        !matches!(self, Action::Read)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Tests
// =============================================================================
