// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! In-memory resource registry.
//!
//! This is the black-box business collaborator behind the gateway: plain
//! CRUD over agents, aliases, and clearances with no authorization logic of
//! its own. Access decisions happen in the pipeline before any of these
//! methods run.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::types::Resource;

// =============================================================================
// Errors
// =============================================================================

/// Errors from the registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Record not found.
    #[error("{resource} '{id}' not found")]
    NotFound {
        /// The resource kind.
        resource: Resource,
        /// The record ID.
        id: Uuid,
    },
}

impl RegistryError {
    /// Creates a not found error.
    pub fn not_found(resource: Resource, id: Uuid) -> Self {
        Self::NotFound { resource, id }
    }
}

/// Result type for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;

// =============================================================================
// Records
// =============================================================================

/// A field agent record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentRecord {
    /// Record ID.
    pub id: Uuid,
    /// Operational codename.
    pub codename: String,
    /// Deployment status.
    pub status: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last update time.
    pub updated_at: DateTime<Utc>,
}

/// A cover identity record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AliasRecord {
    /// Record ID.
    pub id: Uuid,
    /// The agent this alias belongs to.
    pub agent_id: Uuid,
    /// The cover name.
    pub cover_name: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last update time.
    pub updated_at: DateTime<Utc>,
}

/// A security clearance record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClearanceRecord {
    /// Record ID.
    pub id: Uuid,
    /// The subject the clearance applies to.
    pub subject: String,
    /// Clearance level.
    pub level: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last update time.
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Registry
// =============================================================================

type Table<T> = Arc<RwLock<HashMap<Uuid, T>>>;

/// In-memory registry of agents, aliases, and clearances.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    agents: Table<AgentRecord>,
    aliases: Table<AliasRecord>,
    clearances: Table<ClearanceRecord>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Agents
    // =========================================================================

    /// Lists all agents.
    pub fn list_agents(&self) -> Vec<AgentRecord> {
        self.agents.read().values().cloned().collect()
    }

    /// Gets an agent by ID.
    pub fn get_agent(&self, id: Uuid) -> RegistryResult<AgentRecord> {
        self.agents
            .read()
            .get(&id)
            .cloned()
            .ok_or_else(|| RegistryError::not_found(Resource::Agent, id))
    }

    /// Creates an agent.
    pub fn create_agent(&self, codename: String, status: String) -> AgentRecord {
        let now = Utc::now();
        let record = AgentRecord {
            id: Uuid::now_v7(),
            codename,
            status,
            created_at: now,
            updated_at: now,
        };
        self.agents.write().insert(record.id, record.clone());
        record
    }

    /// Updates an agent.
    pub fn update_agent(
        &self,
        id: Uuid,
        codename: Option<String>,
        status: Option<String>,
    ) -> RegistryResult<AgentRecord> {
        let mut agents = self.agents.write();
        let record = agents
            .get_mut(&id)
            .ok_or_else(|| RegistryError::not_found(Resource::Agent, id))?;

        if let Some(codename) = codename {
            record.codename = codename;
        }
        if let Some(status) = status {
            record.status = status;
        }
        record.updated_at = Utc::now();

        Ok(record.clone())
    }

    /// Deletes an agent.
    pub fn delete_agent(&self, id: Uuid) -> RegistryResult<()> {
        self.agents
            .write()
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| RegistryError::not_found(Resource::Agent, id))
    }

    // =========================================================================
    // Aliases
    // =========================================================================

    /// Lists all aliases.
    pub fn list_aliases(&self) -> Vec<AliasRecord> {
        self.aliases.read().values().cloned().collect()
    }

    /// Gets an alias by ID.
    pub fn get_alias(&self, id: Uuid) -> RegistryResult<AliasRecord> {
        self.aliases
            .read()
            .get(&id)
            .cloned()
            .ok_or_else(|| RegistryError::not_found(Resource::Alias, id))
    }

    /// Creates an alias.
    pub fn create_alias(&self, agent_id: Uuid, cover_name: String) -> AliasRecord {
        let now = Utc::now();
        let record = AliasRecord {
            id: Uuid::now_v7(),
            agent_id,
            cover_name,
            created_at: now,
            updated_at: now,
        };
        self.aliases.write().insert(record.id, record.clone());
        record
    }

    /// Updates an alias.
    pub fn update_alias(&self, id: Uuid, cover_name: Option<String>) -> RegistryResult<AliasRecord> {
        let mut aliases = self.aliases.write();
        let record = aliases
            .get_mut(&id)
            .ok_or_else(|| RegistryError::not_found(Resource::Alias, id))?;

        if let Some(cover_name) = cover_name {
            record.cover_name = cover_name;
        }
        record.updated_at = Utc::now();

        Ok(record.clone())
    }

    /// Deletes an alias.
    pub fn delete_alias(&self, id: Uuid) -> RegistryResult<()> {
        self.aliases
            .write()
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| RegistryError::not_found(Resource::Alias, id))
    }

    // =========================================================================
    // Clearances
    // =========================================================================

    /// Lists all clearances.
    pub fn list_clearances(&self) -> Vec<ClearanceRecord> {
        self.clearances.read().values().cloned().collect()
    }

    /// Gets a clearance by ID.
    pub fn get_clearance(&self, id: Uuid) -> RegistryResult<ClearanceRecord> {
        self.clearances
            .read()
            .get(&id)
            .cloned()
            .ok_or_else(|| RegistryError::not_found(Resource::Clearance, id))
    }

    /// Creates a clearance.
    pub fn create_clearance(&self, subject: String, level: String) -> ClearanceRecord {
        let now = Utc::now();
        let record = ClearanceRecord {
            id: Uuid::now_v7(),
            subject,
            level,
            created_at: now,
            updated_at: now,
        };
        self.clearances.write().insert(record.id, record.clone());
        record
    }

    /// Updates a clearance.
    pub fn update_clearance(
        &self,
        id: Uuid,
        subject: Option<String>,
        level: Option<String>,
    ) -> RegistryResult<ClearanceRecord> {
        let mut clearances = self.clearances.write();
        let record = clearances
            .get_mut(&id)
            .ok_or_else(|| RegistryError::not_found(Resource::Clearance, id))?;

        if let Some(subject) = subject {
            record.subject = subject;
        }
        if let Some(level) = level {
            record.level = level;
        }
        record.updated_at = Utc::now();

        Ok(record.clone())
    }

    /// Deletes a clearance.
    pub fn delete_clearance(&self, id: Uuid) -> RegistryResult<()> {
        self.clearances
            .write()
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| RegistryError::not_found(Resource::Clearance, id))
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_crud() {
        let registry = Registry::new();

        let agent = registry.create_agent("VIPER".to_string(), "active".to_string());
        assert_eq!(registry.list_agents().len(), 1);

        let fetched = registry.get_agent(agent.id).unwrap();
        assert_eq!(fetched.codename, "VIPER");

        let updated = registry
            .update_agent(agent.id, None, Some("retired".to_string()))
            .unwrap();
        assert_eq!(updated.status, "retired");
        assert_eq!(updated.codename, "VIPER");

        registry.delete_agent(agent.id).unwrap();
        assert!(matches!(
            registry.get_agent(agent.id),
            Err(RegistryError::NotFound { .. })
        ));
    }

    #[test]
    fn test_alias_crud() {
        let registry = Registry::new();
        let agent = registry.create_agent("COBRA".to_string(), "active".to_string());

        let alias = registry.create_alias(agent.id, "Jim Hawkins".to_string());
        let updated = registry
            .update_alias(alias.id, Some("John Silver".to_string()))
            .unwrap();
        assert_eq!(updated.cover_name, "John Silver");

        registry.delete_alias(alias.id).unwrap();
        assert!(registry.list_aliases().is_empty());
    }

    #[test]
    fn test_clearance_crud() {
        let registry = Registry::new();

        let clearance = registry.create_clearance("station-9".to_string(), "top-secret".to_string());
        assert_eq!(registry.get_clearance(clearance.id).unwrap().level, "top-secret");

        registry.delete_clearance(clearance.id).unwrap();
        assert!(registry.delete_clearance(clearance.id).is_err());
    }
}
