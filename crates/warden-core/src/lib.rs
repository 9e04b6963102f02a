// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # warden-core
//!
//! Core domain types for the Warden gateway: audit logging, the user store
//! abstraction, and the in-memory resource registry that stands in for the
//! downstream business service.

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod audit;
pub mod registry;
pub mod types;
pub mod users;

pub use audit::{
    AuditError, AuditFilter, AuditKind, AuditLogger, AuditRecord, AuditResult, FileAuditLogger,
    InMemoryAuditLogger, NoOpAuditLogger, Outcome, ANONYMOUS,
};
pub use registry::{
    AgentRecord, AliasRecord, ClearanceRecord, Registry, RegistryError, RegistryResult,
};
pub use types::{Action, Resource};
pub use users::{InMemoryUserStore, StoredUser, UserStore, UserStoreError, UserStoreResult};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
