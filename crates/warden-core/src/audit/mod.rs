// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Audit logging for security events and mutating operations.
//!
//! Every authentication attempt, mutating operation, and unhandled failure
//! in the gateway produces exactly one [`AuditRecord`], tagged with the
//! request's correlation ID and the resolved caller identity. Emission is
//! best-effort from the request's perspective: a sink failure is logged and
//! swallowed, never surfaced to the caller.
//!
//! # Components
//!
//! - [`AuditLogger`]: core trait for audit sinks
//! - [`AuditRecord`]: the structured record with correlation metadata
//! - [`FileAuditLogger`]: JSON-lines file sink
//! - [`InMemoryAuditLogger`]: queryable in-memory sink for tests
//! - [`NoOpAuditLogger`]: discards everything

mod error;
mod file_logger;
mod memory_logger;
mod types;

pub use error::{AuditError, AuditResult};
pub use file_logger::FileAuditLogger;
pub use memory_logger::InMemoryAuditLogger;
pub use types::{AuditFilter, AuditKind, AuditRecord, Outcome, ANONYMOUS};

use async_trait::async_trait;

// =============================================================================
// Core Trait
// =============================================================================

/// Trait for audit logger implementations.
///
/// Implementations must tolerate concurrent `log` calls and must emit each
/// record atomically as one unit, never interleaving records from different
/// requests.
#[async_trait]
pub trait AuditLogger: Send + Sync {
    /// Logs an audit record.
    async fn log(&self, record: AuditRecord) -> AuditResult<()>;

    /// Queries audit records with the given filter.
    ///
    /// Not all sinks support querying; file-based sinks return
    /// [`AuditError::QueryNotSupported`].
    async fn query(&self, filter: AuditFilter) -> AuditResult<Vec<AuditRecord>>;

    /// Flushes any buffered records.
    ///
    /// Called before shutdown so the trail survives the process.
    async fn flush(&self) -> AuditResult<()>;

    /// Returns the logger name for identification.
    fn name(&self) -> &str {
        "audit_logger"
    }
}

// =============================================================================
// No-Op Logger
// =============================================================================

/// An audit logger that discards all records.
///
/// Useful when auditing is disabled and as a default for builders.
#[derive(Debug, Default, Clone)]
pub struct NoOpAuditLogger;

impl NoOpAuditLogger {
    /// Creates a new no-op logger.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AuditLogger for NoOpAuditLogger {
    async fn log(&self, _record: AuditRecord) -> AuditResult<()> {
        Ok(())
    }

    async fn query(&self, _filter: AuditFilter) -> AuditResult<Vec<AuditRecord>> {
        Ok(Vec::new())
    }

    async fn flush(&self) -> AuditResult<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "noop"
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_noop_logger() {
        let logger = NoOpAuditLogger::new();

        let record = AuditRecord::auth_success("bond", "corr-1");

        assert!(logger.log(record).await.is_ok());
        assert!(logger.query(AuditFilter::default()).await.unwrap().is_empty());
        assert!(logger.flush().await.is_ok());
    }
}
