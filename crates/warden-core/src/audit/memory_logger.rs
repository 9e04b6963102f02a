// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! In-memory audit logger for testing and development.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;

use super::error::AuditResult;
use super::types::{AuditFilter, AuditKind, AuditRecord};
use super::AuditLogger;

// =============================================================================
// In-Memory Audit Logger
// =============================================================================

/// In-memory audit logger.
///
/// Stores all records in a `RwLock`-protected vector, supporting both
/// logging and querying. Primarily intended for tests, where it doubles as
/// the observable side of the audit pipeline.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAuditLogger {
    records: Arc<RwLock<Vec<AuditRecord>>>,
}

impl InMemoryAuditLogger {
    /// Creates a new in-memory logger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all logged records.
    pub fn records(&self) -> Vec<AuditRecord> {
        self.records.read().clone()
    }

    /// Returns records matching a predicate.
    pub fn records_where<F>(&self, predicate: F) -> Vec<AuditRecord>
    where
        F: Fn(&AuditRecord) -> bool,
    {
        self.records
            .read()
            .iter()
            .filter(|r| predicate(r))
            .cloned()
            .collect()
    }

    /// Returns records for a specific identity.
    pub fn records_for_identity(&self, identity: &str) -> Vec<AuditRecord> {
        self.records_where(|r| r.identity == identity)
    }

    /// Returns records of a specific kind.
    pub fn records_of_kind(&self, kind: AuditKind) -> Vec<AuditRecord> {
        self.records_where(|r| r.kind == kind)
    }

    /// Checks if any record matches the predicate.
    pub fn has_record<F>(&self, predicate: F) -> bool
    where
        F: Fn(&AuditRecord) -> bool,
    {
        self.records.read().iter().any(predicate)
    }

    /// Counts records matching a predicate.
    pub fn count_where<F>(&self, predicate: F) -> usize
    where
        F: Fn(&AuditRecord) -> bool,
    {
        self.records.read().iter().filter(|r| predicate(r)).count()
    }

    /// Clears all records.
    pub fn clear(&self) {
        self.records.write().clear();
    }

    /// Returns the number of records.
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Returns `true` if empty.
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

#[async_trait]
impl AuditLogger for InMemoryAuditLogger {
    async fn log(&self, record: AuditRecord) -> AuditResult<()> {
        self.records.write().push(record);
        Ok(())
    }

    async fn query(&self, filter: AuditFilter) -> AuditResult<Vec<AuditRecord>> {
        let records = self.records.read();
        let mut results: Vec<AuditRecord> = records
            .iter()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect();

        results.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));

        if let Some(limit) = filter.limit {
            results.truncate(limit);
        }

        Ok(results)
    }

    async fn flush(&self) -> AuditResult<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

// =============================================================================
// Tests
// =============================================================================
