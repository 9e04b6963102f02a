// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Core audit record types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{Action, Resource};

/// Identity used when authentication never completed.
pub const ANONYMOUS: &str = "anonymous";

// =============================================================================
// Audit Record
// =============================================================================

/// A single audit record.
///
/// Records are write-once and append-only: they are constructed, emitted to
/// a logger, and never retained or mutated by the request path afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditRecord {
    /// Unique record ID.
    pub id: Uuid,

    /// When the event occurred.
    pub timestamp: DateTime<Utc>,

    /// Correlation ID of the request that produced this record.
    pub correlation_id: String,

    /// Resolved caller identity, or `"anonymous"`.
    pub identity: String,

    /// The kind of event.
    pub kind: AuditKind,

    /// The affected resource, if applicable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<Resource>,

    /// The attempted action, if applicable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<Action>,

    /// The outcome of the event.
    pub outcome: Outcome,

    /// Additional structured details.
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub details: serde_json::Value,
}

impl AuditRecord {
    /// Creates a new audit record.
    pub fn new(kind: AuditKind, correlation_id: impl Into<String>, outcome: Outcome) -> Self {
        Self {
            id: Uuid::now_v7(),
            timestamp: Utc::now(),
            correlation_id: correlation_id.into(),
            identity: ANONYMOUS.to_string(),
            kind,
            resource: None,
            action: None,
            outcome,
            details: serde_json::Value::Null,
        }
    }

    /// Sets the caller identity.
    pub fn with_identity(mut self, identity: impl Into<String>) -> Self {
        self.identity = identity.into();
        self
    }

    /// Sets the affected resource and action.
    pub fn with_operation(mut self, resource: Resource, action: Action) -> Self {
        self.resource = Some(resource);
        self.action = Some(action);
        self
    }

    /// Sets the details.
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = details;
        self
    }

    // =========================================================================
    // Factory methods for common events
    // =========================================================================

    /// Creates a record for a successful authentication.
    pub fn auth_success(identity: impl Into<String>, correlation_id: impl Into<String>) -> Self {
        Self::new(AuditKind::AuthSuccess, correlation_id, Outcome::Success)
            .with_identity(identity)
    }

    /// Creates a record for a failed authentication.
    ///
    /// The identity stays `"anonymous"`: the caller was never resolved.
    pub fn auth_failure(correlation_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(
            AuditKind::AuthFailure,
            correlation_id,
            Outcome::failure(reason),
        )
    }

    /// Creates a record for a mutating operation.
    pub fn mutation(
        identity: impl Into<String>,
        correlation_id: impl Into<String>,
        resource: Resource,
        action: Action,
        outcome: Outcome,
    ) -> Self {
        Self::new(AuditKind::Mutation, correlation_id, outcome)
            .with_identity(identity)
            .with_operation(resource, action)
    }

    /// Creates a record for a denied access attempt.
    pub fn access_denied(
        identity: impl Into<String>,
        correlation_id: impl Into<String>,
        resource: Resource,
        action: Action,
    ) -> Self {
        Self::mutation(identity, correlation_id, resource, action, Outcome::Denied)
    }

    /// Creates a record for an unhandled error escaping a handler.
    pub fn unhandled_error(
        identity: impl Into<String>,
        correlation_id: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::new(
            AuditKind::UnhandledError,
            correlation_id,
            Outcome::failure(reason),
        )
        .with_identity(identity)
    }
}

// =============================================================================
// Audit Kind
// =============================================================================

/// The kinds of auditable events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditKind {
    /// A caller was successfully authenticated (login or token validation).
    AuthSuccess,
    /// An authentication attempt failed.
    AuthFailure,
    /// A mutating operation was attempted (including denied attempts).
    Mutation,
    /// An unhandled error escaped a handler.
    UnhandledError,
}

impl AuditKind {
    /// Returns the kind name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditKind::AuthSuccess => "AUTH_SUCCESS",
            AuditKind::AuthFailure => "AUTH_FAILURE",
            AuditKind::Mutation => "MUTATION",
            AuditKind::UnhandledError => "UNHANDLED_ERROR",
        }
    }
}

impl std::fmt::Display for AuditKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Outcome
// =============================================================================

/// The outcome of an audited event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Outcome {
    /// The operation completed successfully.
    Success,
    /// The operation was denied by access policy.
    Denied,
    /// The operation failed.
    Failure {
        /// Reason for the failure.
        reason: String,
    },
}

impl Outcome {
    /// Creates a failure outcome.
    pub fn failure(reason: impl Into<String>) -> Self {
        Self::Failure {
            reason: reason.into(),
        }
    }

    /// Returns `true` if the outcome is a success.
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success)
    }

    /// Returns `true` if the outcome is a denial.
    pub fn is_denied(&self) -> bool {
        matches!(self, Outcome::Denied)
    }

    /// Returns the status as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Success => "success",
            Outcome::Denied => "denied",
            Outcome::Failure { .. } => "failure",
        }
    }
}

// =============================================================================
// Audit Filter
// =============================================================================

/// Filter for querying audit records.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuditFilter {
    /// Filter by identity.
    pub identity: Option<String>,
    /// Filter by event kind.
    pub kind: Option<AuditKind>,
    /// Filter by resource.
    pub resource: Option<Resource>,
    /// Filter by correlation ID.
    pub correlation_id: Option<String>,
    /// Maximum number of results.
    pub limit: Option<usize>,
}

impl AuditFilter {
    /// Creates a new empty filter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Filters by identity.
    pub fn identity(mut self, identity: impl Into<String>) -> Self {
        self.identity = Some(identity.into());
        self
    }

    /// Filters by event kind.
    pub fn kind(mut self, kind: AuditKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Filters by resource.
    pub fn resource(mut self, resource: Resource) -> Self {
        self.resource = Some(resource);
        self
    }

    /// Filters by correlation ID.
    pub fn correlation_id(mut self, id: impl Into<String>) -> Self {
        self.correlation_id = Some(id.into());
        self
    }

    /// Sets the result limit.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Checks if a record matches this filter.
    pub fn matches(&self, record: &AuditRecord) -> bool {
        if let Some(ref identity) = self.identity {
            if &record.identity != identity {
                return false;
            }
        }

        if let Some(kind) = self.kind {
            if record.kind != kind {
                return false;
            }
        }

        if let Some(resource) = self.resource {
            if record.resource != Some(resource) {
                return false;
            }
        }

        if let Some(ref correlation_id) = self.correlation_id {
            if &record.correlation_id != correlation_id {
                return false;
            }
        }

        true
    }
}

// =============================================================================
// Tests
// =============================================================================
