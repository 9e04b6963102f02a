// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Audit error types.

use thiserror::Error;

/// Errors that can occur during audit logging.
///
/// Audit failures are deliberately non-fatal to the request path: callers
/// log them and move on.
#[derive(Debug, Error)]
pub enum AuditError {
    /// Failed to write an audit record.
    #[error("Failed to write audit record: {message}")]
    WriteFailed {
        /// Error message.
        message: String,
    },

    /// Failed to query audit records.
    #[error("Failed to query audit records: {message}")]
    QueryFailed {
        /// Error message.
        message: String,
    },

    /// Query not supported by this logger.
    #[error("Query not supported by this logger: {logger_type}")]
    QueryNotSupported {
        /// The type of logger that doesn't support queries.
        logger_type: String,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {message}")]
    Serialization {
        /// Error message.
        message: String,
    },
}

impl AuditError {
    /// Creates a write failed error.
    pub fn write_failed(message: impl Into<String>) -> Self {
        Self::WriteFailed {
            message: message.into(),
        }
    }

    /// Creates a query failed error.
    pub fn query_failed(message: impl Into<String>) -> Self {
        Self::QueryFailed {
            message: message.into(),
        }
    }

    /// Creates a query not supported error.
    pub fn query_not_supported(logger_type: impl Into<String>) -> Self {
        Self::QueryNotSupported {
            logger_type: logger_type.into(),
        }
    }

    /// Creates a serialization error.
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }
}

/// Result type for audit operations.
pub type AuditResult<T> = Result<T, AuditError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = AuditError::write_failed("disk full");
        assert!(matches!(err, AuditError::WriteFailed { .. }));

        let err = AuditError::query_not_supported("file");
        assert!(err.to_string().contains("file"));
    }
}
