// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! JSON-lines file audit logger.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::error::{AuditError, AuditResult};
use super::types::{AuditFilter, AuditRecord};
use super::AuditLogger;

// =============================================================================
// File Audit Logger
// =============================================================================

/// File-based audit logger writing one JSON record per line.
///
/// Each record is serialized and written under a single lock so concurrent
/// requests never interleave within a line. Writes go through a `BufWriter`-
/// free path: the record line is built in memory first, then appended in one
/// `write_all` call, and the file is flushed on `flush()`.
pub struct FileAuditLogger {
    path: PathBuf,
    file: Arc<Mutex<File>>,
}

impl FileAuditLogger {
    /// Creates a new file logger, appending to `path`.
    pub fn new(path: impl AsRef<Path>) -> AuditResult<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new().create(true).append(true).open(&path)?;

        Ok(Self {
            path,
            file: Arc::new(Mutex::new(file)),
        })
    }

    /// Returns the log file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl std::fmt::Debug for FileAuditLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileAuditLogger")
            .field("path", &self.path)
            .finish()
    }
}

#[async_trait]
impl AuditLogger for FileAuditLogger {
    async fn log(&self, record: AuditRecord) -> AuditResult<()> {
        let mut line = serde_json::to_string(&record)
            .map_err(|e| AuditError::serialization(e.to_string()))?;
        line.push('\n');

        let mut file = self.file.lock();
        file.write_all(line.as_bytes())
            .map_err(|e| AuditError::write_failed(e.to_string()))?;

        Ok(())
    }

    async fn query(&self, _filter: AuditFilter) -> AuditResult<Vec<AuditRecord>> {
        Err(AuditError::query_not_supported("file"))
    }

    async fn flush(&self) -> AuditResult<()> {
        self.file.lock().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "file"
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::types::{AuditKind, Outcome};
    use crate::types::{Action, Resource};

    fn temp_log_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("warden-audit-{}-{}.log", name, std::process::id()))
    }

    #[tokio::test]
    async fn test_file_logger_writes_json_lines() {
        let path = temp_log_path("basic");
        let logger = FileAuditLogger::new(&path).unwrap();

        logger
            .log(AuditRecord::auth_success("bond", "corr-1"))
            .await
            .unwrap();
        logger
            .log(AuditRecord::mutation(
                "bond",
                "corr-1",
                Resource::Agent,
                Action::Delete,
                Outcome::Success,
            ))
            .await
            .unwrap();
        logger.flush().await.unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: AuditRecord = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first.kind, AuditKind::AuthSuccess);
        assert_eq!(first.identity, "bond");

        std::fs::remove_file(&path).ok();
    }

    #[tokio::test]
    async fn test_file_logger_query_not_supported() {
        let path = temp_log_path("query");
        let logger = FileAuditLogger::new(&path).unwrap();

        let result = logger.query(AuditFilter::default()).await;
        assert!(matches!(result, Err(AuditError::QueryNotSupported { .. })));

        std::fs::remove_file(&path).ok();
    }
}
