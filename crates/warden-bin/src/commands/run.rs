// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `run` command.

use std::sync::Arc;

use tracing::info;
use warden_api::{ApiServerBuilder, WardenConfig};
use warden_core::{AuditLogger, FileAuditLogger, InMemoryAuditLogger, NoOpAuditLogger};

use crate::cli::{Cli, RunArgs};
use crate::error::{BinError, BinResult};
use crate::shutdown::shutdown_signal;

/// Executes the `run` command to start the gateway.
pub async fn run(cli: &Cli, args: RunArgs) -> BinResult<()> {
    info!("Starting Warden Gateway...");

    let mut config = load_config(cli)?;

    if let Some(port) = args.port {
        config.port = port;
    }

    let audit_logger = create_audit_logger(&config)?;

    let server = ApiServerBuilder::new()
        .config(config)
        .audit_logger(audit_logger)
        .build()
        .map_err(|e| BinError::init(format!("Failed to build server: {}", e)))?;

    info!(addr = %server.addr(), "Gateway listening");

    server.run_with_shutdown(shutdown_signal()).await?;

    info!("Warden Gateway stopped");

    Ok(())
}

/// Loads and validates the configuration file.
fn load_config(cli: &Cli) -> BinResult<WardenConfig> {
    let path = &cli.config;

    if !path.exists() {
        return Err(BinError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    WardenConfig::load(path)
        .map_err(|e| BinError::Configuration(format!("Failed to load configuration: {}", e)))
}

/// Creates the audit logger selected by the configuration.
///
/// File-backed when a log path is set, in-memory otherwise. Disabled audit
/// wires a no-op logger so the middleware stack stays uniform.
fn create_audit_logger(config: &WardenConfig) -> BinResult<Arc<dyn AuditLogger>> {
    if !config.audit.enabled {
        info!("Audit logging disabled");
        return Ok(Arc::new(NoOpAuditLogger::new()));
    }

    match &config.audit.log_path {
        Some(path) => {
            info!(path = %path.display(), "Audit logging to file");
            Ok(Arc::new(FileAuditLogger::new(path)?))
        }
        None => {
            info!("Audit logging in memory");
            Ok(Arc::new(InMemoryAuditLogger::new()))
        }
    }
}
