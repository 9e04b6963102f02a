// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `validate` command.

use warden_api::WardenConfig;

use crate::cli::{Cli, ValidateArgs};
use crate::error::{BinError, BinResult};

/// Executes the `validate` command to validate configuration.
pub fn validate(cli: &Cli, args: ValidateArgs) -> BinResult<()> {
    let config_path = &cli.config;

    // Check if file exists
    if !config_path.exists() {
        return Err(BinError::Configuration(format!(
            "Configuration file not found: {}",
            config_path.display()
        )));
    }

    // Load and validate configuration
    let config = WardenConfig::load(config_path).map_err(|e| {
        BinError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    // Collect validation warnings
    let mut warnings: Vec<String> = Vec::new();

    if config.users.is_empty() {
        warnings.push("No seed users configured; nobody can log in".to_string());
    }

    if !config.users.iter().any(|u| u.roles.iter().any(|r| r == "ADMIN")) {
        warnings.push("No seed user holds the ADMIN role".to_string());
    }

    // Check audit log directory
    if config.audit.enabled {
        if let Some(path) = &config.audit.log_path {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    warnings.push(format!(
                        "Audit log directory does not exist: {}",
                        parent.display()
                    ));
                }
            }
        }
    }

    println!("✓ Configuration is valid: {}", config_path.display());
    println!();
    println!("Summary:");
    println!("  Listen: {}", config.socket_addr());
    println!("  Base path: {}", config.base_path);
    println!("  Token TTL: {}s", config.token.ttl_secs);
    println!("  Seed users: {}", config.users.len());
    println!(
        "  Audit: {}",
        if config.audit.enabled { "enabled" } else { "disabled" }
    );

    if !warnings.is_empty() {
        println!();
        println!("Warnings:");
        for warning in &warnings {
            println!("  ⚠ {}", warning);
        }
    }

    if args.show_config {
        println!();
        println!("Parsed configuration:");
        println!(
            "{}",
            serde_json::to_string_pretty(&config)
                .unwrap_or_else(|_| "(serialization error)".to_string())
        );
    }

    Ok(())
}
