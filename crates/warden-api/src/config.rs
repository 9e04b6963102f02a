// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! API server configuration.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::auth::TokenConfig;
use crate::error::{ApiError, ApiResult};

// =============================================================================
// WardenConfig
// =============================================================================

/// Configuration for the Warden gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WardenConfig {
    /// Server host address.
    pub host: IpAddr,
    /// Server port.
    pub port: u16,
    /// Base path for API endpoints.
    pub base_path: String,
    /// Token configuration.
    pub token: TokenConfig,
    /// CORS configuration.
    pub cors: CorsConfig,
    /// Audit logging configuration.
    pub audit: AuditConfig,
    /// Seed users loaded into the user store at startup.
    pub users: Vec<UserConfig>,
    /// Request timeout.
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,
    /// Graceful shutdown timeout.
    #[serde(with = "humantime_serde")]
    pub shutdown_timeout: Duration,
}

impl Default for WardenConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)),
            port: 8080,
            base_path: "/api/v1".to_string(),
            token: TokenConfig::default(),
            cors: CorsConfig::default(),
            audit: AuditConfig::default(),
            users: Vec::new(),
            request_timeout: Duration::from_secs(30),
            shutdown_timeout: Duration::from_secs(30),
        }
    }
}

impl WardenConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// The signing secret can be supplied or overridden through the
    /// `WARDEN_TOKEN_SECRET` environment variable, keeping it out of the
    /// config file entirely.
    pub fn load(path: impl AsRef<Path>) -> ApiResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ApiError::internal(format!("Failed to read config file {}: {}", path.display(), e))
        })?;

        let mut config: Self = toml::from_str(&content).map_err(|e| {
            ApiError::internal(format!("Failed to parse config file {}: {}", path.display(), e))
        })?;

        if let Ok(secret) = std::env::var("WARDEN_TOKEN_SECRET") {
            config.token.secret = secret;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ApiResult<()> {
        self.token.validate()?;

        if self.base_path.is_empty() || !self.base_path.starts_with('/') {
            return Err(ApiError::internal(format!(
                "base_path must start with '/': {}",
                self.base_path
            )));
        }

        for user in &self.users {
            user.validate()?;
        }

        Ok(())
    }

    /// Returns the socket address to bind to.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Sets the host address.
    pub fn with_host(mut self, host: IpAddr) -> Self {
        self.host = host;
        self
    }

    /// Sets the port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets the token configuration.
    pub fn with_token(mut self, token: TokenConfig) -> Self {
        self.token = token;
        self
    }

    /// Adds a seed user.
    pub fn with_user(mut self, user: UserConfig) -> Self {
        self.users.push(user);
        self
    }
}

// =============================================================================
// UserConfig
// =============================================================================

/// A seed user loaded into the user store at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserConfig {
    /// Unique identity.
    pub username: String,
    /// Plaintext password, hashed on load. Never logged.
    #[serde(skip_serializing)]
    pub password: String,
    /// Role names held by the user.
    pub roles: Vec<String>,
}

impl UserConfig {
    /// Creates a new seed user.
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        roles: Vec<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            roles,
        }
    }

    /// Validates the seed user.
    pub fn validate(&self) -> ApiResult<()> {
        if self.username.is_empty() {
            return Err(ApiError::internal("Seed user has an empty username"));
        }
        if self.password.is_empty() {
            return Err(ApiError::internal(format!(
                "Seed user '{}' has an empty password",
                self.username
            )));
        }
        for role in &self.roles {
            if crate::auth::Role::parse(role).is_none() {
                return Err(ApiError::internal(format!(
                    "Seed user '{}' has an unknown role: {}",
                    self.username, role
                )));
            }
        }
        Ok(())
    }
}

// =============================================================================
// CorsConfig
// =============================================================================

/// CORS (Cross-Origin Resource Sharing) configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Allowed origins.
    pub allowed_origins: Vec<String>,
    /// Allowed methods.
    pub allowed_methods: Vec<String>,
    /// Allowed headers.
    pub allowed_headers: Vec<String>,
    /// Max age for preflight cache (seconds).
    pub max_age: u64,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["*".to_string()],
            allowed_methods: vec![
                "GET".to_string(),
                "POST".to_string(),
                "PUT".to_string(),
                "DELETE".to_string(),
                "OPTIONS".to_string(),
            ],
            allowed_headers: vec![
                "Content-Type".to_string(),
                "Authorization".to_string(),
                "X-Correlation-ID".to_string(),
            ],
            max_age: 3600,
        }
    }
}

// =============================================================================
// AuditConfig
// =============================================================================

/// Audit logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    /// Whether audit logging is enabled.
    pub enabled: bool,
    /// Path to the audit log file. In-memory when unset.
    pub log_path: Option<PathBuf>,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            log_path: None,
        }
    }
}

// =============================================================================
// humantime_serde module for Duration
// =============================================================================

mod humantime_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // Serialize as seconds
        duration.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = WardenConfig::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.base_path, "/api/v1");
        assert!(config.audit.enabled);
    }

    #[test]
    fn test_socket_addr() {
        let config = WardenConfig::default().with_port(9000);
        let addr = config.socket_addr();
        assert_eq!(addr.port(), 9000);
    }

    #[test]
    fn test_validate_rejects_unknown_seed_role() {
        let config = WardenConfig::default()
            .with_token(TokenConfig::new(
                "test-secret-key-that-is-long-enough-for-testing",
            ))
            .with_user(UserConfig::new(
                "bond",
                "secret",
                vec!["DOUBLE_AGENT".to_string()],
            ));

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_toml() {
        let toml = r#"
            port = 9090
            base_path = "/api/v1"

            [token]
            secret = "a-config-file-secret-long-enough-to-pass"
            ttl_secs = 600

            [[users]]
            username = "m"
            password = "topsecret"
            roles = ["ADMIN"]
        "#;

        let config: WardenConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.port, 9090);
        assert_eq!(config.token.ttl_secs, 600);
        assert_eq!(config.users.len(), 1);
        assert_eq!(config.users[0].roles, vec!["ADMIN".to_string()]);
        assert!(config.validate().is_ok());
    }
}
