// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Application state shared across handlers.

use std::sync::Arc;

use warden_core::users::{InMemoryUserStore, UserStore};
use warden_core::{AuditLogger, NoOpAuditLogger, Registry};

use crate::auth::{CredentialVerifier, TokenCodec};
use crate::config::WardenConfig;

// =============================================================================
// AppState
// =============================================================================

/// Application state shared across all handlers.
///
/// This is the central state container that is passed to all handlers via
/// Axum's state extraction mechanism.
#[derive(Clone)]
pub struct AppState {
    /// Gateway configuration.
    pub config: Arc<WardenConfig>,
    /// Token codec for issue and verify.
    pub token_codec: TokenCodec,
    /// Credential verifier for login.
    pub verifier: Arc<CredentialVerifier>,
    /// The resource registry fronted by the gateway.
    pub registry: Arc<Registry>,
    /// Audit logger.
    pub audit_logger: Arc<dyn AuditLogger>,
}

impl AppState {
    /// Creates a new app state builder.
    pub fn builder() -> AppStateBuilder {
        AppStateBuilder::new()
    }

    /// Returns the token codec.
    pub fn tokens(&self) -> &TokenCodec {
        &self.token_codec
    }

    /// Returns the audit logger.
    pub fn audit(&self) -> &Arc<dyn AuditLogger> {
        &self.audit_logger
    }
}

// =============================================================================
// AppStateBuilder
// =============================================================================

/// Builder for constructing AppState.
pub struct AppStateBuilder {
    config: Option<WardenConfig>,
    token_codec: Option<TokenCodec>,
    user_store: Option<Arc<dyn UserStore>>,
    registry: Option<Arc<Registry>>,
    audit_logger: Option<Arc<dyn AuditLogger>>,
}

impl AppStateBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self {
            config: None,
            token_codec: None,
            user_store: None,
            registry: None,
            audit_logger: None,
        }
    }

    /// Sets the configuration.
    pub fn config(mut self, config: WardenConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets the token codec.
    pub fn token_codec(mut self, codec: TokenCodec) -> Self {
        self.token_codec = Some(codec);
        self
    }

    /// Sets the user store.
    pub fn user_store(mut self, store: Arc<dyn UserStore>) -> Self {
        self.user_store = Some(store);
        self
    }

    /// Sets the registry.
    pub fn registry(mut self, registry: Arc<Registry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Sets the audit logger.
    pub fn audit_logger(mut self, logger: Arc<dyn AuditLogger>) -> Self {
        self.audit_logger = Some(logger);
        self
    }

    /// Builds the AppState.
    ///
    /// A missing user store is created from the config's seed users, with
    /// passwords hashed on load.
    pub fn build(self) -> crate::error::ApiResult<AppState> {
        let config = self.config.unwrap_or_default();

        let token_codec = match self.token_codec {
            Some(codec) => codec,
            None => TokenCodec::new(config.token.clone())?,
        };

        let user_store: Arc<dyn UserStore> = match self.user_store {
            Some(store) => store,
            None => {
                let store = InMemoryUserStore::new();
                for user in &config.users {
                    store
                        .add_user(&user.username, &user.password, user.roles.clone())
                        .map_err(|e| {
                            crate::error::ApiError::internal(format!(
                                "Failed to seed user '{}': {}",
                                user.username, e
                            ))
                        })?;
                }
                Arc::new(store)
            }
        };

        let registry = self.registry.unwrap_or_else(|| Arc::new(Registry::new()));

        let audit_logger = self
            .audit_logger
            .unwrap_or_else(|| Arc::new(NoOpAuditLogger));

        Ok(AppState {
            config: Arc::new(config),
            token_codec,
            verifier: Arc::new(CredentialVerifier::new(user_store)),
            registry,
            audit_logger,
        })
    }
}

impl Default for AppStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================
