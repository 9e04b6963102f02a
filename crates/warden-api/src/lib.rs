// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # warden-api
//!
//! HTTP gateway for Warden: bearer token authentication, fixed role-based
//! access policy, and audit middleware in front of the resource registry.
//!
//! The enforcement pipeline is built from plain tower layers (see
//! [`middleware`]), so the same router serves production wiring and
//! in-process tests.

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod auth;
pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod server;
pub mod state;

pub use auth::{
    AccessPolicy, Claims, CredentialError, CredentialVerifier, Decision, Principal, Role,
    TokenCodec, TokenConfig, TokenError,
};
pub use config::{AuditConfig, CorsConfig, UserConfig, WardenConfig};
pub use error::{ApiError, ApiResult};
pub use server::{ApiServer, ApiServerBuilder};
pub use state::AppState;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
