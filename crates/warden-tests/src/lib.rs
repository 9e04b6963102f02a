// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Warden Integration Tests
//!
//! This crate provides integration tests for the Warden gateway. Tests
//! drive the full router in-process via `tower::ServiceExt::oneshot`, so
//! every request passes through the real middleware pipeline: correlation
//! resolution, the authentication gate, policy enforcement, and audit
//! emission.
//!
//! ## Module Structure
//!
//! - [`common`]: Shared test utilities
//!   - `harness`: In-process gateway with seeded users and an observable
//!     audit log
//!
//! ## Running Tests
//!
//! ```bash
//! # Run all integration tests
//! cargo test -p warden-tests
//!
//! # Run specific test suite
//! cargo test -p warden-tests --test integration_api
//! cargo test -p warden-tests --test integration_core
//!
//! # Run with verbose output
//! cargo test -p warden-tests -- --nocapture
//! ```
//!
//! ## Test Categories
//!
//! ### API Tests (`integration_api.rs`)
//! - Login round-trips and credential failure collapsing
//! - Token expiry and tamper rejection
//! - Role-based access enforcement across every route
//! - Correlation ID propagation
//! - Audit trail contents for success, denial, and failure paths
//!
//! ### Core Tests (`integration_core.rs`)
//! - Audit logger implementations
//! - Registry CRUD behavior
//! - User store credential verification

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod common;

/// Re-export commonly used items for convenience.
pub mod prelude {
    pub use crate::common::harness::*;
}
