// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! HTTP middleware.
//!
//! The enforcement pipeline, outermost first: correlation resolution,
//! the authentication gate, audit emission, and per-route policy
//! enforcement. Each stage is a plain tower layer so the same pipeline
//! serves production wiring and in-process tests.

mod audit;
mod auth;
mod authz;
mod correlation;

pub use audit::{AuditLayer, AuditMiddleware, MutationReport};
pub use auth::{AuthLayer, AuthMiddleware};
pub use authz::{AuthzLayer, AuthzMiddleware};
pub use correlation::{CorrelationId, CorrelationLayer, CorrelationMiddleware, CORRELATION_HEADER};
