// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Authentication and authorization.
//!
//! Covers the full credential path: password verification at login
//! ([`CredentialVerifier`]), bearer token issue/verify ([`TokenCodec`]),
//! the closed role set ([`Role`]), and the fixed access policy
//! ([`AccessPolicy`]). The HTTP enforcement points live in
//! [`crate::middleware`]; everything here is transport-agnostic.

mod claims;
mod context;
mod jwt;
mod policy;
mod role;
mod verifier;

pub use claims::Claims;
pub use context::Principal;
pub use jwt::{TokenCodec, TokenConfig, TokenError};
pub use policy::{AccessPolicy, Decision};
pub use role::Role;
pub use verifier::{CredentialError, CredentialVerifier};
