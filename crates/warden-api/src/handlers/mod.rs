// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! API request handlers.

pub mod agents;
pub mod aliases;
pub mod auth;
pub mod clearances;
pub mod docs;
pub mod health;
