// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Health check handler.

use axum::{response::IntoResponse, Json};

use crate::response::HealthResponse;

/// GET /health
///
/// Liveness probe. Public; carries no resource data.
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse::healthy())
}
