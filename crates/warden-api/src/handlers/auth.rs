// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Authentication handlers.

use axum::{extract::State, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use warden_core::audit::AuditRecord;

use crate::error::{ApiError, ApiResult};
use crate::extractors::{Auth, Correlation};
use crate::response::AuthResponse;
use crate::state::AppState;

// =============================================================================
// Login
// =============================================================================

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Username.
    pub username: String,
    /// Password.
    pub password: String,
}

/// POST /api/v1/auth/login
///
/// Verifies a credential pair and returns a signed bearer token carrying
/// the caller's identity and roles.
pub async fn login(
    State(state): State<AppState>,
    Correlation(correlation_id): Correlation,
    Json(request): Json<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    if request.username.is_empty() || request.password.is_empty() {
        return Err(ApiError::bad_request("Username and password are required"));
    }

    let principal = match state.verifier.verify(&request.username, &request.password).await {
        Ok(principal) => principal,
        Err(e) => {
            // Unknown identity and wrong password look the same to the caller
            tracing::debug!(username = %request.username, "Login failed");
            emit_audit(
                &state,
                AuditRecord::auth_failure(correlation_id.as_str(), "invalid_credentials"),
            );
            return Err(e.into());
        }
    };

    let token = state
        .tokens()
        .issue(&principal.identity, &principal.roles)?;

    emit_audit(
        &state,
        AuditRecord::auth_success(&principal.identity, correlation_id.as_str()),
    );

    tracing::info!(identity = %principal.identity, "User logged in");

    Ok(Json(AuthResponse::new(token, state.tokens().ttl_secs())))
}

/// Writes an audit record without blocking the response.
fn emit_audit(state: &AppState, record: AuditRecord) {
    let logger = state.audit().clone();
    tokio::spawn(async move {
        if let Err(e) = logger.log(record).await {
            tracing::warn!(error = %e, "Failed to write audit record");
        }
    });
}

// =============================================================================
// Current User
// =============================================================================

/// Current user response.
#[derive(Debug, Serialize)]
pub struct CurrentUserResponse {
    /// Caller identity.
    pub identity: String,
    /// Roles held by the caller.
    pub roles: Vec<String>,
}

/// GET /api/v1/auth/me
///
/// Returns the identity and roles resolved from the presented token.
pub async fn current_user(Auth(principal): Auth) -> ApiResult<impl IntoResponse> {
    Ok(Json(CurrentUserResponse {
        identity: principal.identity,
        roles: principal.roles.iter().map(|r| r.to_string()).collect(),
    }))
}
