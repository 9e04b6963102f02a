// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Alias resource handlers.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;
use warden_core::{Action, Resource};

use crate::error::{ApiError, ApiResult};
use crate::extractors::RecordIdPath;
use crate::middleware::MutationReport;
use crate::response::ApiResponse;
use crate::state::AppState;

use super::agents::failed_mutation;

// =============================================================================
// Requests
// =============================================================================

/// Create alias request body.
#[derive(Debug, Deserialize)]
pub struct CreateAliasRequest {
    /// The agent this alias belongs to.
    pub agent_id: Uuid,
    /// The cover name.
    pub cover_name: String,
}

/// Update alias request body.
#[derive(Debug, Deserialize)]
pub struct UpdateAliasRequest {
    /// New cover name, if changing.
    pub cover_name: Option<String>,
}

// =============================================================================
// Handlers
// =============================================================================

/// GET /api/v1/aliases
pub async fn list_aliases(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    Ok(ApiResponse::success(state.registry.list_aliases()))
}

/// GET /api/v1/aliases/{id}
pub async fn get_alias(
    State(state): State<AppState>,
    RecordIdPath(id): RecordIdPath,
) -> ApiResult<impl IntoResponse> {
    let record = state.registry.get_alias(id)?;
    Ok(ApiResponse::success(record))
}

/// POST /api/v1/aliases
pub async fn create_alias(
    State(state): State<AppState>,
    Json(request): Json<CreateAliasRequest>,
) -> ApiResult<Response> {
    if request.cover_name.is_empty() {
        return Err(ApiError::validation("cover_name must not be empty"));
    }

    // The referenced agent must exist
    if let Err(e) = state.registry.get_agent(request.agent_id) {
        return Ok(failed_mutation(e, Resource::Alias, Action::Create));
    }

    let record = state
        .registry
        .create_alias(request.agent_id, request.cover_name);

    let mut response =
        (StatusCode::CREATED, Json(ApiResponse::success(record))).into_response();
    response
        .extensions_mut()
        .insert(MutationReport::success(Resource::Alias, Action::Create));
    Ok(response)
}

/// PUT /api/v1/aliases/{id}
pub async fn update_alias(
    State(state): State<AppState>,
    RecordIdPath(id): RecordIdPath,
    Json(request): Json<UpdateAliasRequest>,
) -> ApiResult<Response> {
    match state.registry.update_alias(id, request.cover_name) {
        Ok(record) => {
            let mut response = ApiResponse::success(record).into_response();
            response
                .extensions_mut()
                .insert(MutationReport::success(Resource::Alias, Action::Update));
            Ok(response)
        }
        Err(e) => Ok(failed_mutation(e, Resource::Alias, Action::Update)),
    }
}

/// DELETE /api/v1/aliases/{id}
pub async fn delete_alias(
    State(state): State<AppState>,
    RecordIdPath(id): RecordIdPath,
) -> ApiResult<Response> {
    match state.registry.delete_alias(id) {
        Ok(()) => {
            let mut response = StatusCode::NO_CONTENT.into_response();
            response
                .extensions_mut()
                .insert(MutationReport::success(Resource::Alias, Action::Delete));
            Ok(response)
        }
        Err(e) => Ok(failed_mutation(e, Resource::Alias, Action::Delete)),
    }
}
