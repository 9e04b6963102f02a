// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Clearance resource handlers.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
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

/// Create clearance request body.
#[derive(Debug, Deserialize)]
pub struct CreateClearanceRequest {
    /// The subject the clearance applies to.
    pub subject: String,
    /// Clearance level.
    pub level: String,
}

/// Update clearance request body.
#[derive(Debug, Deserialize)]
pub struct UpdateClearanceRequest {
    /// New subject, if changing.
    pub subject: Option<String>,
    /// New level, if changing.
    pub level: Option<String>,
}

// =============================================================================
// Handlers
// =============================================================================

/// GET /api/v1/clearances
pub async fn list_clearances(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    Ok(ApiResponse::success(state.registry.list_clearances()))
}

/// GET /api/v1/clearances/{id}
pub async fn get_clearance(
    State(state): State<AppState>,
    RecordIdPath(id): RecordIdPath,
) -> ApiResult<impl IntoResponse> {
    let record = state.registry.get_clearance(id)?;
    Ok(ApiResponse::success(record))
}

/// POST /api/v1/clearances
pub async fn create_clearance(
    State(state): State<AppState>,
    Json(request): Json<CreateClearanceRequest>,
) -> ApiResult<Response> {
    if request.subject.is_empty() || request.level.is_empty() {
        return Err(ApiError::validation("subject and level must not be empty"));
    }

    let record = state
        .registry
        .create_clearance(request.subject, request.level);

    let mut response =
        (StatusCode::CREATED, Json(ApiResponse::success(record))).into_response();
    response
        .extensions_mut()
        .insert(MutationReport::success(Resource::Clearance, Action::Create));
    Ok(response)
}

/// PUT /api/v1/clearances/{id}
pub async fn update_clearance(
    State(state): State<AppState>,
    RecordIdPath(id): RecordIdPath,
    Json(request): Json<UpdateClearanceRequest>,
) -> ApiResult<Response> {
    match state
        .registry
        .update_clearance(id, request.subject, request.level)
    {
        Ok(record) => {
            let mut response = ApiResponse::success(record).into_response();
            response
                .extensions_mut()
                .insert(MutationReport::success(Resource::Clearance, Action::Update));
            Ok(response)
        }
        Err(e) => Ok(failed_mutation(e, Resource::Clearance, Action::Update)),
    }
}

/// DELETE /api/v1/clearances/{id}
pub async fn delete_clearance(
    State(state): State<AppState>,
    RecordIdPath(id): RecordIdPath,
) -> ApiResult<Response> {
    match state.registry.delete_clearance(id) {
        Ok(()) => {
            let mut response = StatusCode::NO_CONTENT.into_response();
            response
                .extensions_mut()
                .insert(MutationReport::success(Resource::Clearance, Action::Delete));
            Ok(response)
        }
        Err(e) => Ok(failed_mutation(e, Resource::Clearance, Action::Delete)),
    }
}
