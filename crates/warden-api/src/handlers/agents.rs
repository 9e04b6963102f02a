// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Agent resource handlers.

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

// =============================================================================
// Requests
// =============================================================================

/// Create agent request body.
#[derive(Debug, Deserialize)]
pub struct CreateAgentRequest {
    /// Operational codename.
    pub codename: String,
    /// Deployment status.
    #[serde(default = "default_status")]
    pub status: String,
}

fn default_status() -> String {
    "active".to_string()
}

/// Update agent request body.
#[derive(Debug, Deserialize)]
pub struct UpdateAgentRequest {
    /// New codename, if changing.
    pub codename: Option<String>,
    /// New status, if changing.
    pub status: Option<String>,
}

// =============================================================================
// Handlers
// =============================================================================

/// GET /api/v1/agents
pub async fn list_agents(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    Ok(ApiResponse::success(state.registry.list_agents()))
}

/// GET /api/v1/agents/{id}
pub async fn get_agent(
    State(state): State<AppState>,
    RecordIdPath(id): RecordIdPath,
) -> ApiResult<impl IntoResponse> {
    let record = state.registry.get_agent(id)?;
    Ok(ApiResponse::success(record))
}

/// POST /api/v1/agents
pub async fn create_agent(
    State(state): State<AppState>,
    Json(request): Json<CreateAgentRequest>,
) -> ApiResult<Response> {
    if request.codename.is_empty() {
        return Err(ApiError::validation("codename must not be empty"));
    }

    let record = state.registry.create_agent(request.codename, request.status);

    let mut response =
        (StatusCode::CREATED, Json(ApiResponse::success(record))).into_response();
    response
        .extensions_mut()
        .insert(MutationReport::success(Resource::Agent, Action::Create));
    Ok(response)
}

/// PUT /api/v1/agents/{id}
pub async fn update_agent(
    State(state): State<AppState>,
    RecordIdPath(id): RecordIdPath,
    Json(request): Json<UpdateAgentRequest>,
) -> ApiResult<Response> {
    match state.registry.update_agent(id, request.codename, request.status) {
        Ok(record) => {
            let mut response = ApiResponse::success(record).into_response();
            response
                .extensions_mut()
                .insert(MutationReport::success(Resource::Agent, Action::Update));
            Ok(response)
        }
        Err(e) => Ok(failed_mutation(e, Resource::Agent, Action::Update)),
    }
}

/// DELETE /api/v1/agents/{id}
pub async fn delete_agent(
    State(state): State<AppState>,
    RecordIdPath(id): RecordIdPath,
) -> ApiResult<Response> {
    match state.registry.delete_agent(id) {
        Ok(()) => {
            let mut response = StatusCode::NO_CONTENT.into_response();
            response
                .extensions_mut()
                .insert(MutationReport::success(Resource::Agent, Action::Delete));
            Ok(response)
        }
        Err(e) => Ok(failed_mutation(e, Resource::Agent, Action::Delete)),
    }
}

/// Builds the error response for a mutation that failed downstream,
/// carrying a failure report for the audit middleware.
pub(crate) fn failed_mutation(
    error: warden_core::RegistryError,
    resource: Resource,
    action: Action,
) -> Response {
    let reason = error.to_string();
    let mut response = ApiError::from(error).into_response();
    response
        .extensions_mut()
        .insert(MutationReport::failure(resource, action, reason));
    response
}
