// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! API documentation handler.

use axum::{response::IntoResponse, Json};

/// GET /api/v1/docs
///
/// Returns a machine-readable description of the API surface. The route is
/// wired behind the admin-only policy layer; it goes through the same
/// pipeline as every other protected route rather than being exempted
/// from it.
pub async fn api_docs() -> impl IntoResponse {
    Json(serde_json::json!({
        "name": "warden",
        "version": crate::VERSION,
        "routes": {
            "auth": [
                { "method": "POST", "path": "/api/v1/auth/login", "auth": "none" },
                { "method": "GET", "path": "/api/v1/auth/me", "auth": "token" },
            ],
            "agents": [
                { "method": "GET", "path": "/api/v1/agents", "requires": ["agent:read"] },
                { "method": "GET", "path": "/api/v1/agents/{id}", "requires": ["agent:read"] },
                { "method": "POST", "path": "/api/v1/agents", "requires": ["agent:create"] },
                { "method": "PUT", "path": "/api/v1/agents/{id}", "requires": ["agent:update"] },
                { "method": "DELETE", "path": "/api/v1/agents/{id}", "requires": ["agent:delete"] },
            ],
            "aliases": [
                { "method": "GET", "path": "/api/v1/aliases", "requires": ["alias:read"] },
                { "method": "GET", "path": "/api/v1/aliases/{id}", "requires": ["alias:read"] },
                { "method": "POST", "path": "/api/v1/aliases", "requires": ["alias:create"] },
                { "method": "PUT", "path": "/api/v1/aliases/{id}", "requires": ["alias:update"] },
                { "method": "DELETE", "path": "/api/v1/aliases/{id}", "requires": ["alias:delete"] },
            ],
            "clearances": [
                { "method": "GET", "path": "/api/v1/clearances", "requires": ["clearance:read"] },
                { "method": "GET", "path": "/api/v1/clearances/{id}", "requires": ["clearance:read"] },
                { "method": "POST", "path": "/api/v1/clearances", "requires": ["clearance:create"] },
                { "method": "PUT", "path": "/api/v1/clearances/{id}", "requires": ["clearance:update"] },
                { "method": "DELETE", "path": "/api/v1/clearances/{id}", "requires": ["clearance:delete"] },
            ],
            "docs": [
                { "method": "GET", "path": "/api/v1/docs", "requires": ["role:ADMIN"] },
            ],
        },
    }))
}
