// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! In-process test gateway.
//!
//! Builds the full Warden router with seeded users and an in-memory audit
//! logger, then drives it with `tower::ServiceExt::oneshot`. No sockets are
//! opened; every request still crosses the complete middleware pipeline.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, Response, StatusCode},
    Router,
};
use tower::ServiceExt;
use warden_api::{
    ApiServerBuilder, TokenCodec, TokenConfig, UserConfig, WardenConfig,
};
use warden_core::InMemoryAuditLogger;

/// Signing secret shared by the gateway under test and forged tokens.
pub const TEST_SECRET: &str = "warden-integration-test-secret-0123456789abcdef";

// =============================================================================
// Seed Users
// =============================================================================

/// Administrator seed user.
pub const ADMIN_USER: (&str, &str) = ("m", "topsecret");
/// Field agent seed user.
pub const FIELD_AGENT_USER: (&str, &str) = ("bond", "agent007");
/// HR seed user.
pub const HR_USER: (&str, &str) = ("moneypenny", "people-ops");
/// Intelligence analyst seed user.
pub const ANALYST_USER: (&str, &str) = ("vesper", "numbers-station");

// =============================================================================
// TestGateway
// =============================================================================

/// A fully wired gateway held in memory for a single test.
pub struct TestGateway {
    router: Router,
    /// Observable audit log.
    pub audit: Arc<InMemoryAuditLogger>,
    /// Codec sharing the gateway's signing secret, for forging tokens.
    pub codec: TokenCodec,
}

impl TestGateway {
    /// Creates a gateway with the standard seed users.
    pub fn new() -> Self {
        let audit = Arc::new(InMemoryAuditLogger::new());

        let server = ApiServerBuilder::new()
            .config(test_config())
            .audit_logger(audit.clone())
            .build()
            .expect("failed to build test gateway");

        let codec = TokenCodec::new(TokenConfig::new(TEST_SECRET)).expect("codec");

        Self {
            router: server.router(),
            audit,
            codec,
        }
    }

    /// Sends a request through the full pipeline.
    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible")
    }

    /// Logs in and returns the issued bearer token.
    pub async fn login(&self, username: &str, password: &str) -> String {
        let response = self
            .send(json_request(
                Method::POST,
                "/api/v1/auth/login",
                None,
                serde_json::json!({ "username": username, "password": password }),
            ))
            .await;

        assert_eq!(
            response.status(),
            StatusCode::OK,
            "login failed for {username}"
        );

        let body = body_json(response).await;
        body["token"].as_str().expect("token in response").to_string()
    }

    /// Waits for fire-and-forget audit tasks to land.
    pub async fn settle(&self) {
        tokio::task::yield_now().await;
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
}

impl Default for TestGateway {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Configuration
// =============================================================================

/// Standard test configuration: one seed user per role.
pub fn test_config() -> WardenConfig {
    WardenConfig::default()
        .with_token(TokenConfig::new(TEST_SECRET))
        .with_user(UserConfig::new(
            ADMIN_USER.0,
            ADMIN_USER.1,
            vec!["ADMIN".to_string()],
        ))
        .with_user(UserConfig::new(
            FIELD_AGENT_USER.0,
            FIELD_AGENT_USER.1,
            vec!["FIELD_AGENT".to_string()],
        ))
        .with_user(UserConfig::new(
            HR_USER.0,
            HR_USER.1,
            vec!["HR".to_string()],
        ))
        .with_user(UserConfig::new(
            ANALYST_USER.0,
            ANALYST_USER.1,
            vec!["INTELLIGENCE_ANALYST".to_string()],
        ))
}

// =============================================================================
// Request Builders
// =============================================================================

/// Builds a request with an optional bearer token.
pub fn request(method: Method, path: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).expect("request")
}

/// Builds a JSON request with an optional bearer token.
pub fn json_request(
    method: Method,
    path: &str,
    token: Option<&str>,
    body: serde_json::Value,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder
        .body(Body::from(body.to_string()))
        .expect("request")
}

/// Attaches a correlation ID header to a request.
pub fn with_correlation(mut request: Request<Body>, correlation_id: &str) -> Request<Body> {
    request.headers_mut().insert(
        "X-Correlation-ID",
        correlation_id.parse().expect("header value"),
    );
    request
}

// =============================================================================
// Response Helpers
// =============================================================================

/// Reads a response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("valid JSON body")
}

/// Returns the echoed correlation ID header.
pub fn correlation_header(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get("X-Correlation-ID")
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_string())
}
