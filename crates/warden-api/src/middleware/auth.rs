// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Token authentication middleware.

use std::collections::HashSet;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::{
    body::Body,
    http::{header, Request},
    response::{IntoResponse, Response},
};
use tower::{Layer, Service};
use warden_core::audit::{AuditLogger, AuditRecord};

use crate::auth::TokenCodec;
use crate::error::ApiError;
use crate::middleware::CorrelationId;

// =============================================================================
// AuthLayer
// =============================================================================

/// Layer for bearer token authentication.
///
/// This layer wraps services to enforce the authentication gate: it extracts
/// the token from the Authorization header, verifies it, and places the
/// resolved principal in request extensions. No request reaches a protected
/// handler without passing through here.
#[derive(Clone)]
pub struct AuthLayer {
    codec: TokenCodec,
    audit: Arc<dyn AuditLogger>,
    public_paths: Arc<HashSet<String>>,
}

impl AuthLayer {
    /// Creates a new auth layer.
    pub fn new(codec: TokenCodec, audit: Arc<dyn AuditLogger>) -> Self {
        Self {
            codec,
            audit,
            public_paths: Arc::new(HashSet::new()),
        }
    }

    /// Adds public paths that don't require authentication.
    pub fn with_public_paths(mut self, paths: Vec<String>) -> Self {
        self.public_paths = Arc::new(paths.into_iter().collect());
        self
    }

    /// Creates with default public paths.
    pub fn with_default_public_paths(self) -> Self {
        self.with_public_paths(vec![
            "/health".to_string(),
            "/api/v1/auth/login".to_string(),
        ])
    }
}

impl<S> Layer<S> for AuthLayer {
    type Service = AuthMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthMiddleware {
            inner,
            codec: self.codec.clone(),
            audit: self.audit.clone(),
            public_paths: self.public_paths.clone(),
        }
    }
}

// =============================================================================
// AuthMiddleware
// =============================================================================

/// Middleware for bearer token authentication.
#[derive(Clone)]
pub struct AuthMiddleware<S> {
    inner: S,
    codec: TokenCodec,
    audit: Arc<dyn AuditLogger>,
    public_paths: Arc<HashSet<String>>,
}

impl<S> AuthMiddleware<S> {
    /// Checks if a path is public.
    fn is_public_path(&self, path: &str) -> bool {
        self.public_paths.contains(path)
    }
}

impl<S> Service<Request<Body>> for AuthMiddleware<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<Body>) -> Self::Future {
        let codec = self.codec.clone();
        let audit = self.audit.clone();
        let is_public = self.is_public_path(req.uri().path());
        let mut inner = self.inner.clone();

        Box::pin(async move {
            if is_public {
                return inner.call(req).await;
            }

            let correlation_id = req
                .extensions()
                .get::<CorrelationId>()
                .map(|c| c.as_str().to_string())
                .unwrap_or_default();

            let Some(token) = extract_bearer_token(&req) else {
                tracing::debug!("No authorization token provided");
                emit(&audit, AuditRecord::auth_failure(&correlation_id, "missing_token"));
                return Ok(unauthenticated_response());
            };

            let principal = match codec.decode(&token) {
                Ok(principal) => principal,
                Err(e) => {
                    // The variant stays internal; callers see a uniform 401
                    tracing::debug!(reason = e.as_str(), "Token verification failed");
                    emit(&audit, AuditRecord::auth_failure(&correlation_id, e.as_str()));
                    return Ok(unauthenticated_response());
                }
            };

            emit(
                &audit,
                AuditRecord::auth_success(&principal.identity, &correlation_id),
            );

            req.extensions_mut().insert(principal);

            inner.call(req).await
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Extracts the bearer token from the Authorization header.
fn extract_bearer_token<B>(req: &Request<B>) -> Option<String> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer ").map(|s| s.to_string()))
}

/// The uniform 401 returned for every authentication failure.
fn unauthenticated_response() -> Response {
    ApiError::unauthenticated("token verification failed").into_response()
}

/// Writes an audit record without blocking the request.
fn emit(audit: &Arc<dyn AuditLogger>, record: AuditRecord) {
    let audit = audit.clone();
    tokio::spawn(async move {
        if let Err(e) = audit.log(record).await {
            tracing::warn!(error = %e, "Failed to write audit record");
        }
    });
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use warden_core::audit::NoOpAuditLogger;

    #[test]
    fn test_extract_bearer_token() {
        use axum::http::HeaderValue;

        let mut req = Request::builder()
            .uri("/test")
            .body(Body::empty())
            .unwrap();

        // No header
        assert!(extract_bearer_token(&req).is_none());

        // Invalid format
        req.headers_mut()
            .insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert!(extract_bearer_token(&req).is_none());

        // Valid bearer token
        req.headers_mut().insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer mytoken123"),
        );
        assert_eq!(extract_bearer_token(&req), Some("mytoken123".to_string()));
    }

    #[test]
    fn test_public_paths() {
        let codec = TokenCodec::new(crate::auth::TokenConfig::new(
            "test-secret-key-that-is-long-enough-for-testing",
        ))
        .unwrap();

        let layer = AuthLayer::new(codec, Arc::new(NoOpAuditLogger))
            .with_default_public_paths();

        let middleware = layer.layer(tower::service_fn(|_req: Request<Body>| async {
            Ok::<_, std::convert::Infallible>(Response::new(Body::empty()))
        }));

        assert!(middleware.is_public_path("/health"));
        assert!(middleware.is_public_path("/api/v1/auth/login"));
        assert!(!middleware.is_public_path("/api/v1/agents"));
    }
}
