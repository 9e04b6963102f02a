// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Request correlation middleware.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use axum::{
    body::Body,
    http::{HeaderValue, Request},
    response::Response,
};
use tower::{Layer, Service};
use uuid::Uuid;

/// Header carrying the correlation identifier.
pub const CORRELATION_HEADER: &str = "X-Correlation-ID";

/// Longest caller-supplied correlation value we accept.
const MAX_CORRELATION_LEN: usize = 128;

// =============================================================================
// CorrelationId
// =============================================================================

/// The correlation identifier attached to a request.
///
/// Taken verbatim from the `X-Correlation-ID` request header when present,
/// generated otherwise. Every audit record and the response header carry
/// the same value, so one caller-side identifier ties together all records
/// the request produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrelationId(String);

impl CorrelationId {
    /// Generates a fresh correlation identifier.
    pub fn generate() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Accepts a caller-supplied value if it is usable as a header value.
    ///
    /// Rejects empty, oversized, and non-ASCII values; the caller gets a
    /// generated identifier instead of an error.
    pub fn from_header_value(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.len() > MAX_CORRELATION_LEN {
            return None;
        }
        if !trimmed.chars().all(|c| c.is_ascii_graphic()) {
            return None;
        }
        Some(Self(trimmed.to_string()))
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// CorrelationLayer
// =============================================================================

/// Layer for request correlation.
///
/// Resolves the correlation identifier at the edge of the pipeline so every
/// later stage (authentication, audit, handlers) sees the same value, and
/// echoes it back on the response.
#[derive(Clone, Default)]
pub struct CorrelationLayer;

impl CorrelationLayer {
    /// Creates a new correlation layer.
    pub fn new() -> Self {
        Self
    }
}

impl<S> Layer<S> for CorrelationLayer {
    type Service = CorrelationMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        CorrelationMiddleware { inner }
    }
}

// =============================================================================
// CorrelationMiddleware
// =============================================================================

/// Middleware for request correlation.
#[derive(Clone)]
pub struct CorrelationMiddleware<S> {
    inner: S,
}

impl<S> Service<Request<Body>> for CorrelationMiddleware<S>
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
        let correlation_id = req
            .headers()
            .get(CORRELATION_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(CorrelationId::from_header_value)
            .unwrap_or_else(CorrelationId::generate);

        req.extensions_mut().insert(correlation_id.clone());

        let mut inner = self.inner.clone();

        Box::pin(async move {
            let mut response = inner.call(req).await?;

            // from_header_value guarantees the value is header-safe
            if let Ok(value) = HeaderValue::from_str(correlation_id.as_str()) {
                response.headers_mut().insert(CORRELATION_HEADER, value);
            }

            Ok(response)
        })
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_header_value() {
        assert_eq!(
            CorrelationId::from_header_value("req-42"),
            Some(CorrelationId("req-42".to_string()))
        );
        assert_eq!(CorrelationId::from_header_value(""), None);
        assert_eq!(CorrelationId::from_header_value("   "), None);
        assert_eq!(CorrelationId::from_header_value("has spaces inside"), None);
        assert_eq!(
            CorrelationId::from_header_value(&"x".repeat(MAX_CORRELATION_LEN + 1)),
            None
        );
    }

    #[test]
    fn test_generated_ids_are_distinct() {
        let a = CorrelationId::generate();
        let b = CorrelationId::generate();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_header_echoed_on_response() {
        let layer = CorrelationLayer::new();
        let mut service = layer.layer(tower::service_fn(|req: Request<Body>| async move {
            // The resolved id must be visible to inner stages
            assert!(req.extensions().get::<CorrelationId>().is_some());
            Ok::<_, std::convert::Infallible>(Response::new(Body::empty()))
        }));

        let req = Request::builder()
            .uri("/test")
            .header(CORRELATION_HEADER, "caller-supplied-id")
            .body(Body::empty())
            .unwrap();

        let response = tower::Service::call(&mut service, req).await.unwrap();

        assert_eq!(
            response.headers().get(CORRELATION_HEADER).unwrap(),
            "caller-supplied-id"
        );
    }

    #[tokio::test]
    async fn test_header_generated_when_missing() {
        let layer = CorrelationLayer::new();
        let mut service = layer.layer(tower::service_fn(|_req: Request<Body>| async {
            Ok::<_, std::convert::Infallible>(Response::new(Body::empty()))
        }));

        let req = Request::builder().uri("/test").body(Body::empty()).unwrap();
        let response = tower::Service::call(&mut service, req).await.unwrap();

        let header = response.headers().get(CORRELATION_HEADER).unwrap();
        assert!(!header.to_str().unwrap().is_empty());
    }
}
