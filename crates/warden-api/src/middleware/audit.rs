// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Audit logging middleware.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::{
    body::Body,
    http::{Request, StatusCode},
    response::Response,
};
use tower::{Layer, Service};
use warden_core::audit::{AuditLogger, AuditRecord};
use warden_core::{Action, Outcome, Resource, ANONYMOUS};

use crate::auth::Principal;
use crate::middleware::CorrelationId;

// =============================================================================
// MutationReport
// =============================================================================

/// What a mutating request did, attached to the response by the stage that
/// resolved it.
///
/// Handlers attach a report after the registry call settles; the policy
/// enforcement layer attaches one when it denies a mutation. The audit
/// middleware consumes the report and emits exactly one mutation record
/// per request.
#[derive(Debug, Clone, PartialEq)]
pub struct MutationReport {
    /// The affected resource.
    pub resource: Resource,
    /// The attempted action.
    pub action: Action,
    /// How the operation ended.
    pub outcome: Outcome,
}

impl MutationReport {
    /// Creates a report for a completed mutation.
    pub fn success(resource: Resource, action: Action) -> Self {
        Self {
            resource,
            action,
            outcome: Outcome::Success,
        }
    }

    /// Creates a report for a mutation that failed downstream.
    pub fn failure(resource: Resource, action: Action, reason: impl Into<String>) -> Self {
        Self {
            resource,
            action,
            outcome: Outcome::failure(reason),
        }
    }
}

// =============================================================================
// AuditLayer
// =============================================================================

/// Layer for audit logging.
///
/// This layer wraps protected routes and turns response state into audit
/// records: a [`MutationReport`] becomes a mutation record, a 500 becomes
/// an unhandled-error record. Records are written without blocking the
/// response; a failing sink is logged and otherwise ignored.
#[derive(Clone)]
pub struct AuditLayer {
    logger: Arc<dyn AuditLogger>,
}

impl AuditLayer {
    /// Creates a new audit layer.
    pub fn new(logger: Arc<dyn AuditLogger>) -> Self {
        Self { logger }
    }
}

impl<S> Layer<S> for AuditLayer {
    type Service = AuditMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuditMiddleware {
            inner,
            logger: self.logger.clone(),
        }
    }
}

// =============================================================================
// AuditMiddleware
// =============================================================================

/// Middleware for audit logging.
#[derive(Clone)]
pub struct AuditMiddleware<S> {
    inner: S,
    logger: Arc<dyn AuditLogger>,
}

impl<S> Service<Request<Body>> for AuditMiddleware<S>
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

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let logger = self.logger.clone();
        let correlation_id = req
            .extensions()
            .get::<CorrelationId>()
            .map(|c| c.as_str().to_string())
            .unwrap_or_default();
        let identity = req
            .extensions()
            .get::<Principal>()
            .map(|p| p.identity.clone())
            .unwrap_or_else(|| ANONYMOUS.to_string());
        let method = req.method().clone();
        let path = req.uri().path().to_string();

        let mut inner = self.inner.clone();

        Box::pin(async move {
            let response = inner.call(req).await?;
            let status = response.status();

            // A 500 means something escaped the handler; record that and
            // nothing else for this request.
            let record = if status == StatusCode::INTERNAL_SERVER_ERROR {
                Some(
                    AuditRecord::unhandled_error(
                        &identity,
                        &correlation_id,
                        format!("{} {} returned HTTP 500", method, path),
                    )
                    .with_details(serde_json::json!({
                        "method": method.as_str(),
                        "path": path,
                    })),
                )
            } else {
                response.extensions().get::<MutationReport>().map(|report| {
                    AuditRecord::mutation(
                        &identity,
                        &correlation_id,
                        report.resource,
                        report.action,
                        report.outcome.clone(),
                    )
                })
            };

            if let Some(record) = record {
                // Fire and forget logging (non-blocking)
                tokio::spawn(async move {
                    if let Err(e) = logger.log(record).await {
                        tracing::warn!(error = %e, "Failed to write audit record");
                    }
                });
            }

            Ok(response)
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
