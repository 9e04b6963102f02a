// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Access policy enforcement middleware.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use axum::{
    body::Body,
    http::{Method, Request},
    response::{IntoResponse, Response},
};
use tower::{Layer, Service};
use warden_core::{Action, Outcome, Resource};

use crate::auth::{AccessPolicy, Principal, Role};
use crate::error::ApiError;
use crate::middleware::MutationReport;

// =============================================================================
// Requirement
// =============================================================================

/// What a route demands of the caller.
#[derive(Debug, Clone, Copy)]
enum Requirement {
    /// The policy table must grant the caller the action implied by the
    /// HTTP method, on this resource.
    Resource(Resource),
    /// The ADMIN role must be held.
    AdminRole,
}

/// Maps an HTTP method to the action it performs on a resource.
fn method_to_action(method: &Method) -> Option<Action> {
    match *method {
        Method::GET | Method::HEAD => Some(Action::Read),
        Method::POST => Some(Action::Create),
        Method::PUT | Method::PATCH => Some(Action::Update),
        Method::DELETE => Some(Action::Delete),
        _ => None,
    }
}

// =============================================================================
// AuthzLayer
// =============================================================================

/// Layer enforcing the access policy for one route.
///
/// Applied per-route: each protected route declares the resource it fronts,
/// the action follows from the HTTP method, and the layer consults the
/// fixed policy before the handler runs. Fail closed: a missing principal
/// is a 401, a denied decision or an unmapped method is a 403.
#[derive(Clone)]
pub struct AuthzLayer {
    policy: AccessPolicy,
    requirement: Requirement,
}

impl AuthzLayer {
    /// Creates a layer guarding routes that operate on the given resource.
    pub fn resource(resource: Resource) -> Self {
        Self {
            policy: AccessPolicy::new(),
            requirement: Requirement::Resource(resource),
        }
    }

    /// Creates a layer requiring the ADMIN role, independent of the
    /// resource policy table.
    pub fn admin_only() -> Self {
        Self {
            policy: AccessPolicy::new(),
            requirement: Requirement::AdminRole,
        }
    }
}

impl<S> Layer<S> for AuthzLayer {
    type Service = AuthzMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthzMiddleware {
            inner,
            policy: self.policy,
            requirement: self.requirement,
        }
    }
}

// =============================================================================
// AuthzMiddleware
// =============================================================================

/// Middleware enforcing the access policy for one route.
#[derive(Clone)]
pub struct AuthzMiddleware<S> {
    inner: S,
    policy: AccessPolicy,
    requirement: Requirement,
}

impl<S> Service<Request<Body>> for AuthzMiddleware<S>
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
        let policy = self.policy;
        let requirement = self.requirement;
        let method = req.method().clone();
        let mut inner = self.inner.clone();

        Box::pin(async move {
            // The auth gate runs before any protected route; a missing
            // principal means the route was wired outside it.
            let Some(principal) = req.extensions().get::<Principal>().cloned() else {
                tracing::error!("No principal in request extensions; route is outside the auth gate");
                return Ok(
                    ApiError::unauthenticated("no principal in request").into_response()
                );
            };

            let operation = match requirement {
                Requirement::Resource(resource) => match method_to_action(&method) {
                    Some(action) => Some((resource, action)),
                    None => {
                        tracing::warn!(method = %method, "No action mapping for method");
                        return Ok(
                            ApiError::forbidden("Access denied by policy").into_response()
                        );
                    }
                },
                Requirement::AdminRole => None,
            };

            let allowed = match operation {
                Some((resource, action)) => {
                    policy.authorize(&principal, resource, action).is_allowed()
                }
                None => principal.has_role(Role::Admin),
            };

            if allowed {
                return inner.call(req).await;
            }

            tracing::warn!(
                identity = %principal.identity,
                requirement = ?requirement,
                method = %method,
                "Access denied by policy"
            );

            let mut response = ApiError::forbidden("Access denied by policy").into_response();

            // Denied mutations are audited; denied reads are only traced
            if let Some((resource, action)) = operation {
                if action.is_mutating() {
                    response.extensions_mut().insert(MutationReport {
                        resource,
                        action,
                        outcome: Outcome::Denied,
                    });
                }
            }

            Ok(response)
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
