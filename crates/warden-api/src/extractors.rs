// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Custom extractors for API handlers.

use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use uuid::Uuid;

use crate::auth::Principal;
use crate::error::ApiError;
use crate::middleware::CorrelationId;

// =============================================================================
// Auth Extractor
// =============================================================================

/// Extractor for authenticated requests.
///
/// Extracts the [`Principal`] placed in request extensions by the
/// authentication gate. Returns 401 if the gate did not run for this route.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(Auth(principal): Auth) -> impl IntoResponse {
///     format!("Hello, {}", principal.identity)
/// }
/// ```
pub struct Auth(pub Principal);

impl<S> FromRequestParts<S> for Auth
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .map(Auth)
            .ok_or_else(|| ApiError::unauthenticated("no principal in request"))
    }
}

// =============================================================================
// Correlation Extractor
// =============================================================================

/// Extractor for the request's correlation identifier.
///
/// The correlation layer resolves one for every request; the fallback here
/// only fires in tests that bypass the full pipeline.
pub struct Correlation(pub CorrelationId);

impl<S> FromRequestParts<S> for Correlation
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let id = parts
            .extensions
            .get::<CorrelationId>()
            .cloned()
            .unwrap_or_else(CorrelationId::generate);

        Ok(Correlation(id))
    }
}

// =============================================================================
// Record ID Extractor
// =============================================================================

/// Extractor for a record ID from the path.
pub struct RecordIdPath(pub Uuid);

impl<S> FromRequestParts<S> for RecordIdPath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::bad_request(format!("Invalid record ID: {}", e)))?;

        let id = raw
            .parse::<Uuid>()
            .map_err(|_| ApiError::bad_request(format!("Invalid record ID: {}", raw)))?;

        Ok(RecordIdPath(id))
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;
    use axum::http::Request;

    #[tokio::test]
    async fn test_auth_extractor() {
        let mut req = Request::builder()
            .uri("/test")
            .body(axum::body::Body::empty())
            .unwrap();
        req.extensions_mut()
            .insert(Principal::new("bond", vec![Role::FieldAgent]));

        let (mut parts, _) = req.into_parts();
        let Auth(principal) = Auth::from_request_parts(&mut parts, &()).await.unwrap();

        assert_eq!(principal.identity, "bond");
    }

    #[tokio::test]
    async fn test_auth_extractor_rejects_missing_principal() {
        let req = Request::builder()
            .uri("/test")
            .body(axum::body::Body::empty())
            .unwrap();

        let (mut parts, _) = req.into_parts();
        let result = Auth::from_request_parts(&mut parts, &()).await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_correlation_extractor_falls_back_to_generated() {
        let req = Request::builder()
            .uri("/test")
            .body(axum::body::Body::empty())
            .unwrap();

        let (mut parts, _) = req.into_parts();
        let Correlation(id) = Correlation::from_request_parts(&mut parts, &())
            .await
            .unwrap();

        assert!(!id.as_str().is_empty());
    }
}
