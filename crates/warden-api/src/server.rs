// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! API server implementation.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    routing::{get, post},
    Router,
};
use tower::{util::MapResponseLayer, ServiceBuilder};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;
use warden_core::Resource;

use crate::config::WardenConfig;
use crate::error::ApiResult;
use crate::handlers;
use crate::middleware::{AuditLayer, AuthLayer, AuthzLayer, CorrelationLayer};
use crate::state::AppState;

// =============================================================================
// ApiServer
// =============================================================================

/// The API server.
///
/// This is the main entry point for creating and running the HTTP server.
pub struct ApiServer {
    state: AppState,
    config: Arc<WardenConfig>,
}

impl ApiServer {
    /// Creates a new API server with the given state.
    pub fn new(state: AppState) -> Self {
        let config = state.config.clone();
        Self { state, config }
    }

    /// Creates the router with all routes and middleware.
    ///
    /// Pipeline order, outermost first: tracing, CORS, correlation
    /// resolution, timeout, the authentication gate, audit emission, panic
    /// containment. Panic containment sits innermost so the audit layer
    /// observes the synthesized 500 and the correlation layer still echoes
    /// the header on that path; the timeout sits inside correlation for the
    /// same reason. Policy enforcement is wired per route so each route
    /// declares exactly the operation it performs.
    pub fn router(&self) -> Router {
        let cors = create_cors_layer(&self.config);
        let auth = AuthLayer::new(
            self.state.token_codec.clone(),
            self.state.audit_logger.clone(),
        )
        .with_default_public_paths();
        let audit = AuditLayer::new(self.state.audit_logger.clone());

        let middleware_stack = ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(cors)
            .layer(CorrelationLayer::new())
            .layer(MapResponseLayer::new(|r: axum::response::Response<_>| {
                r.map(axum::body::Body::new)
            }))
            .layer(TimeoutLayer::with_status_code(
                StatusCode::REQUEST_TIMEOUT,
                self.config.request_timeout,
            ))
            .layer(auth)
            .layer(audit)
            .layer(MapResponseLayer::new(|r: axum::response::Response<_>| {
                r.map(axum::body::Body::new)
            }))
            .layer(CatchPanicLayer::custom(handle_panic));

        Router::new()
            // Health endpoint (public)
            .route("/health", get(handlers::health::health))
            // Auth endpoints
            .route("/api/v1/auth/login", post(handlers::auth::login))
            .route("/api/v1/auth/me", get(handlers::auth::current_user))
            // Agent endpoints
            .route(
                "/api/v1/agents",
                get(handlers::agents::list_agents)
                    .post(handlers::agents::create_agent)
                    .route_layer(AuthzLayer::resource(Resource::Agent)),
            )
            .route(
                "/api/v1/agents/{id}",
                get(handlers::agents::get_agent)
                    .put(handlers::agents::update_agent)
                    .delete(handlers::agents::delete_agent)
                    .route_layer(AuthzLayer::resource(Resource::Agent)),
            )
            // Alias endpoints
            .route(
                "/api/v1/aliases",
                get(handlers::aliases::list_aliases)
                    .post(handlers::aliases::create_alias)
                    .route_layer(AuthzLayer::resource(Resource::Alias)),
            )
            .route(
                "/api/v1/aliases/{id}",
                get(handlers::aliases::get_alias)
                    .put(handlers::aliases::update_alias)
                    .delete(handlers::aliases::delete_alias)
                    .route_layer(AuthzLayer::resource(Resource::Alias)),
            )
            // Clearance endpoints
            .route(
                "/api/v1/clearances",
                get(handlers::clearances::list_clearances)
                    .post(handlers::clearances::create_clearance)
                    .route_layer(AuthzLayer::resource(Resource::Clearance)),
            )
            .route(
                "/api/v1/clearances/{id}",
                get(handlers::clearances::get_clearance)
                    .put(handlers::clearances::update_clearance)
                    .delete(handlers::clearances::delete_clearance)
                    .route_layer(AuthzLayer::resource(Resource::Clearance)),
            )
            // Docs endpoint (admin only, inside the same pipeline)
            .route(
                "/api/v1/docs",
                get(handlers::docs::api_docs).route_layer(AuthzLayer::admin_only()),
            )
            // Apply middleware and state
            .layer(middleware_stack)
            .with_state(self.state.clone())
    }

    /// Runs the server.
    pub async fn run(self) -> ApiResult<()> {
        let addr = self.config.socket_addr();
        let router = self.router();

        info!("Starting API server on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| crate::error::ApiError::internal(format!("Failed to bind: {}", e)))?;

        axum::serve(listener, router)
            .await
            .map_err(|e| crate::error::ApiError::internal(format!("Server error: {}", e)))?;

        Ok(())
    }

    /// Runs the server with graceful shutdown.
    pub async fn run_with_shutdown(
        self,
        shutdown_signal: impl std::future::Future<Output = ()> + Send + 'static,
    ) -> ApiResult<()> {
        let addr = self.config.socket_addr();
        let audit_logger = self.state.audit_logger.clone();
        let router = self.router();

        info!("Starting API server on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| crate::error::ApiError::internal(format!("Failed to bind: {}", e)))?;

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal)
            .await
            .map_err(|e| crate::error::ApiError::internal(format!("Server error: {}", e)))?;

        // Flush any buffered audit records before exiting
        if let Err(e) = audit_logger.flush().await {
            tracing::warn!(error = %e, "Failed to flush audit log on shutdown");
        }

        info!("API server shutdown complete");

        Ok(())
    }

    /// Returns the server address.
    pub fn addr(&self) -> SocketAddr {
        self.config.socket_addr()
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Converts an escaped panic into a generic 500 with no internal detail.
fn handle_panic(_err: Box<dyn std::any::Any + Send + 'static>) -> axum::response::Response {
    use axum::response::IntoResponse;

    tracing::error!("Request handler panicked");
    crate::error::ApiError::internal("Unhandled panic").into_response()
}

/// Creates the CORS layer from configuration.
fn create_cors_layer(config: &WardenConfig) -> CorsLayer {
    let cors = &config.cors;

    let mut layer = CorsLayer::new().max_age(Duration::from_secs(cors.max_age));

    if cors.allowed_origins.contains(&"*".to_string()) {
        layer = layer.allow_origin(Any);
    } else {
        let origins: Vec<HeaderValue> = cors
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        layer = layer.allow_origin(AllowOrigin::list(origins));
    }

    let methods: Vec<Method> = cors
        .allowed_methods
        .iter()
        .filter_map(|m| m.parse().ok())
        .collect();
    layer = layer.allow_methods(methods);

    if cors.allowed_headers.contains(&"*".to_string()) {
        layer = layer.allow_headers(Any);
    } else {
        layer = layer.allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
        ]);
    }

    layer
}

// =============================================================================
// Server Builder
// =============================================================================

/// Builder for creating the API server.
pub struct ApiServerBuilder {
    state_builder: crate::state::AppStateBuilder,
}

impl ApiServerBuilder {
    /// Creates a new server builder.
    pub fn new() -> Self {
        Self {
            state_builder: AppState::builder(),
        }
    }

    /// Sets the configuration.
    pub fn config(mut self, config: WardenConfig) -> Self {
        self.state_builder = self.state_builder.config(config);
        self
    }

    /// Sets the user store.
    pub fn user_store(mut self, store: Arc<dyn warden_core::UserStore>) -> Self {
        self.state_builder = self.state_builder.user_store(store);
        self
    }

    /// Sets the registry.
    pub fn registry(mut self, registry: Arc<warden_core::Registry>) -> Self {
        self.state_builder = self.state_builder.registry(registry);
        self
    }

    /// Sets the audit logger.
    pub fn audit_logger(mut self, logger: Arc<dyn warden_core::AuditLogger>) -> Self {
        self.state_builder = self.state_builder.audit_logger(logger);
        self
    }

    /// Builds the server.
    pub fn build(self) -> ApiResult<ApiServer> {
        let state = self.state_builder.build()?;
        Ok(ApiServer::new(state))
    }
}

impl Default for ApiServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================
