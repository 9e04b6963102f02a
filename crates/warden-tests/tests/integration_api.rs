// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # API Integration Tests
//!
//! End-to-end tests for the Warden gateway, driving the full router
//! in-process:
//!
//! - Login round-trips and credential failure collapsing
//! - Token expiry and tamper rejection
//! - Role-based access enforcement across every route
//! - Correlation ID propagation
//! - Audit trail contents for success, denial, and failure paths
//!
//! ## Test Categories
//!
//! - `test_auth_*`: Authentication gate tests
//! - `test_access_*`: Policy enforcement tests
//! - `test_correlation_*`: Correlation ID tests
//! - `test_audit_*`: Audit trail tests

use axum::http::{Method, StatusCode};
use uuid::Uuid;
use warden_api::auth::{AccessPolicy, Role};
use warden_core::{Action, AuditKind, Outcome, Resource, ANONYMOUS};
use warden_tests::prelude::*;

// =============================================================================
// Helpers
// =============================================================================

/// Collection path for a resource.
fn collection_path(resource: Resource) -> &'static str {
    match resource {
        Resource::Agent => "/api/v1/agents",
        Resource::Alias => "/api/v1/aliases",
        Resource::Clearance => "/api/v1/clearances",
    }
}

/// A valid create body for a resource. Aliases need a live agent to point at.
fn create_body(resource: Resource, agent_id: Uuid) -> serde_json::Value {
    match resource {
        Resource::Agent => serde_json::json!({ "codename": "skyfall" }),
        Resource::Alias => serde_json::json!({
            "agent_id": agent_id,
            "cover_name": "Mr. Somerset",
        }),
        Resource::Clearance => serde_json::json!({
            "subject": "station-h",
            "level": "SECRET",
        }),
    }
}

/// A valid update body for a resource.
fn update_body(resource: Resource) -> serde_json::Value {
    match resource {
        Resource::Agent => serde_json::json!({ "status": "retired" }),
        Resource::Alias => serde_json::json!({ "cover_name": "Mr. Kilbourn" }),
        Resource::Clearance => serde_json::json!({ "level": "TOP_SECRET" }),
    }
}

/// Posts a create body and returns the new record's ID.
async fn post_record(
    gw: &TestGateway,
    token: &str,
    resource: Resource,
    body: serde_json::Value,
) -> Uuid {
    let response = gw
        .send(json_request(
            Method::POST,
            collection_path(resource),
            Some(token),
            body,
        ))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = body_json(response).await;
    body["data"]["id"]
        .as_str()
        .expect("record id")
        .parse()
        .expect("uuid")
}

/// Creates a record as the admin and returns its ID.
async fn create_as_admin(gw: &TestGateway, admin_token: &str, resource: Resource) -> Uuid {
    let agent_id = if resource == Resource::Alias {
        post_record(
            gw,
            admin_token,
            Resource::Agent,
            create_body(Resource::Agent, Uuid::nil()),
        )
        .await
    } else {
        Uuid::nil()
    };

    post_record(gw, admin_token, resource, create_body(resource, agent_id)).await
}

// =============================================================================
// Authentication Tests
// =============================================================================

#[tokio::test]
async fn test_auth_health_is_public() {
    let gw = TestGateway::new();

    let response = gw.send(request(Method::GET, "/health", None)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_auth_login_round_trip() {
    let gw = TestGateway::new();

    let token = gw.login(ADMIN_USER.0, ADMIN_USER.1).await;
    assert_eq!(token.split('.').count(), 3);

    let response = gw
        .send(request(Method::GET, "/api/v1/agents", Some(&token)))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["success"], true);
}

#[tokio::test]
async fn test_auth_me_resolves_identity_and_roles() {
    let gw = TestGateway::new();
    let token = gw.login(FIELD_AGENT_USER.0, FIELD_AGENT_USER.1).await;

    let response = gw
        .send(request(Method::GET, "/api/v1/auth/me", Some(&token)))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["identity"], FIELD_AGENT_USER.0);
    assert_eq!(body["roles"], serde_json::json!(["FIELD_AGENT"]));
}

#[tokio::test]
async fn test_auth_wrong_password_collapses() {
    let gw = TestGateway::new();

    let response = gw
        .send(json_request(
            Method::POST,
            "/api/v1/auth/login",
            None,
            serde_json::json!({ "username": ADMIN_USER.0, "password": "wrong" }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let wrong_password = body_json(response).await;

    let response = gw
        .send(json_request(
            Method::POST,
            "/api/v1/auth/login",
            None,
            serde_json::json!({ "username": "no-such-user", "password": "wrong" }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let unknown_user = body_json(response).await;

    // Unknown identity and wrong password are indistinguishable
    assert_eq!(wrong_password, unknown_user);
    assert_eq!(wrong_password["error"]["code"], "INVALID_CREDENTIALS");
}

#[tokio::test]
async fn test_auth_missing_token_rejected() {
    let gw = TestGateway::new();

    let response = gw.send(request(Method::GET, "/api/v1/agents", None)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "UNAUTHENTICATED");
    assert_eq!(body["error"]["message"], "Authentication required");
}

#[tokio::test]
async fn test_auth_expired_token_rejected() {
    let gw = TestGateway::new();

    // Signed with the real secret but already past expiry and leeway
    let expired = gw
        .codec
        .issue_with_ttl("m", &[Role::Admin], -120)
        .expect("token");

    let response = gw
        .send(request(Method::GET, "/api/v1/agents", Some(&expired)))
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = body_json(response).await;
    assert_eq!(body["error"]["message"], "Authentication required");
}

#[tokio::test]
async fn test_auth_tampered_token_indistinguishable_from_missing() {
    let gw = TestGateway::new();
    let token = gw.login(ADMIN_USER.0, ADMIN_USER.1).await;

    let parts: Vec<&str> = token.split('.').collect();
    let tampered = format!("{}.{}.AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA", parts[0], parts[1]);

    let tampered_response = gw
        .send(request(Method::GET, "/api/v1/agents", Some(&tampered)))
        .await;
    let missing_response = gw.send(request(Method::GET, "/api/v1/agents", None)).await;

    assert_eq!(tampered_response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(missing_response.status(), StatusCode::UNAUTHORIZED);

    // Identical status and body: the failure cause never leaks
    let tampered_body = body_json(tampered_response).await;
    let missing_body = body_json(missing_response).await;
    assert_eq!(tampered_body, missing_body);
}

// =============================================================================
// Access Policy Tests
// =============================================================================

/// Every (role, resource, action) cell, end to end over HTTP.
///
/// The unit-level decision engine is the oracle: a grant must produce a
/// non-403 status and a denial must produce exactly 403.
#[tokio::test]
async fn test_access_full_permission_matrix() {
    let gw = TestGateway::new();
    let admin_token = gw.login(ADMIN_USER.0, ADMIN_USER.1).await;

    let users = [
        (Role::Admin, ADMIN_USER),
        (Role::FieldAgent, FIELD_AGENT_USER),
        (Role::Hr, HR_USER),
        (Role::IntelligenceAnalyst, ANALYST_USER),
    ];

    for (role, (username, password)) in users {
        let token = gw.login(username, password).await;

        for resource in [Resource::Agent, Resource::Alias, Resource::Clearance] {
            let path = collection_path(resource);

            // Read (list)
            let response = gw.send(request(Method::GET, path, Some(&token))).await;
            if AccessPolicy::role_allows(role, resource, Action::Read) {
                assert_eq!(response.status(), StatusCode::OK, "{role} read {resource}");
            } else {
                assert_eq!(
                    response.status(),
                    StatusCode::FORBIDDEN,
                    "{role} read {resource}"
                );
            }

            // Create
            let agent_id = create_as_admin(&gw, &admin_token, Resource::Agent).await;
            let response = gw
                .send(json_request(
                    Method::POST,
                    path,
                    Some(&token),
                    create_body(resource, agent_id),
                ))
                .await;
            if AccessPolicy::role_allows(role, resource, Action::Create) {
                assert_eq!(
                    response.status(),
                    StatusCode::CREATED,
                    "{role} create {resource}"
                );
            } else {
                assert_eq!(
                    response.status(),
                    StatusCode::FORBIDDEN,
                    "{role} create {resource}"
                );
            }

            // Update
            let id = create_as_admin(&gw, &admin_token, resource).await;
            let response = gw
                .send(json_request(
                    Method::PUT,
                    &format!("{path}/{id}"),
                    Some(&token),
                    update_body(resource),
                ))
                .await;
            if AccessPolicy::role_allows(role, resource, Action::Update) {
                assert_eq!(response.status(), StatusCode::OK, "{role} update {resource}");
            } else {
                assert_eq!(
                    response.status(),
                    StatusCode::FORBIDDEN,
                    "{role} update {resource}"
                );
            }

            // Delete
            let id = create_as_admin(&gw, &admin_token, resource).await;
            let response = gw
                .send(request(
                    Method::DELETE,
                    &format!("{path}/{id}"),
                    Some(&token),
                ))
                .await;
            if AccessPolicy::role_allows(role, resource, Action::Delete) {
                assert_eq!(
                    response.status(),
                    StatusCode::NO_CONTENT,
                    "{role} delete {resource}"
                );
            } else {
                assert_eq!(
                    response.status(),
                    StatusCode::FORBIDDEN,
                    "{role} delete {resource}"
                );
            }
        }
    }
}

#[tokio::test]
async fn test_access_forbidden_distinct_from_unauthenticated() {
    let gw = TestGateway::new();
    let token = gw.login(HR_USER.0, HR_USER.1).await;

    // Authenticated but not permitted
    let response = gw
        .send(request(Method::GET, "/api/v1/agents", Some(&token)))
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "FORBIDDEN");

    // Not authenticated at all
    let response = gw.send(request(Method::GET, "/api/v1/agents", None)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "UNAUTHENTICATED");
}

#[tokio::test]
async fn test_access_missing_record_is_not_found_for_permitted_caller() {
    let gw = TestGateway::new();
    let token = gw.login(ADMIN_USER.0, ADMIN_USER.1).await;

    let response = gw
        .send(request(
            Method::GET,
            &format!("/api/v1/agents/{}", Uuid::now_v7()),
            Some(&token),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_access_docs_admin_only() {
    let gw = TestGateway::new();

    let admin = gw.login(ADMIN_USER.0, ADMIN_USER.1).await;
    let response = gw
        .send(request(Method::GET, "/api/v1/docs", Some(&admin)))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["name"], "warden");

    let agent = gw.login(FIELD_AGENT_USER.0, FIELD_AGENT_USER.1).await;
    let response = gw
        .send(request(Method::GET, "/api/v1/docs", Some(&agent)))
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = gw.send(request(Method::GET, "/api/v1/docs", None)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_access_alias_requires_live_agent() {
    let gw = TestGateway::new();
    let token = gw.login(ADMIN_USER.0, ADMIN_USER.1).await;

    let response = gw
        .send(json_request(
            Method::POST,
            "/api/v1/aliases",
            Some(&token),
            create_body(Resource::Alias, Uuid::now_v7()),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// =============================================================================
// Correlation Tests
// =============================================================================

#[tokio::test]
async fn test_correlation_supplied_id_echoed() {
    let gw = TestGateway::new();

    let req = with_correlation(request(Method::GET, "/health", None), "corr-supplied-1");
    let response = gw.send(req).await;

    assert_eq!(
        correlation_header(&response).as_deref(),
        Some("corr-supplied-1")
    );
}

#[tokio::test]
async fn test_correlation_echoed_on_auth_failure() {
    let gw = TestGateway::new();

    let req = with_correlation(
        request(Method::GET, "/api/v1/agents", None),
        "corr-denied-1",
    );
    let response = gw.send(req).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        correlation_header(&response).as_deref(),
        Some("corr-denied-1")
    );
}

#[tokio::test]
async fn test_correlation_generated_ids_are_distinct() {
    let gw = TestGateway::new();

    let first = gw.send(request(Method::GET, "/health", None)).await;
    let second = gw.send(request(Method::GET, "/health", None)).await;

    let first_id = correlation_header(&first).expect("generated id");
    let second_id = correlation_header(&second).expect("generated id");
    assert_ne!(first_id, second_id);
}

#[tokio::test]
async fn test_correlation_concurrent_requests_keep_supplied_ids() {
    let gw = TestGateway::new();

    let a = gw.send(with_correlation(
        request(Method::GET, "/health", None),
        "corr-concurrent-a",
    ));
    let b = gw.send(with_correlation(
        request(Method::GET, "/health", None),
        "corr-concurrent-b",
    ));

    let (a, b) = tokio::join!(a, b);
    assert_eq!(correlation_header(&a).as_deref(), Some("corr-concurrent-a"));
    assert_eq!(correlation_header(&b).as_deref(), Some("corr-concurrent-b"));
}

/// A caller may reuse one correlation id across concurrent requests; each
/// request still yields its own audit record carrying that id.
#[tokio::test]
async fn test_correlation_shared_id_yields_independent_audit_records() {
    let gw = TestGateway::new();

    let a = gw.send(with_correlation(
        request(Method::GET, "/api/v1/agents", None),
        "corr-shared",
    ));
    let b = gw.send(with_correlation(
        request(Method::GET, "/api/v1/agents", None),
        "corr-shared",
    ));

    let (a, b) = tokio::join!(a, b);
    assert_eq!(a.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(b.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(correlation_header(&a).as_deref(), Some("corr-shared"));
    assert_eq!(correlation_header(&b).as_deref(), Some("corr-shared"));

    gw.settle().await;

    let records = gw.audit.records_where(|r| r.correlation_id == "corr-shared");
    assert_eq!(records.len(), 2);
    assert!(records.iter().all(|r| r.kind == AuditKind::AuthFailure));
    assert_ne!(records[0].id, records[1].id);
}

// =============================================================================
// Audit Trail Tests
// =============================================================================

#[tokio::test]
async fn test_audit_missing_token_recorded_as_anonymous() {
    let gw = TestGateway::new();

    let req = with_correlation(
        request(Method::GET, "/api/v1/agents", None),
        "corr-audit-anon",
    );
    gw.send(req).await;
    gw.settle().await;

    let failures = gw
        .audit
        .records_where(|r| r.correlation_id == "corr-audit-anon");
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].kind, AuditKind::AuthFailure);
    assert_eq!(failures[0].identity, ANONYMOUS);
}

#[tokio::test]
async fn test_audit_failed_login_recorded() {
    let gw = TestGateway::new();

    let req = with_correlation(
        json_request(
            Method::POST,
            "/api/v1/auth/login",
            None,
            serde_json::json!({ "username": ADMIN_USER.0, "password": "wrong" }),
        ),
        "corr-audit-login",
    );
    gw.send(req).await;
    gw.settle().await;

    let records = gw
        .audit
        .records_where(|r| r.correlation_id == "corr-audit-login");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].kind, AuditKind::AuthFailure);
    assert_eq!(records[0].identity, ANONYMOUS);
}

#[tokio::test]
async fn test_audit_successful_mutation_recorded_once() {
    let gw = TestGateway::new();
    let token = gw.login(ADMIN_USER.0, ADMIN_USER.1).await;

    let req = with_correlation(
        json_request(
            Method::POST,
            "/api/v1/agents",
            Some(&token),
            serde_json::json!({ "codename": "goldeneye" }),
        ),
        "corr-audit-create",
    );
    let response = gw.send(req).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    gw.settle().await;

    let mutations = gw.audit.records_where(|r| {
        r.correlation_id == "corr-audit-create" && r.kind == AuditKind::Mutation
    });
    assert_eq!(mutations.len(), 1);
    assert_eq!(mutations[0].identity, ADMIN_USER.0);
    assert_eq!(mutations[0].resource, Some(Resource::Agent));
    assert_eq!(mutations[0].action, Some(Action::Create));
    assert_eq!(mutations[0].outcome, Outcome::Success);
}

#[tokio::test]
async fn test_audit_denied_alias_delete_full_sequence() {
    let gw = TestGateway::new();
    let admin = gw.login(ADMIN_USER.0, ADMIN_USER.1).await;
    let alias_id = create_as_admin(&gw, &admin, Resource::Alias).await;

    let hr = gw.login(HR_USER.0, HR_USER.1).await;
    let req = with_correlation(
        request(
            Method::DELETE,
            &format!("/api/v1/aliases/{alias_id}"),
            Some(&hr),
        ),
        "corr-audit-denied",
    );
    let response = gw.send(req).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    gw.settle().await;

    // The valid token is recorded, then the denial, under one correlation ID
    let records = gw
        .audit
        .records_where(|r| r.correlation_id == "corr-audit-denied");
    assert_eq!(records.len(), 2);

    let auth = records
        .iter()
        .find(|r| r.kind == AuditKind::AuthSuccess)
        .expect("auth record");
    assert_eq!(auth.identity, HR_USER.0);

    let denial = records
        .iter()
        .find(|r| r.kind == AuditKind::Mutation)
        .expect("mutation record");
    assert_eq!(denial.identity, HR_USER.0);
    assert_eq!(denial.resource, Some(Resource::Alias));
    assert_eq!(denial.action, Some(Action::Delete));
    assert_eq!(denial.outcome, Outcome::Denied);

    // The record was never touched
    let response = gw
        .send(request(
            Method::GET,
            &format!("/api/v1/aliases/{alias_id}"),
            Some(&admin),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_audit_denied_read_leaves_no_mutation_record() {
    let gw = TestGateway::new();
    let token = gw.login(FIELD_AGENT_USER.0, FIELD_AGENT_USER.1).await;

    let req = with_correlation(
        request(Method::GET, "/api/v1/clearances", Some(&token)),
        "corr-audit-read",
    );
    let response = gw.send(req).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    gw.settle().await;

    let records = gw
        .audit
        .records_where(|r| r.correlation_id == "corr-audit-read");
    // Only the token validation; denied reads are not mutations
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].kind, AuditKind::AuthSuccess);
}

#[tokio::test]
async fn test_audit_failed_mutation_recorded_with_reason() {
    let gw = TestGateway::new();
    let token = gw.login(ADMIN_USER.0, ADMIN_USER.1).await;

    let req = with_correlation(
        request(
            Method::DELETE,
            &format!("/api/v1/agents/{}", Uuid::now_v7()),
            Some(&token),
        ),
        "corr-audit-missing",
    );
    let response = gw.send(req).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    gw.settle().await;

    let mutations = gw.audit.records_where(|r| {
        r.correlation_id == "corr-audit-missing" && r.kind == AuditKind::Mutation
    });
    assert_eq!(mutations.len(), 1);
    assert!(matches!(mutations[0].outcome, Outcome::Failure { .. }));
}
