//! Authentication and role checks that resolve before any query runs.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, get_auth, offline_app, post_json, post_json_auth, post_raw};
use serde_json::json;

// ---------------------------------------------------------------------------
// Bearer tokens
// ---------------------------------------------------------------------------

#[tokio::test]
async fn current_user_requires_a_token() {
    let app = offline_app();

    let response = get(app.router(), "/api/auth/user/").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["code"], "UNAUTHORIZED");
    assert_eq!(json["error"], "Missing Authorization header");
}

#[tokio::test]
async fn garbage_token_is_rejected() {
    let app = offline_app();

    let response = get_auth(app.router(), "/api/auth/user/", "not-a-jwt").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["error"], "Invalid or expired token");
}

#[tokio::test]
async fn token_signed_with_another_secret_is_rejected() {
    let app = offline_app();
    let mut other = app.state.config.jwt.clone();
    other.secret = "a-completely-different-signing-secret".into();
    let forged = gridops_api::auth::jwt::generate_access_token(1, "admin", "admin", &other).unwrap();

    let response = get_auth(app.router(), "/api/audit-logs/", &forged).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Admin-only routes
// ---------------------------------------------------------------------------

#[tokio::test]
async fn admin_routes_require_a_token() {
    let app = offline_app();

    let audit = get(app.router(), "/api/audit-logs/").await;
    let users = post_json(app.router(), "/api/admin/users/", json!({ "username": "x" })).await;
    let staff = post_json(app.router(), "/api/staff/", json!({ "name": "Ama" })).await;

    assert_eq!(audit.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(users.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(staff.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn admin_routes_forbid_ordinary_users() {
    let app = offline_app();
    let token = app.user_token();

    let audit = get_auth(app.router(), "/api/audit-logs/", &token).await;
    let users = post_json_auth(
        app.router(),
        "/api/admin/users/",
        json!({ "username": "x" }),
        &token,
    )
    .await;
    let suspend = post_json_auth(app.router(), "/api/staff/4/suspend/", json!({}), &token).await;

    assert_eq!(audit.status(), StatusCode::FORBIDDEN);
    assert_eq!(users.status(), StatusCode::FORBIDDEN);
    assert_eq!(suspend.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(audit).await["code"], "FORBIDDEN");
}

#[tokio::test]
async fn staff_name_is_required() {
    let app = offline_app();

    let response = post_json_auth(
        app.router(),
        "/api/staff/",
        json!({ "name": "   " }),
        &app.admin_token(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn staff_email_is_validated() {
    let app = offline_app();

    let response = post_json_auth(
        app.router(),
        "/api/staff/",
        json!({ "name": "Ama", "email": "nope" }),
        &app.admin_token(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

// ---------------------------------------------------------------------------
// Login helpers
// ---------------------------------------------------------------------------

#[tokio::test]
async fn lookup_without_email_is_a_bad_request() {
    let app = offline_app();

    let response = post_json(app.router(), "/api/auth/lookup/", json!({ "email": "  " })).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "missing email");
}

#[tokio::test]
async fn set_password_requires_all_fields() {
    let app = offline_app();
    let body = json!({ "username": "ama", "password": "long-enough-pass" });

    let response = post_json(app.router(), "/api/auth/set-password/", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "missing fields");
}

#[tokio::test]
async fn token_request_needs_username_and_password() {
    let app = offline_app();

    let response = post_json(app.router(), "/api/auth/token/", json!({ "username": "ama" })).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn malformed_refresh_body_is_a_bad_request() {
    let app = offline_app();

    let response = post_raw(app.router(), "/api/auth/token/refresh/", "application/json", "{").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
