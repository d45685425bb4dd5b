//! End-to-end flows against a real PostgreSQL database.
//!
//! `#[sqlx::test]` creates a throwaway database per test from `DATABASE_URL`.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, body_text, build_test_app, get, get_auth, patch_json_auth, post_json,
    post_multipart,
};
use gridops_api::auth::password::hash_password;
use gridops_db::models::staff::CreateStaff;
use gridops_db::models::user::CreateUser;
use gridops_db::repositories::{AuditLogRepo, StaffRepo, UserRepo};
use serde_json::json;
use sqlx::PgPool;

const FORM: &[(&str, &str)] = &[
    ("title", "Feeder trip"),
    ("description", "Feeder 3 tripped twice"),
    ("date_reported", "2024-04-02"),
    ("reported_by", "Ama Mensah"),
    ("location", "Substation 4"),
    ("severity", "critical"),
    ("status", "open"),
];

async fn create_fault(app: &common::TestApp) -> i64 {
    let response = post_multipart(app.router(), "/api/fault-reports/", FORM, None).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["id"].as_i64().unwrap()
}

// ---------------------------------------------------------------------------
// Fault lifecycle
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn created_fault_is_returned_by_detail(pool: PgPool) {
    let app = build_test_app(pool);
    let id = create_fault(&app).await;

    let response = get_auth(app.router(), &format!("/api/faults/{id}/"), &app.user_token()).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["title"], "Feeder trip");
    assert_eq!(json["reported_by"], "Ama Mensah");
    assert_eq!(json["severity"], "critical");
    assert_eq!(json["date_reported"], "2024-04-02");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn patch_changes_only_the_allowed_fields(pool: PgPool) {
    let staff = StaffRepo::create(
        &pool,
        &CreateStaff {
            name: "Kofi Owusu".into(),
            email: String::new(),
        },
    )
    .await
    .unwrap();
    let app = build_test_app(pool.clone());
    let id = create_fault(&app).await;

    let response = patch_json_auth(
        app.router(),
        &format!("/api/faults/{id}/"),
        json!({
            "status": "resolved",
            "resolution_remarks": "Relay replaced",
            "assigned_to": "kofi owusu",
            "title": "ignored"
        }),
        &app.user_token(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "resolved");
    assert_eq!(json["assigned_to"], "Kofi Owusu");

    let detail = body_json(
        get_auth(app.router(), &format!("/api/faults/{id}/"), &app.user_token()).await,
    )
    .await;
    assert_eq!(detail["title"], "Feeder trip");
    assert_eq!(detail["assigned_to_id"], staff.id);

    let logs = AuditLogRepo::list_recent(&pool, None).await.unwrap();
    let update = logs.iter().find(|l| l.action == "update").unwrap();
    assert_eq!(update.username.as_deref(), Some("tech"));
    assert_eq!(update.changes["status"]["to"], "resolved");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_assignee_is_not_found(pool: PgPool) {
    let app = build_test_app(pool);
    let id = create_fault(&app).await;

    let response = patch_json_auth(
        app.router(),
        &format!("/api/faults/{id}/"),
        json!({ "assigned_to": "Nobody" }),
        &app.user_token(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn feedback_is_listed_for_its_fault(pool: PgPool) {
    let app = build_test_app(pool);
    let id = create_fault(&app).await;

    let response = post_json(
        app.router(),
        "/api/fault-feedbacks/",
        json!({
            "fault_id": id,
            "staff_name": " Esi ",
            "staff_email": "esi@grid.example",
            "feedback_text": "Tripped again at noon"
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    assert_eq!(created["staff_name"], "Esi");
    assert_eq!(created["message"], "Feedback submitted successfully");

    let list = body_json(get(app.router(), &format!("/api/fault-feedbacks/{id}/")).await).await;
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(list[0]["feedback_text"], "Tripped again at noon");

    let unknown = get(app.router(), "/api/fault-feedbacks/999999/").await;
    assert_eq!(unknown.status(), StatusCode::OK);
    assert_eq!(body_json(unknown).await, json!([]));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn feedback_email_is_stored_as_given(pool: PgPool) {
    let app = build_test_app(pool);
    let id = create_fault(&app).await;

    let response = post_json(
        app.router(),
        "/api/fault-feedbacks/",
        json!({
            "fault_id": id,
            "staff_name": "Kofi",
            "staff_email": "kofi at the north yard",
            "feedback_text": "Still humming"
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let list = body_json(get(app.router(), &format!("/api/fault-feedbacks/{id}/")).await).await;
    assert_eq!(list[0]["staff_email"], "kofi at the north yard");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn set_password_accepts_short_password(pool: PgPool) {
    UserRepo::create(
        &pool,
        &CreateUser {
            username: "yaw".into(),
            email: "yaw@grid.example".into(),
            staff_id: None,
            password_hash: None,
            is_staff: false,
        },
    )
    .await
    .unwrap();
    let app = build_test_app(pool);

    let response = post_json(
        app.router(),
        "/api/auth/set-password/",
        json!({ "username": "yaw", "email": "yaw@grid.example", "password": "1234" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let login = post_json(
        app.router(),
        "/api/auth/token/",
        json!({ "username": "yaw", "password": "1234" }),
    )
    .await;
    assert_eq!(login.status(), StatusCode::OK);
}

// ---------------------------------------------------------------------------
// Accounts
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn set_password_then_login_by_email(pool: PgPool) {
    UserRepo::create(
        &pool,
        &CreateUser {
            username: "S100".into(),
            email: String::new(),
            staff_id: Some("S100".into()),
            password_hash: None,
            is_staff: false,
        },
    )
    .await
    .unwrap();
    let app = build_test_app(pool);

    let response = post_json(
        app.router(),
        "/api/auth/set-password/",
        json!({ "username": "s100", "email": "ama@grid.example", "password": "first-pass-123" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let again = post_json(
        app.router(),
        "/api/auth/set-password/",
        json!({ "username": "S100", "email": "ama@grid.example", "password": "second-pass-123" }),
    )
    .await;
    assert_eq!(again.status(), StatusCode::BAD_REQUEST);

    let response = post_json(
        app.router(),
        "/api/auth/token/",
        json!({ "username": "AMA@grid.example", "password": "first-pass-123" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let tokens = body_json(response).await;
    let access = tokens["access"].as_str().unwrap();

    let me = body_json(get_auth(app.router(), "/api/auth/user/", access).await).await;
    assert_eq!(me["username"], "S100");
    assert_eq!(me["email"], "ama@grid.example");

    let refreshed = post_json(
        app.router(),
        "/api/auth/token/refresh/",
        json!({ "refresh": tokens["refresh"] }),
    )
    .await;
    assert_eq!(refreshed.status(), StatusCode::OK);

    let reused = post_json(
        app.router(),
        "/api/auth/token/refresh/",
        json!({ "refresh": tokens["refresh"] }),
    )
    .await;
    assert_eq!(reused.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn wrong_password_is_rejected(pool: PgPool) {
    UserRepo::create(
        &pool,
        &CreateUser {
            username: "kofi".into(),
            email: "kofi@grid.example".into(),
            staff_id: None,
            password_hash: Some(hash_password("right-pass-123").unwrap()),
            is_staff: true,
        },
    )
    .await
    .unwrap();
    let app = build_test_app(pool);

    let response = post_json(
        app.router(),
        "/api/auth/token/",
        json!({ "username": "kofi", "password": "wrong-pass" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        body_json(response).await["error"],
        "No active account found with the given credentials"
    );
}

// ---------------------------------------------------------------------------
// Exports
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn fault_export_has_one_row_per_report(pool: PgPool) {
    let app = build_test_app(pool);
    create_fault(&app).await;
    create_fault(&app).await;

    let response = get(app.router(), "/api/export/fault-reports/csv/").await;

    assert_eq!(response.status(), StatusCode::OK);
    let csv = body_text(response).await;
    assert_eq!(csv.lines().count(), 3);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn weekly_export_covers_the_requested_range(pool: PgPool) {
    let app = build_test_app(pool);
    for date in ["2024-04-01", "2024-04-05", "2024-04-20"] {
        let response = post_json(
            app.router(),
            "/api/field-activities/",
            json!({
                "staff": "Yaw",
                "substation": "Substation 7",
                "date": date,
                "time_out": "09:00",
                "time_returned": "12:00",
                "purpose": "Inspection",
                "work_done": "Checked oil level",
                "materials_used": "",
                "supervisor_approval": "Approved"
            }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = get(
        app.router(),
        "/api/export/activity-reports/weekly/?start=2024-04-01&end=2024-04-07",
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["content-disposition"],
        "attachment; filename=\"activity_reports_2024-04-01_2024-04-07.csv\""
    );
    assert_eq!(body_text(response).await.lines().count(), 3);
}
