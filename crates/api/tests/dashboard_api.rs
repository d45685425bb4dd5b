//! Dashboard, daily records and CSV exports with the database unreachable.

mod common;

use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::StatusCode;
use chrono::{Days, Local};
use common::{body_json, body_text, get, get_auth, offline_app, post_json};
use serde_json::json;

fn today() -> String {
    Local::now().date_naive().to_string()
}

fn entry_on(date: &str, staff: &str) -> serde_json::Value {
    json!({
        "staff": staff,
        "date": date,
        "time_in": "08:00",
        "time_out": "09:00",
        "reason": "Patching",
        "equipment_touched": "Core switch",
        "supervisor": "Kofi"
    })
}

fn activity_on(date: &str) -> serde_json::Value {
    json!({
        "staff": "Yaw",
        "substation": "Substation 7",
        "date": date,
        "time_out": "09:00",
        "time_returned": "",
        "purpose": "Inspection",
        "work_done": "Thermal scan",
        "materials_used": "",
        "supervisor_approval": "Approved"
    })
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

#[tokio::test]
async fn empty_dashboard_has_seven_day_trends() {
    let app = offline_app();

    let response = get(app.router(), "/api/dashboard/").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["total_staff_online_today"], 0);
    assert_eq!(json["active_faults"], 0);
    assert_eq!(json["faults_trend"], json!([0, 0, 0, 0, 0, 0, 0]));
    assert_eq!(json["attendance_trend"], json!([0, 0, 0, 0, 0, 0, 0]));
    assert_eq!(json["most_visited_substations"], json!([]));

    let dates = json["dates"].as_array().unwrap();
    assert_eq!(dates.len(), 7);
    assert_eq!(dates[6], today());
}

#[tokio::test]
async fn dashboard_counts_fallback_records_for_today() {
    let app = offline_app();
    post_json(app.router(), "/api/server-room/", entry_on(&today(), "Ama")).await;
    post_json(app.router(), "/api/server-room/", entry_on(&today(), "Ama")).await;
    post_json(app.router(), "/api/server-room/", entry_on(&today(), "Kofi")).await;
    post_json(app.router(), "/api/field-activities/", activity_on(&today())).await;

    let yesterday = Local::now()
        .date_naive()
        .checked_sub_days(Days::new(1))
        .unwrap()
        .to_string();
    post_json(app.router(), "/api/server-room/", entry_on(&yesterday, "Esi")).await;

    let json = body_json(get(app.router(), "/api/dashboard/").await).await;

    assert_eq!(json["server_room_entries_today"], 3);
    assert_eq!(json["total_staff_online_today"], 2);
    assert_eq!(json["field_activities_today"], 1);
    assert_eq!(json["attendance_trend"], json!([0, 0, 0, 0, 0, 1, 2]));
    assert_eq!(json["most_visited_substations"][0]["name"], "Substation 7");
    assert_eq!(json["most_visited_substations"][0]["count"], 1);
}

// ---------------------------------------------------------------------------
// Daily records
// ---------------------------------------------------------------------------

#[tokio::test]
async fn daily_records_require_authentication() {
    let app = offline_app();

    let response = get(app.router(), "/api/daily-records/").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn daily_records_only_include_the_requested_date() {
    let app = offline_app();
    post_json(app.router(), "/api/server-room/", entry_on("2024-04-02", "Ama")).await;
    post_json(app.router(), "/api/server-room/", entry_on("2024-04-03", "Kofi")).await;
    post_json(app.router(), "/api/field-activities/", activity_on("2024-04-02")).await;

    let response = get_auth(
        app.router(),
        "/api/daily-records/?date=2024-04-02",
        &app.user_token(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["date"], "2024-04-02");
    let entries = json["server_room_entries"].as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["staff"], "Ama");
    assert_eq!(json["field_activities"].as_array().unwrap().len(), 1);
    assert_eq!(json["faults"], json!([]));
}

#[tokio::test]
async fn daily_records_reject_malformed_date() {
    let app = offline_app();

    let response = get_auth(
        app.router(),
        "/api/daily-records/?date=April",
        &app.user_token(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn daily_csv_lists_server_room_rows_before_field_activities() {
    let app = offline_app();
    post_json(app.router(), "/api/field-activities/", activity_on("2024-04-02")).await;
    post_json(app.router(), "/api/server-room/", entry_on("2024-04-02", "Ama")).await;

    let response = get_auth(
        app.router(),
        "/api/export/daily-records/csv/?date=2024-04-02",
        &app.user_token(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[CONTENT_TYPE], "text/csv; charset=utf-8");
    assert_eq!(
        response.headers()[CONTENT_DISPOSITION],
        "attachment; filename=\"daily_records_2024-04-02.csv\""
    );

    let csv = body_text(response).await;
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(
        lines[0],
        "type,id,staff,substation_or_location,date,time_in,time_out,title,description,severity,status,resolution_remarks"
    );
    assert_eq!(lines.len(), 3);
    assert!(lines[1].starts_with("server_room,1,Ama,"));
    assert!(lines[2].starts_with("field_activity,1,Yaw,Substation 7,2024-04-02,09:00:00,,"));
}

#[tokio::test]
async fn daily_csv_requires_authentication() {
    let app = offline_app();

    let response = get(app.router(), "/api/export/daily-records/csv/").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Range exports
// ---------------------------------------------------------------------------

#[tokio::test]
async fn inverted_weekly_range_is_rejected_before_querying() {
    let app = offline_app();

    let response = get(
        app.router(),
        "/api/export/activity-reports/weekly/?start=2024-04-10&end=2024-04-01",
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn malformed_month_is_rejected() {
    let app = offline_app();

    let response = get(
        app.router(),
        "/api/export/activity-reports/monthly/?month=2024-13",
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn export_fails_whole_when_database_is_down() {
    let app = offline_app();

    let response = get(app.router(), "/api/export/fault-reports/csv/").await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json["error"], "An internal error occurred");
}
