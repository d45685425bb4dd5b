//! Dashboard aggregation endpoint.
//!
//! Every sub-metric is queried concurrently. A metric whose query fails is
//! recomputed from the fallback lists, so one failing query never blanks
//! the others.

use axum::extract::State;
use axum::Json;
use chrono::{Local, NaiveDate};
use gridops_core::dashboard::{
    count_on, distinct_on, distinct_trend, fill_window, rank_substations, trend,
    DashboardSummary, TOP_SUBSTATIONS, TREND_DAYS,
};
use gridops_core::dates::trailing_window;
use gridops_core::fault::is_active;
use gridops_db::repositories::DashboardRepo;

use crate::state::AppState;

/// Take the query result, or log and compute the metric from fallback data.
fn or_fallback<T>(metric: &str, result: Result<T, sqlx::Error>, fallback: impl FnOnce() -> T) -> T {
    result.unwrap_or_else(|e| {
        tracing::warn!(metric, error = %e, "Dashboard query failed, using fallback records");
        fallback()
    })
}

/// GET /api/dashboard/
pub async fn get_dashboard(State(state): State<AppState>) -> Json<DashboardSummary> {
    let today = Local::now().date_naive();
    Json(build_summary(&state, today).await)
}

async fn build_summary(state: &AppState, today: NaiveDate) -> DashboardSummary {
    let window = trailing_window(today, TREND_DAYS);
    let start = window.first().copied().unwrap_or(today);
    let pool = &state.pool;

    let (
        entries_today,
        activities_today,
        staff_online,
        active_faults,
        faults_rows,
        attendance_rows,
        top,
    ) = tokio::join!(
        DashboardRepo::server_room_entries_on(pool, today),
        DashboardRepo::field_activities_on(pool, today),
        DashboardRepo::staff_online_on(pool, today),
        DashboardRepo::active_faults(pool),
        DashboardRepo::faults_per_day(pool, start, today),
        DashboardRepo::attendance_per_day(pool, start, today),
        DashboardRepo::most_visited_substations(pool, TOP_SUBSTATIONS as i64),
    );

    let entries = state.fallback.server_room_entries.snapshot().await;
    let activities = state.fallback.field_activities.snapshot().await;
    let faults = state.fallback.faults.snapshot().await;

    DashboardSummary {
        total_staff_online_today: or_fallback("total_staff_online_today", staff_online, || {
            distinct_on(&entries, today, |e| e.date, |e| e.staff.clone())
        }),
        active_faults: or_fallback("active_faults", active_faults, || {
            faults.iter().filter(|f| is_active(&f.status)).count() as i64
        }),
        server_room_entries_today: or_fallback("server_room_entries_today", entries_today, || {
            count_on(&entries, today, |e| e.date)
        }),
        field_activities_today: or_fallback("field_activities_today", activities_today, || {
            count_on(&activities, today, |a| a.date)
        }),
        faults_trend: or_fallback(
            "faults_trend",
            faults_rows.map(|rows| fill_window(&window, &rows)),
            || trend(&window, &faults, |f| f.date_reported),
        ),
        attendance_trend: or_fallback(
            "attendance_trend",
            attendance_rows.map(|rows| fill_window(&window, &rows)),
            || distinct_trend(&window, &entries, |e| e.date, |e| e.staff.clone()),
        ),
        most_visited_substations: or_fallback("most_visited_substations", top, || {
            rank_substations(activities.iter().map(|a| a.substation.as_str()), TOP_SUBSTATIONS)
        }),
        dates: window,
    }
}
