//! Daily records: everything logged on one date, as JSON or one CSV.

use axum::extract::{Query, State};
use axum::response::Response;
use axum::Json;
use chrono::{Local, NaiveDate};
use gridops_core::daily_records::{daily_records_filename, DailyRecordRow};
use gridops_core::dates::parse_optional_date;
use gridops_db::models::fault::FaultReport;
use gridops_db::models::field_activity::FieldActivity;
use gridops_db::models::server_room::ServerRoomEntry;
use gridops_db::repositories::{FaultRepo, FieldActivityRepo, ServerRoomRepo};
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::extract::RequestOrigin;
use crate::fallback::merge_with_fallback;
use crate::handlers::exports::csv_response;
use crate::handlers::faults::{fault_views, FaultView};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct DailyRecordsQuery {
    pub date: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DailyRecords {
    pub date: NaiveDate,
    pub server_room_entries: Vec<ServerRoomEntry>,
    pub field_activities: Vec<FieldActivity>,
    pub faults: Vec<FaultView>,
}

/// The three record lists for one day, each falling back independently.
struct Day {
    entries: Vec<ServerRoomEntry>,
    activities: Vec<FieldActivity>,
    faults: Vec<FaultReport>,
}

impl Day {
    /// Server-room rows first, then field activities, then faults.
    fn rows(&self) -> Vec<DailyRecordRow> {
        self.entries
            .iter()
            .map(ServerRoomEntry::to_daily_row)
            .chain(self.activities.iter().map(FieldActivity::to_daily_row))
            .chain(self.faults.iter().map(FaultReport::to_daily_row))
            .collect()
    }
}

fn resolve_date(params: &DailyRecordsQuery) -> AppResult<NaiveDate> {
    Ok(parse_optional_date("date", params.date.as_deref())?
        .unwrap_or_else(|| Local::now().date_naive()))
}

async fn load_day(state: &AppState, date: NaiveDate) -> Day {
    let pool = &state.pool;
    let (entries, activities, faults) = tokio::join!(
        ServerRoomRepo::list_by_date(pool, date),
        FieldActivityRepo::list_by_date(pool, date),
        FaultRepo::list_by_date_reported(pool, date),
    );

    let fallback = &state.fallback;
    Day {
        entries: merge_with_fallback(
            "server_room_entries",
            entries,
            fallback.server_room_entries.filtered(|e| e.date == date).await,
        ),
        activities: merge_with_fallback(
            "field_activities",
            activities,
            fallback.field_activities.filtered(|a| a.date == date).await,
        ),
        faults: merge_with_fallback(
            "fault_reports",
            faults,
            fallback.faults.filtered(|f| f.date_reported == date).await,
        ),
    }
}

/// GET /api/daily-records/?date=YYYY-MM-DD
pub async fn get_daily_records(
    State(state): State<AppState>,
    _user: AuthUser,
    RequestOrigin(origin): RequestOrigin,
    Query(params): Query<DailyRecordsQuery>,
) -> AppResult<Json<DailyRecords>> {
    let date = resolve_date(&params)?;
    let day = load_day(&state, date).await;
    Ok(Json(DailyRecords {
        date,
        server_room_entries: day.entries,
        field_activities: day.activities,
        faults: fault_views(day.faults, &origin, &state.config.media_url),
    }))
}

/// GET /api/export/daily-records/csv/?date=YYYY-MM-DD
pub async fn export_daily_records(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(params): Query<DailyRecordsQuery>,
) -> AppResult<Response> {
    let date = resolve_date(&params)?;
    let rows = load_day(&state, date).await.rows();
    Ok(csv_response(&daily_records_filename(date), &rows))
}
