//! Handlers for the server-room visit log and the visitor log.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{Local, NaiveDate};
use gridops_core::payload::{
    optional_date, optional_time, require_fields, required_date, required_time, text_or_empty,
};
use gridops_core::types::DbId;
use gridops_db::models::server_room::{
    CreateServerRoomEntry, CreateServerRoomVisitor, ServerRoomEntry, ServerRoomVisitor,
};
use gridops_db::repositories::{ServerRoomRepo, StaffRepo, VisitorRepo};
use serde::Serialize;

use crate::error::AppResult;
use crate::extract::JsonObject;
use crate::fallback::merge_with_fallback;
use crate::state::AppState;

const ENTRY_FIELDS: &[&str] = &[
    "staff",
    "date",
    "time_in",
    "time_out",
    "reason",
    "equipment_touched",
    "supervisor",
];

const VISITOR_FIELDS: &[&str] = &["staff_id", "name", "purpose", "time_in"];

/// Response for a stored visit log entry.
#[derive(Debug, Serialize)]
pub struct EntryCreated {
    pub id: DbId,
    pub staff: String,
    pub date: NaiveDate,
}

// ---------------------------------------------------------------------------
// Visit log
// ---------------------------------------------------------------------------

/// GET /api/server-room/
pub async fn list_entries(State(state): State<AppState>) -> Json<Vec<ServerRoomEntry>> {
    let rows = ServerRoomRepo::list(&state.pool).await;
    let fallback = state.fallback.server_room_entries.snapshot().await;
    Json(merge_with_fallback("server_room_entries", rows, fallback))
}

/// POST /api/server-room/
///
/// The staff member is created on first reference. When the staff lookup
/// or the insert fails the entry is kept in the fallback list and returned
/// in full.
pub async fn create_entry(
    State(state): State<AppState>,
    JsonObject(body): JsonObject,
) -> AppResult<Response> {
    require_fields(&body, ENTRY_FIELDS)?;

    let staff = text_or_empty(&body, "staff")?;
    let date = required_date(&body, "date")?;
    let time_in = required_time(&body, "time_in")?;
    let time_out = optional_time(&body, "time_out")?;
    let reason = text_or_empty(&body, "reason")?;
    let equipment_touched = text_or_empty(&body, "equipment_touched")?;
    let supervisor = text_or_empty(&body, "supervisor")?;

    let stored: Result<ServerRoomEntry, sqlx::Error> = async {
        let member = StaffRepo::get_or_create(&state.pool, &staff).await?;
        let input = CreateServerRoomEntry {
            staff_id: member.id,
            date,
            time_in,
            time_out,
            reason: reason.clone(),
            equipment_touched: equipment_touched.clone(),
            supervisor: supervisor.clone(),
        };
        ServerRoomRepo::create(&state.pool, &input).await
    }
    .await;

    match stored {
        Ok(entry) => {
            tracing::info!(entry_id = entry.id, staff = %entry.staff, "Server room entry created");
            let body = EntryCreated {
                id: entry.id,
                staff: entry.staff,
                date: entry.date,
            };
            Ok((StatusCode::CREATED, Json(body)).into_response())
        }
        Err(e) => {
            tracing::warn!(error = %e, "Server room entry not stored, keeping in fallback list");
            let entry = state
                .fallback
                .server_room_entries
                .push(|id| ServerRoomEntry {
                    id,
                    staff,
                    date,
                    time_in,
                    time_out,
                    reason,
                    equipment_touched,
                    supervisor,
                })
                .await;
            Ok((StatusCode::CREATED, Json(entry)).into_response())
        }
    }
}

// ---------------------------------------------------------------------------
// Visitor log
// ---------------------------------------------------------------------------

/// GET /api/server-room-visitors/
pub async fn list_visitors(State(state): State<AppState>) -> Json<Vec<ServerRoomVisitor>> {
    let rows = VisitorRepo::list(&state.pool).await;
    let fallback = state.fallback.visitors.snapshot().await;
    Json(merge_with_fallback("server_room_visitors", rows, fallback))
}

/// POST /api/server-room-visitors/
///
/// `date` defaults to today. Always answers with the full record, from the
/// database or from the fallback list.
pub async fn create_visitor(
    State(state): State<AppState>,
    JsonObject(body): JsonObject,
) -> AppResult<(StatusCode, Json<ServerRoomVisitor>)> {
    require_fields(&body, VISITOR_FIELDS)?;

    let input = CreateServerRoomVisitor {
        staff_id: text_or_empty(&body, "staff_id")?,
        name: text_or_empty(&body, "name")?,
        purpose: text_or_empty(&body, "purpose")?,
        date: optional_date(&body, "date")?.unwrap_or_else(|| Local::now().date_naive()),
        time_in: required_time(&body, "time_in")?,
        time_out: optional_time(&body, "time_out")?,
    };

    let visitor = match VisitorRepo::create(&state.pool, &input).await {
        Ok(visitor) => {
            tracing::info!(visitor_id = visitor.id, name = %visitor.name, "Visitor logged");
            visitor
        }
        Err(e) => {
            tracing::warn!(error = %e, "Visitor not stored, keeping in fallback list");
            state
                .fallback
                .visitors
                .push(|id| ServerRoomVisitor {
                    id,
                    staff_id: input.staff_id,
                    name: input.name,
                    purpose: input.purpose,
                    date: input.date,
                    time_in: input.time_in,
                    time_out: input.time_out,
                })
                .await
        }
    };

    Ok((StatusCode::CREATED, Json(visitor)))
}
