//! Handlers for field activities and the activity-report listing.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use gridops_core::payload::{
    optional_time, require_fields, required_date, required_time, text_or_empty,
};
use gridops_core::types::DbId;
use gridops_db::models::field_activity::{CreateFieldActivity, FieldActivity};
use gridops_db::repositories::field_activity_repo::RECENT_LIMIT;
use gridops_db::repositories::{FieldActivityRepo, StaffRepo};
use serde::Serialize;

use crate::error::AppResult;
use crate::extract::JsonObject;
use crate::fallback::merge_with_fallback;
use crate::state::AppState;

const REQUIRED_FIELDS: &[&str] = &[
    "staff",
    "substation",
    "date",
    "time_out",
    "time_returned",
    "purpose",
    "work_done",
    "materials_used",
    "supervisor_approval",
];

#[derive(Debug, Serialize)]
pub struct ActivityCreated {
    pub id: DbId,
    pub staff: String,
    pub substation: String,
}

/// GET /api/field-activities/
pub async fn list_activities(State(state): State<AppState>) -> Json<Vec<FieldActivity>> {
    let rows = FieldActivityRepo::list(&state.pool).await;
    let fallback = state.fallback.field_activities.snapshot().await;
    Json(merge_with_fallback("field_activities", rows, fallback))
}

/// POST /api/field-activities/
///
/// Same fallback rules as the server-room log: a failed staff lookup or
/// insert keeps the activity in memory and returns it in full.
pub async fn create_activity(
    State(state): State<AppState>,
    JsonObject(body): JsonObject,
) -> AppResult<Response> {
    require_fields(&body, REQUIRED_FIELDS)?;

    let staff = text_or_empty(&body, "staff")?;
    let substation = text_or_empty(&body, "substation")?;
    let date = required_date(&body, "date")?;
    let time_out = required_time(&body, "time_out")?;
    let time_returned = optional_time(&body, "time_returned")?;
    let purpose = text_or_empty(&body, "purpose")?;
    let work_done = text_or_empty(&body, "work_done")?;
    let materials_used = text_or_empty(&body, "materials_used")?;
    let supervisor_approval = text_or_empty(&body, "supervisor_approval")?;

    let stored: Result<FieldActivity, sqlx::Error> = async {
        let member = StaffRepo::get_or_create(&state.pool, &staff).await?;
        let input = CreateFieldActivity {
            staff_id: member.id,
            substation: substation.clone(),
            date,
            time_out,
            time_returned,
            purpose: purpose.clone(),
            work_done: work_done.clone(),
            materials_used: materials_used.clone(),
            supervisor_approval: supervisor_approval.clone(),
        };
        FieldActivityRepo::create(&state.pool, &input).await
    }
    .await;

    match stored {
        Ok(activity) => {
            tracing::info!(
                activity_id = activity.id,
                substation = %activity.substation,
                "Field activity created",
            );
            let body = ActivityCreated {
                id: activity.id,
                staff: activity.staff,
                substation: activity.substation,
            };
            Ok((StatusCode::CREATED, Json(body)).into_response())
        }
        Err(e) => {
            tracing::warn!(error = %e, "Field activity not stored, keeping in fallback list");
            let activity = state
                .fallback
                .field_activities
                .push(|id| FieldActivity {
                    id,
                    staff,
                    substation,
                    date,
                    time_out,
                    time_returned,
                    purpose,
                    work_done,
                    materials_used,
                    supervisor_approval,
                })
                .await;
            Ok((StatusCode::CREATED, Json(activity)).into_response())
        }
    }
}

/// GET /api/activity-reports/
///
/// The most recent activities by date, then any fallback activities.
pub async fn list_activity_reports(State(state): State<AppState>) -> Json<Vec<FieldActivity>> {
    let rows = FieldActivityRepo::list_recent(&state.pool, RECENT_LIMIT).await;
    let fallback = state.fallback.field_activities.snapshot().await;
    Json(merge_with_fallback("activity_reports", rows, fallback))
}
