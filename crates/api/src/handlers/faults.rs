//! Handlers for fault reports, their updates and feedback.

use axum::body::Bytes;
use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use gridops_core::audit::{actions, models, Changes};
use gridops_core::error::CoreError;
use gridops_core::fault::{validate_attachment, AssigneeRef, STATUS_OPEN};
use gridops_core::payload::{
    optional_id, optional_text, require_fields, required_date, text_or_empty, Object,
};
use gridops_core::types::DbId;
use gridops_db::models::audit::CreateAuditLog;
use gridops_db::models::fault::{
    CreateFaultFeedback, CreateFaultReport, FaultFeedback, FaultReport, UpdateFaultReport,
};
use gridops_db::models::staff::Staff;
use gridops_db::repositories::{FaultFeedbackRepo, FaultRepo, StaffRepo};
use gridops_db::DbPool;
use serde::Serialize;
use serde_json::Value;

use crate::error::{AppError, AppResult};
use crate::extract::{JsonObject, RequestOrigin};
use crate::fallback::merge_with_fallback;
use crate::handlers::audit;
use crate::media::{attachment_url, save_attachment};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

const REQUIRED_FIELDS: &[&str] = &[
    "title",
    "description",
    "date_reported",
    "reported_by",
    "location",
    "severity",
    "status",
];

const FEEDBACK_FIELDS: &[&str] = &["fault_id", "staff_name", "staff_email", "feedback_text"];

/// Multipart field carrying the uploaded file.
const ATTACHMENT_FIELD: &str = "attachment";

const FEEDBACK_ACCEPTED: &str = "Feedback submitted successfully";

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// A fault report as returned by the API, with an absolute attachment URL.
#[derive(Debug, Serialize)]
pub struct FaultView {
    #[serde(flatten)]
    pub fault: FaultReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachment_url: Option<String>,
}

impl FaultView {
    pub fn new(fault: FaultReport, origin: &str, media_url: &str) -> Self {
        let attachment_url = fault
            .attachment
            .as_deref()
            .filter(|path| !path.is_empty())
            .map(|path| attachment_url(origin, media_url, path));
        Self {
            fault,
            attachment_url,
        }
    }
}

pub fn fault_views(faults: Vec<FaultReport>, origin: &str, media_url: &str) -> Vec<FaultView> {
    faults
        .into_iter()
        .map(|fault| FaultView::new(fault, origin, media_url))
        .collect()
}

#[derive(Debug, Serialize)]
pub struct FaultCreated {
    pub id: DbId,
    pub title: String,
}

#[derive(Debug, Serialize)]
pub struct FaultUpdated {
    pub id: DbId,
    pub status: String,
    pub resolution_remarks: String,
    pub assigned_to: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FeedbackCreated {
    pub id: DbId,
    pub fault_id: DbId,
    pub staff_name: String,
    pub message: &'static str,
}

// ---------------------------------------------------------------------------
// Fault reports
// ---------------------------------------------------------------------------

/// GET /api/fault-reports/
pub async fn list_faults(
    State(state): State<AppState>,
    RequestOrigin(origin): RequestOrigin,
) -> Json<Vec<FaultView>> {
    let rows = FaultRepo::list(&state.pool).await;
    let fallback = state.fallback.faults.snapshot().await;
    let faults = merge_with_fallback("fault_reports", rows, fallback);
    Json(fault_views(faults, &origin, &state.config.media_url))
}

/// Text fields and the optional file of a fault-report form.
struct FaultForm {
    fields: Object,
    attachment: Option<(String, Bytes)>,
}

async fn read_form(mut multipart: Multipart) -> AppResult<FaultForm> {
    let mut fields = Object::new();
    let mut attachment = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        if name == ATTACHMENT_FIELD {
            let filename = field.file_name().unwrap_or_default().to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            // Browsers send an empty part for an untouched file input.
            if !filename.is_empty() || !data.is_empty() {
                attachment = Some((filename, data));
            }
        } else {
            let value = field
                .text()
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            fields.insert(name, Value::String(value));
        }
    }

    Ok(FaultForm { fields, attachment })
}

/// POST /api/fault-reports/ (multipart/form-data)
///
/// The attachment is validated and written before the row is inserted. If
/// the insert fails the report is kept in the fallback list and returned in
/// full.
pub async fn create_fault(
    State(state): State<AppState>,
    RequestOrigin(origin): RequestOrigin,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<Response> {
    let multipart = multipart.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let form = read_form(multipart).await?;
    let body = &form.fields;

    require_fields(body, REQUIRED_FIELDS)?;

    let title = text_or_empty(body, "title")?;
    let description = text_or_empty(body, "description")?;
    let date_reported = required_date(body, "date_reported")?;
    let reported_by = text_or_empty(body, "reported_by")?.trim().to_string();
    let location = text_or_empty(body, "location")?;
    let severity = text_or_empty(body, "severity")?;
    let status = match text_or_empty(body, "status")? {
        s if s.trim().is_empty() => STATUS_OPEN.to_string(),
        s => s,
    };
    let resolution_remarks = text_or_empty(body, "resolution_remarks")?;

    let attachment = match &form.attachment {
        Some((filename, data)) => {
            validate_attachment(filename, data.len())?;
            Some(save_attachment(&state.config.media_root, filename, data).await?)
        }
        None => None,
    };

    let reported_by_id = if reported_by.is_empty() {
        None
    } else {
        match StaffRepo::get_or_create(&state.pool, &reported_by).await {
            Ok(member) => Some(member.id),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    reporter = %reported_by,
                    "Reporter lookup failed, storing without reporter",
                );
                None
            }
        }
    };

    let input = CreateFaultReport {
        title,
        description,
        date_reported,
        reported_by_id,
        location,
        severity,
        status,
        resolution_remarks,
        attachment,
    };

    match FaultRepo::create(&state.pool, &input).await {
        Ok(fault) => {
            tracing::info!(fault_id = fault.id, severity = %fault.severity, "Fault report created");
            let changes = Changes::new()
                .set("title", fault.title.as_str())
                .set("severity", fault.severity.as_str())
                .set("status", fault.status.as_str());
            audit::record(
                &state.pool,
                CreateAuditLog {
                    action: actions::CREATE,
                    model_name: models::FAULT_REPORT,
                    object_id: fault.id.to_string(),
                    username: None,
                    changes: changes.into_value(),
                },
            )
            .await;
            let body = FaultCreated {
                id: fault.id,
                title: fault.title,
            };
            Ok((StatusCode::CREATED, Json(body)).into_response())
        }
        Err(e) => {
            tracing::warn!(error = %e, "Fault report not stored, keeping in fallback list");
            let reporter = (!reported_by.is_empty()).then_some(reported_by);
            let fault = state
                .fallback
                .faults
                .push(|id| FaultReport {
                    id,
                    title: input.title,
                    description: input.description,
                    date_reported: input.date_reported,
                    reported_by: reporter,
                    assigned_to: None,
                    assigned_to_id: None,
                    location: input.location,
                    severity: input.severity,
                    status: input.status,
                    resolution_remarks: input.resolution_remarks,
                    attachment: input.attachment,
                })
                .await;
            let view = FaultView::new(fault, &origin, &state.config.media_url);
            Ok((StatusCode::CREATED, Json(view)).into_response())
        }
    }
}

/// GET /api/faults/{id}/
///
/// Falls back to the in-process list only when the database is unreachable.
pub async fn get_fault(
    State(state): State<AppState>,
    _user: AuthUser,
    RequestOrigin(origin): RequestOrigin,
    Path(id): Path<DbId>,
) -> AppResult<Json<FaultView>> {
    let found = match FaultRepo::find_by_id(&state.pool, id).await {
        Ok(found) => found,
        Err(e) => {
            tracing::warn!(fault_id = id, error = %e, "Fault lookup failed, checking fallback list");
            state
                .fallback
                .faults
                .filtered(|f| f.id == id)
                .await
                .into_iter()
                .next()
        }
    };
    let fault = found.ok_or(CoreError::NotFound {
        entity: "FaultReport",
        id,
    })?;
    Ok(Json(FaultView::new(fault, &origin, &state.config.media_url)))
}

/// Resolve an `assigned_to` value: id first, then case-insensitive name.
async fn resolve_assignee(pool: &DbPool, reference: &AssigneeRef) -> AppResult<Option<Staff>> {
    if matches!(reference, AssigneeRef::Clear) {
        return Ok(None);
    }
    if let Some(id) = reference.id() {
        if let Some(member) = StaffRepo::find_by_id(pool, id).await? {
            return Ok(Some(member));
        }
    }
    if let Some(name) = reference.name() {
        if let Some(member) = StaffRepo::find_by_name_ci(pool, name.trim()).await? {
            return Ok(Some(member));
        }
    }
    Err(reference.not_found().into())
}

/// PATCH /api/faults/{id}/
///
/// Only `status`, `resolution_remarks` and `assigned_to` are read; every
/// other key is ignored.
pub async fn update_fault(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    JsonObject(body): JsonObject,
) -> AppResult<Json<FaultUpdated>> {
    let existing = FaultRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "FaultReport",
            id,
        })?;

    let mut update = UpdateFaultReport {
        status: optional_text(&body, "status")?,
        resolution_remarks: optional_text(&body, "resolution_remarks")?,
        ..UpdateFaultReport::default()
    };
    if let Some(value) = body.get("assigned_to") {
        let reference = AssigneeRef::from_json(value)?;
        let assignee = resolve_assignee(&state.pool, &reference).await?;
        update.assigned_to_id = Some(assignee.map(|member| member.id));
    }

    let updated = if update.is_empty() {
        existing.clone()
    } else {
        FaultRepo::update(&state.pool, id, &update)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "FaultReport",
                id,
            })?
    };

    let changes = Changes::new()
        .diff("status", existing.status.as_str(), updated.status.as_str())
        .diff(
            "resolution_remarks",
            existing.resolution_remarks.as_str(),
            updated.resolution_remarks.as_str(),
        )
        .diff("assigned_to", existing.assigned_to.clone(), updated.assigned_to.clone());

    if !changes.is_empty() {
        tracing::info!(fault_id = id, user = %user.username, "Fault report updated");
        audit::record(
            &state.pool,
            CreateAuditLog {
                action: actions::UPDATE,
                model_name: models::FAULT_REPORT,
                object_id: id.to_string(),
                username: Some(user.username.clone()),
                changes: changes.into_value(),
            },
        )
        .await;
    }

    Ok(Json(FaultUpdated {
        id: updated.id,
        status: updated.status,
        resolution_remarks: updated.resolution_remarks,
        assigned_to: updated.assigned_to,
    }))
}

// ---------------------------------------------------------------------------
// Feedback
// ---------------------------------------------------------------------------

/// Read a required text field, trimmed. Blank counts as missing.
fn required_trimmed(body: &Object, key: &str) -> AppResult<String> {
    let value = text_or_empty(body, key)?.trim().to_string();
    if value.is_empty() {
        return Err(CoreError::MissingField(key.to_string()).into());
    }
    Ok(value)
}

/// POST /api/fault-feedbacks/
///
/// Accepted whatever the fault's status.
pub async fn create_feedback(
    State(state): State<AppState>,
    JsonObject(body): JsonObject,
) -> AppResult<(StatusCode, Json<FeedbackCreated>)> {
    require_fields(&body, FEEDBACK_FIELDS)?;

    let fault_id = optional_id(&body, "fault_id")?
        .ok_or_else(|| CoreError::MissingField("fault_id".into()))?;
    let staff_name = required_trimmed(&body, "staff_name")?;
    let staff_email = required_trimmed(&body, "staff_email")?;
    let feedback_text = required_trimmed(&body, "feedback_text")?;

    if !FaultRepo::exists(&state.pool, fault_id).await? {
        return Err(CoreError::NotFound {
            entity: "FaultReport",
            id: fault_id,
        }
        .into());
    }

    let input = CreateFaultFeedback {
        fault_id,
        staff_name,
        staff_email,
        feedback_text,
    };
    let feedback = FaultFeedbackRepo::create(&state.pool, &input).await?;
    tracing::info!(feedback_id = feedback.id, fault_id, "Fault feedback submitted");

    audit::record(
        &state.pool,
        CreateAuditLog {
            action: actions::CREATE,
            model_name: models::FAULT_FEEDBACK,
            object_id: feedback.id.to_string(),
            username: None,
            changes: Changes::new()
                .set("fault_id", fault_id)
                .set("staff_name", feedback.staff_name.as_str())
                .into_value(),
        },
    )
    .await;

    Ok((
        StatusCode::CREATED,
        Json(FeedbackCreated {
            id: feedback.id,
            fault_id,
            staff_name: feedback.staff_name,
            message: FEEDBACK_ACCEPTED,
        }),
    ))
}

/// GET /api/fault-feedbacks/{fault_id}/
///
/// An unknown fault simply has no feedback.
pub async fn list_feedback(
    State(state): State<AppState>,
    Path(fault_id): Path<DbId>,
) -> AppResult<Json<Vec<FaultFeedback>>> {
    let feedback = FaultFeedbackRepo::list_for_fault(&state.pool, fault_id).await?;
    Ok(Json(feedback))
}
