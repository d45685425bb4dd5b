//! Handlers for the `/api/staff` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use gridops_core::account::validate_email;
use gridops_core::audit::{actions, models, Changes};
use gridops_core::error::CoreError;
use gridops_core::types::DbId;
use gridops_db::models::audit::CreateAuditLog;
use gridops_db::models::staff::{CreateStaff, Staff};
use gridops_db::repositories::StaffRepo;

use crate::error::AppResult;
use crate::extract::JsonBody;
use crate::handlers::audit;
use crate::middleware::rbac::RequireAdmin;
use crate::state::AppState;

/// GET /api/staff/
pub async fn list_staff(State(state): State<AppState>) -> AppResult<Json<Vec<Staff>>> {
    let staff = StaffRepo::list(&state.pool).await?;
    Ok(Json(staff))
}

/// POST /api/staff/
///
/// A duplicate name is a 409 via the `uq_staff_name` constraint.
pub async fn create_staff(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    JsonBody(input): JsonBody<CreateStaff>,
) -> AppResult<(StatusCode, Json<Staff>)> {
    let input = CreateStaff {
        name: input.name.trim().to_string(),
        email: input.email.trim().to_string(),
    };
    if input.name.is_empty() {
        return Err(CoreError::MissingField("name".into()).into());
    }
    if !input.email.is_empty() {
        validate_email(&input.email)?;
    }

    let member = StaffRepo::create(&state.pool, &input).await?;
    tracing::info!(staff_id = member.id, name = %member.name, "Staff member created");

    audit::record(
        &state.pool,
        CreateAuditLog {
            action: actions::CREATE,
            model_name: models::STAFF,
            object_id: member.id.to_string(),
            username: Some(admin.username),
            changes: Changes::new()
                .set("name", member.name.as_str())
                .set("email", member.email.as_str())
                .into_value(),
        },
    )
    .await;

    Ok((StatusCode::CREATED, Json(member)))
}

/// POST /api/staff/{id}/suspend/
///
/// Marks the staff member inactive. Existing records keep referencing them.
pub async fn suspend_staff(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<Staff>> {
    let before = StaffRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound { entity: "Staff", id })?;
    let member = StaffRepo::suspend(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound { entity: "Staff", id })?;
    tracing::info!(staff_id = id, "Staff member suspended");

    let changes = Changes::new().diff("is_active", before.is_active, member.is_active);
    if !changes.is_empty() {
        audit::record(
            &state.pool,
            CreateAuditLog {
                action: actions::UPDATE,
                model_name: models::STAFF,
                object_id: id.to_string(),
                username: Some(admin.username),
                changes: changes.into_value(),
            },
        )
        .await;
    }

    Ok(Json(member))
}
