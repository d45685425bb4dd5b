//! Handlers for `/api/admin` (login account management).
//!
//! All handlers require the `admin` role via [`RequireAdmin`].

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use gridops_core::account::validate_email;
use gridops_core::audit::{actions, models, Changes};
use gridops_core::error::CoreError;
use gridops_db::models::audit::CreateAuditLog;
use gridops_db::models::user::{CreateUser, UserResponse};
use gridops_db::repositories::UserRepo;
use serde::Deserialize;

use crate::auth::password::hash_password;
use crate::error::{AppError, AppResult};
use crate::extract::JsonBody;
use crate::handlers::audit;
use crate::middleware::rbac::RequireAdmin;
use crate::state::AppState;

/// Request body for `POST /api/admin/users/`.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    #[serde(default)]
    pub email: String,
    pub staff_id: Option<String>,
    /// Absent means an unusable password; the user sets one through
    /// `/api/auth/set-password/`.
    pub password: Option<String>,
    #[serde(default)]
    pub is_staff: bool,
}

/// POST /api/admin/users/
///
/// Create a login account. A taken username is a 409.
pub async fn create_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    JsonBody(input): JsonBody<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    let username = input.username.trim().to_string();
    if username.is_empty() {
        return Err(CoreError::MissingField("username".into()).into());
    }
    let email = input.email.trim().to_string();
    if !email.is_empty() {
        validate_email(&email)?;
    }

    let password_hash = input
        .password
        .as_deref()
        .filter(|p| !p.is_empty())
        .map(hash_password)
        .transpose()
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let create = CreateUser {
        username,
        email,
        staff_id: input
            .staff_id
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty()),
        password_hash,
        is_staff: input.is_staff,
    };
    let user = UserRepo::create(&state.pool, &create).await?;
    tracing::info!(user_id = user.id, username = %user.username, "User created");

    audit::record(
        &state.pool,
        CreateAuditLog {
            action: actions::CREATE,
            model_name: models::USER,
            object_id: user.id.to_string(),
            username: Some(admin.username),
            changes: Changes::new()
                .set("username", user.username.as_str())
                .set("is_staff", user.is_staff)
                .set("login_enabled", user.has_usable_password())
                .into_value(),
        },
    )
    .await;

    Ok((StatusCode::CREATED, Json(UserResponse::from(&user))))
}
