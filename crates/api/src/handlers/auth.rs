//! Handlers for `/api/auth` (token issue and refresh, current user, email
//! lookup and self-service initial password).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use gridops_core::account::{
    check_recovery, looks_like_email, RecoveryCheck,
};
use gridops_core::audit::{actions, models, Changes};
use gridops_core::error::CoreError;
use gridops_core::payload::text_or_empty;
use gridops_db::models::audit::CreateAuditLog;
use gridops_db::models::session::NewRefreshSession;
use gridops_db::models::user::{User, UserResponse};
use gridops_db::repositories::{SessionRepo, UserRepo};
use serde::{Deserialize, Serialize};

use crate::auth::jwt::{generate_access_token, generate_refresh_token, hash_refresh_token};
use crate::auth::password::{hash_password, verify_password};
use crate::error::{AppError, AppResult};
use crate::extract::{JsonBody, JsonObject};
use crate::handlers::audit;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

const BAD_CREDENTIALS: &str = "No active account found with the given credentials";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /api/auth/token/`.
#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    /// Username, or an email address resolved to its username.
    pub username: String,
    pub password: String,
}

/// Request body for `POST /api/auth/token/refresh/`.
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh: String,
}

#[derive(Debug, Serialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

#[derive(Debug, Serialize)]
pub struct LookupResponse {
    pub username: String,
    pub is_active: bool,
}

#[derive(Debug, Serialize)]
pub struct SetPasswordResponse {
    pub ok: bool,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/auth/token/
pub async fn obtain_token(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<TokenRequest>,
) -> AppResult<Json<TokenPair>> {
    let mut username = input.username.trim().to_string();

    // An email is swapped for the matching account's username; an unknown
    // email falls through to the ordinary (failing) username check.
    if looks_like_email(&username) {
        if let Some(user) = UserRepo::find_by_email_ci(&state.pool, &username).await? {
            username = user.username;
        }
    }

    let user = UserRepo::find_by_username(&state.pool, &username)
        .await?
        .filter(|u| u.is_active)
        .ok_or_else(|| CoreError::Unauthorized(BAD_CREDENTIALS.into()))?;

    let hash = user
        .password_hash
        .as_deref()
        .filter(|_| user.has_usable_password())
        .ok_or_else(|| CoreError::Unauthorized(BAD_CREDENTIALS.into()))?;

    let valid = verify_password(&input.password, hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !valid {
        tracing::info!(username = %user.username, "Rejected login");
        return Err(CoreError::Unauthorized(BAD_CREDENTIALS.into()).into());
    }

    tracing::info!(user_id = user.id, "User logged in");
    Ok(Json(issue_tokens(&state, &user).await?))
}

/// POST /api/auth/token/refresh/
///
/// Rotates the refresh token: the presented session is revoked and a new
/// pair is issued.
pub async fn refresh_token(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<RefreshRequest>,
) -> AppResult<Json<TokenPair>> {
    let invalid = || CoreError::Unauthorized("Invalid or expired refresh token".into());

    let user_id = SessionRepo::consume(&state.pool, &hash_refresh_token(&input.refresh))
        .await?
        .ok_or_else(invalid)?;

    let user = UserRepo::find_by_id(&state.pool, user_id)
        .await?
        .filter(|u| u.is_active)
        .ok_or_else(invalid)?;

    Ok(Json(issue_tokens(&state, &user).await?))
}

/// GET /api/auth/user/
pub async fn current_user(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<UserResponse>> {
    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "User",
            id: auth.user_id,
        })?;
    Ok(Json(UserResponse::from(&user)))
}

/// POST /api/auth/lookup/
///
/// Resolve an email to its username so the login form can show it.
pub async fn lookup_username(
    State(state): State<AppState>,
    JsonObject(body): JsonObject,
) -> AppResult<Json<LookupResponse>> {
    let email = text_or_empty(&body, "email")?.trim().to_string();
    if email.is_empty() {
        return Err(AppError::BadRequest("missing email".into()));
    }

    let user = UserRepo::find_by_email_ci(&state.pool, &email)
        .await?
        .ok_or(CoreError::NotFoundByKey {
            entity: "User",
            key: email,
        })?;

    Ok(Json(LookupResponse {
        username: user.username,
        is_active: user.is_active,
    }))
}

/// POST /api/auth/set-password/
///
/// Lets a user without a usable password choose one, proving ownership
/// through the account's email.
pub async fn set_password(
    State(state): State<AppState>,
    JsonObject(body): JsonObject,
) -> AppResult<(StatusCode, Json<SetPasswordResponse>)> {
    let username = text_or_empty(&body, "username")?.trim().to_string();
    let email = text_or_empty(&body, "email")?.trim().to_string();
    let password = text_or_empty(&body, "password")?;
    if username.is_empty() || email.is_empty() || password.is_empty() {
        return Err(AppError::BadRequest("missing fields".into()));
    }

    let user = UserRepo::find_by_username_ci(&state.pool, &username)
        .await?
        .ok_or(CoreError::NotFoundByKey {
            entity: "User",
            key: username,
        })?;

    let check = check_recovery(Some(&user.email), user.has_usable_password(), &email)?;

    let hashed = hash_password(&password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
    let adopted = match &check {
        RecoveryCheck::AdoptEmail(new_email) => Some(new_email.as_str()),
        RecoveryCheck::Verified => None,
    };
    UserRepo::set_password(&state.pool, user.id, &hashed, adopted).await?;
    tracing::info!(user_id = user.id, "Initial password set");

    let mut changes = Changes::new().set("password", "set");
    if let Some(new_email) = adopted {
        changes = changes.diff("email", user.email.as_str(), new_email);
    }
    audit::record(
        &state.pool,
        CreateAuditLog {
            action: actions::UPDATE,
            model_name: models::USER,
            object_id: user.id.to_string(),
            username: Some(user.username.clone()),
            changes: changes.into_value(),
        },
    )
    .await;

    Ok((StatusCode::CREATED, Json(SetPasswordResponse { ok: true })))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Issue an access token and persist a new refresh session.
async fn issue_tokens(state: &AppState, user: &User) -> AppResult<TokenPair> {
    let access = generate_access_token(user.id, &user.username, user.role(), &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    let refresh = generate_refresh_token();
    SessionRepo::open(
        &state.pool,
        &NewRefreshSession {
            user_id: user.id,
            refresh_token_hash: refresh.hash,
            expires_at: state.config.jwt.refresh_expires_at(Utc::now()),
        },
    )
    .await?;

    Ok(TokenPair {
        access,
        refresh: refresh.plaintext,
    })
}
