/// Registration, login, and token refresh
///
/// New accounts start with the `member` role. A successful login stamps
/// `last_login_at`, which is what the daily-active analytics series counts.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult, ValidationErrorDetail},
    routes::validation_error,
};
use axum::{extract::State, Json};
use opencampus_shared::{
    access::{RoleRef, RoleResolver},
    auth::{jwt, password},
    models::user::{CreateUser, User},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    #[validate(length(max = 100, message = "Name must be at most 100 characters"))]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Body returned by register and login
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user_id: Uuid,

    /// 24-hour access token
    pub access_token: String,

    /// 30-day refresh token
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub access_token: String,
}

fn issue_tokens(user_id: Uuid, secret: &str) -> Result<AuthResponse, jwt::JwtError> {
    Ok(AuthResponse {
        user_id,
        access_token: jwt::create_token(&jwt::Claims::new(user_id, jwt::TokenType::Access), secret)?,
        refresh_token: jwt::create_token(
            &jwt::Claims::new(user_id, jwt::TokenType::Refresh),
            secret,
        )?,
    })
}

/// `POST /v1/auth/register`
///
/// # Errors
///
/// 422 on validation or weak password, 409 on duplicate email.
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<Json<AuthResponse>> {
    req.validate().map_err(validation_error)?;

    password::validate_password_strength(&req.password).map_err(|message| {
        ApiError::ValidationError(vec![ValidationErrorDetail {
            field: "password".to_string(),
            message,
        }])
    })?;

    let user = User::create(
        &state.db,
        CreateUser {
            email: req.email,
            password_hash: password::hash_password(&req.password)?,
            name: req.name,
        },
    )
    .await?;

    // Every account starts as a member; further roles are admin-assigned
    RoleResolver::new(state.db.clone())
        .assign_role(user.id, &RoleRef::name("member"))
        .await?;

    Ok(Json(issue_tokens(user.id, state.jwt_secret())?))
}

/// `POST /v1/auth/login`
///
/// The error message does not distinguish a missing account from a wrong
/// password.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    req.validate().map_err(validation_error)?;

    let rejected = || ApiError::Unauthorized("Invalid email or password".to_string());

    let user = User::find_by_email(&state.db, &req.email)
        .await?
        .ok_or_else(rejected)?;

    if !password::verify_password(&req.password, &user.password_hash)? {
        return Err(rejected());
    }

    User::update_last_login(&state.db, user.id).await?;

    Ok(Json(issue_tokens(user.id, state.jwt_secret())?))
}

/// `POST /v1/auth/refresh`
pub async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> ApiResult<Json<RefreshResponse>> {
    let access_token = jwt::refresh_access_token(&req.refresh_token, state.jwt_secret())?;

    Ok(Json(RefreshResponse { access_token }))
}
