/// Role administration endpoints (admin-only)
///
/// Role arguments are accepted as either a role name or a role id; the
/// path/body string is parsed into a [`RoleRef`] and resolved exactly once.
/// Unknown roles are a 404 for assign, remove, and sync alike.
///
/// # Endpoints
///
/// - `GET /v1/admin/users/:id/roles` - List a user's roles
/// - `POST /v1/admin/users/:id/roles` - Assign a role (idempotent)
/// - `PUT /v1/admin/users/:id/roles` - Replace the full role set
/// - `DELETE /v1/admin/users/:id/roles/:role` - Remove a role (idempotent)
/// - `GET /v1/admin/users/:id/permissions` - Union of the user's permissions

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::require_admin,
};
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use opencampus_shared::{
    access::{ExecutionContext, RoleRef, RoleResolver},
    models::{role::Role, user::User},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role assignment request
#[derive(Debug, Deserialize)]
pub struct AssignRoleRequest {
    /// Role name or id
    pub role: String,
}

/// Role sync request
#[derive(Debug, Deserialize)]
pub struct SyncRolesRequest {
    /// Role names or ids; the user's assignment set becomes exactly this
    pub roles: Vec<String>,
}

/// Permissions response
#[derive(Debug, Serialize)]
pub struct PermissionsResponse {
    /// De-duplicated, sorted permission names
    pub permissions: Vec<String>,
}

async fn ensure_user_exists(state: &AppState, user_id: Uuid) -> Result<(), ApiError> {
    if !User::exists(&state.db, user_id).await? {
        return Err(ApiError::NotFound(format!("User not found: {}", user_id)));
    }
    Ok(())
}

/// `GET /v1/admin/users/:id/roles`
pub async fn list_user_roles(
    State(state): State<AppState>,
    Extension(ctx): Extension<ExecutionContext>,
    Path(user_id): Path<Uuid>,
) -> ApiResult<Json<Vec<Role>>> {
    require_admin(&ctx)?;
    ensure_user_exists(&state, user_id).await?;

    let resolver = RoleResolver::new(state.db.clone());
    Ok(Json(resolver.roles_for(user_id).await?))
}

/// `POST /v1/admin/users/:id/roles`
pub async fn assign_role(
    State(state): State<AppState>,
    Extension(ctx): Extension<ExecutionContext>,
    Path(user_id): Path<Uuid>,
    Json(req): Json<AssignRoleRequest>,
) -> ApiResult<Json<Vec<Role>>> {
    require_admin(&ctx)?;
    ensure_user_exists(&state, user_id).await?;

    let resolver = RoleResolver::new(state.db.clone());
    resolver
        .assign_role(user_id, &RoleRef::parse(&req.role))
        .await?;

    Ok(Json(resolver.roles_for(user_id).await?))
}

/// `PUT /v1/admin/users/:id/roles`
pub async fn sync_roles(
    State(state): State<AppState>,
    Extension(ctx): Extension<ExecutionContext>,
    Path(user_id): Path<Uuid>,
    Json(req): Json<SyncRolesRequest>,
) -> ApiResult<Json<Vec<Role>>> {
    require_admin(&ctx)?;
    ensure_user_exists(&state, user_id).await?;

    let refs: Vec<RoleRef> = req.roles.iter().map(|s| RoleRef::parse(s)).collect();

    let resolver = RoleResolver::new(state.db.clone());
    resolver.sync_roles(user_id, &refs).await?;

    Ok(Json(resolver.roles_for(user_id).await?))
}

/// `DELETE /v1/admin/users/:id/roles/:role`
pub async fn remove_role(
    State(state): State<AppState>,
    Extension(ctx): Extension<ExecutionContext>,
    Path((user_id, role)): Path<(Uuid, String)>,
) -> ApiResult<Json<Vec<Role>>> {
    require_admin(&ctx)?;
    ensure_user_exists(&state, user_id).await?;

    let resolver = RoleResolver::new(state.db.clone());
    resolver.remove_role(user_id, &RoleRef::parse(&role)).await?;

    Ok(Json(resolver.roles_for(user_id).await?))
}

/// `GET /v1/admin/users/:id/permissions`
pub async fn list_permissions(
    State(state): State<AppState>,
    Extension(ctx): Extension<ExecutionContext>,
    Path(user_id): Path<Uuid>,
) -> ApiResult<Json<PermissionsResponse>> {
    require_admin(&ctx)?;
    ensure_user_exists(&state, user_id).await?;

    let resolver = RoleResolver::new(state.db.clone());
    Ok(Json(PermissionsResponse {
        permissions: resolver.all_permissions(user_id).await?,
    }))
}
