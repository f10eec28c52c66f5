/// Usage counter endpoints
///
/// # Endpoints
///
/// - `GET /v1/usage` - Own usage counters
/// - `GET /v1/admin/users/:id/usage` - Any user's counters (admin)
/// - `POST /v1/admin/users/:id/usage/recount` - Force a recount (admin)

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
    access::ExecutionContext, metering::UsageMetricsAggregator, models::usage::UsageCounters,
};
use uuid::Uuid;

/// `GET /v1/usage`
///
/// Counters are recomputed asynchronously after content writes; a fresh
/// account that has never written anything gets a zero snapshot.
pub async fn my_usage(
    State(state): State<AppState>,
    Extension(ctx): Extension<ExecutionContext>,
) -> ApiResult<Json<UsageCounters>> {
    let user_id = ctx
        .user_id()
        .ok_or_else(|| ApiError::Unauthorized("No acting principal".to_string()))?;

    Ok(Json(UsageCounters::get_or_default(&state.db, user_id).await?))
}

/// `GET /v1/admin/users/:id/usage`
pub async fn user_usage(
    State(state): State<AppState>,
    Extension(ctx): Extension<ExecutionContext>,
    Path(user_id): Path<Uuid>,
) -> ApiResult<Json<UsageCounters>> {
    require_admin(&ctx)?;

    Ok(Json(UsageCounters::get_or_default(&state.db, user_id).await?))
}

/// `POST /v1/admin/users/:id/usage/recount`
///
/// Runs the recount synchronously and returns the fresh snapshot. A 404 is
/// returned for unknown users here, unlike the queue path where they are
/// silently skipped.
pub async fn recount(
    State(state): State<AppState>,
    Extension(ctx): Extension<ExecutionContext>,
    Path(user_id): Path<Uuid>,
) -> ApiResult<Json<UsageCounters>> {
    require_admin(&ctx)?;

    let counters = UsageMetricsAggregator::new(state.db.clone())
        .recount(user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("User not found: {}", user_id)))?;

    Ok(Json(counters))
}
