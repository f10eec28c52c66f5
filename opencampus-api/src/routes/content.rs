/// Ownership-scoped content endpoints
///
/// Listings derive their scope from the execution context: regular users
/// see their own rows, admins see everything. Admins may narrow a listing
/// to one user with `?as_user=<uuid>`; non-admins are rejected if they try.
///
/// Creations stamp the owner from the context and enqueue a usage recount
/// for the affected owner (tasks excluded, they are not metered).

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::validation_error,
};
use axum::{
    extract::{Query, State},
    Extension, Json,
};
use opencampus_shared::{
    access::{ExecutionContext, OwnershipScope},
    metering::UsageMetricsAggregator,
    models::{
        course::{Course, CreateCourse},
        lesson::{CreateLesson, Lesson},
        project::{CreateProject, Project},
        task::{CreateTask, Task},
    },
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

/// Listing query parameters
#[derive(Debug, Deserialize)]
pub struct ScopeQuery {
    /// Admin-only: list as if this user (exact-owner filter)
    pub as_user: Option<Uuid>,
}

/// Resolves the listing scope from the context and query
///
/// `?as_user=` is the admin escape hatch; anyone else asking for it is
/// rejected rather than silently ignored.
fn listing_scope(ctx: &ExecutionContext, query: &ScopeQuery) -> Result<OwnershipScope, ApiError> {
    match query.as_user {
        Some(user_id) => {
            if !ctx.is_admin() {
                return Err(ApiError::Forbidden(
                    "Only administrators may query as another user".to_string(),
                ));
            }
            Ok(OwnershipScope::as_user(ctx, Some(user_id)))
        }
        None => Ok(OwnershipScope::from_context(ctx)),
    }
}

/// Rejects explicit owner overrides from non-admins
fn check_owner_override(ctx: &ExecutionContext, owner_id: Option<Uuid>) -> Result<(), ApiError> {
    if owner_id.is_some() && !ctx.is_admin() {
        return Err(ApiError::Forbidden(
            "Only administrators may create content for another user".to_string(),
        ));
    }
    Ok(())
}

/// Project creation request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateProjectRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    /// Admin-only owner override
    pub owner_id: Option<Uuid>,
}

/// Course creation request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCourseRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,

    /// Admin-only owner override
    pub owner_id: Option<Uuid>,
}

/// Lesson creation request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLessonRequest {
    pub course_id: Uuid,

    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,

    /// Admin-only owner override
    pub owner_id: Option<Uuid>,
}

/// Task creation request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,

    /// Admin-only owner override
    pub owner_id: Option<Uuid>,
}

/// `GET /v1/projects`
pub async fn list_projects(
    State(state): State<AppState>,
    Extension(ctx): Extension<ExecutionContext>,
    Query(query): Query<ScopeQuery>,
) -> ApiResult<Json<Vec<Project>>> {
    let scope = listing_scope(&ctx, &query)?;
    Ok(Json(Project::list(&state.db, &scope).await?))
}

/// `POST /v1/projects`
pub async fn create_project(
    State(state): State<AppState>,
    Extension(ctx): Extension<ExecutionContext>,
    Json(req): Json<CreateProjectRequest>,
) -> ApiResult<Json<Project>> {
    req.validate().map_err(validation_error)?;
    check_owner_override(&ctx, req.owner_id)?;

    let project = Project::create(
        &state.db,
        &ctx,
        CreateProject {
            name: req.name,
            owner_id: req.owner_id,
        },
    )
    .await?;

    UsageMetricsAggregator::new(state.db.clone())
        .enqueue(project.owner_id)
        .await?;

    Ok(Json(project))
}

/// `GET /v1/courses`
pub async fn list_courses(
    State(state): State<AppState>,
    Extension(ctx): Extension<ExecutionContext>,
    Query(query): Query<ScopeQuery>,
) -> ApiResult<Json<Vec<Course>>> {
    let scope = listing_scope(&ctx, &query)?;
    Ok(Json(Course::list(&state.db, &scope).await?))
}

/// `POST /v1/courses`
pub async fn create_course(
    State(state): State<AppState>,
    Extension(ctx): Extension<ExecutionContext>,
    Json(req): Json<CreateCourseRequest>,
) -> ApiResult<Json<Course>> {
    req.validate().map_err(validation_error)?;
    check_owner_override(&ctx, req.owner_id)?;

    let course = Course::create(
        &state.db,
        &ctx,
        CreateCourse {
            title: req.title,
            owner_id: req.owner_id,
        },
    )
    .await?;

    UsageMetricsAggregator::new(state.db.clone())
        .enqueue(course.owner_id)
        .await?;

    Ok(Json(course))
}

/// `GET /v1/lessons`
pub async fn list_lessons(
    State(state): State<AppState>,
    Extension(ctx): Extension<ExecutionContext>,
    Query(query): Query<ScopeQuery>,
) -> ApiResult<Json<Vec<Lesson>>> {
    let scope = listing_scope(&ctx, &query)?;
    Ok(Json(Lesson::list(&state.db, &scope).await?))
}

/// `POST /v1/lessons`
pub async fn create_lesson(
    State(state): State<AppState>,
    Extension(ctx): Extension<ExecutionContext>,
    Json(req): Json<CreateLessonRequest>,
) -> ApiResult<Json<Lesson>> {
    req.validate().map_err(validation_error)?;
    check_owner_override(&ctx, req.owner_id)?;

    let lesson = Lesson::create(
        &state.db,
        &ctx,
        CreateLesson {
            course_id: req.course_id,
            title: req.title,
            owner_id: req.owner_id,
        },
    )
    .await?;

    UsageMetricsAggregator::new(state.db.clone())
        .enqueue(lesson.owner_id)
        .await?;

    Ok(Json(lesson))
}

/// `GET /v1/tasks`
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(ctx): Extension<ExecutionContext>,
    Query(query): Query<ScopeQuery>,
) -> ApiResult<Json<Vec<Task>>> {
    let scope = listing_scope(&ctx, &query)?;
    Ok(Json(Task::list(&state.db, &scope).await?))
}

/// `POST /v1/tasks`
pub async fn create_task(
    State(state): State<AppState>,
    Extension(ctx): Extension<ExecutionContext>,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<Json<Task>> {
    req.validate().map_err(validation_error)?;
    check_owner_override(&ctx, req.owner_id)?;

    let task = Task::create(
        &state.db,
        &ctx,
        CreateTask {
            title: req.title,
            owner_id: req.owner_id,
        },
    )
    .await?;

    Ok(Json(task))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_scope_regular_user() {
        let id = Uuid::new_v4();
        let ctx = ExecutionContext::principal(id, false);

        let scope = listing_scope(&ctx, &ScopeQuery { as_user: None }).unwrap();
        assert_eq!(scope.owner_filter(), Some(id));
    }

    #[test]
    fn test_listing_scope_rejects_as_user_for_non_admin() {
        let ctx = ExecutionContext::principal(Uuid::new_v4(), false);
        let query = ScopeQuery {
            as_user: Some(Uuid::new_v4()),
        };

        assert!(matches!(
            listing_scope(&ctx, &query),
            Err(ApiError::Forbidden(_))
        ));
    }

    #[test]
    fn test_listing_scope_admin_as_user() {
        let ctx = ExecutionContext::principal(Uuid::new_v4(), true);
        let target = Uuid::new_v4();
        let query = ScopeQuery {
            as_user: Some(target),
        };

        let scope = listing_scope(&ctx, &query).unwrap();
        assert_eq!(scope.owner_filter(), Some(target));
    }

    #[test]
    fn test_owner_override_admin_only() {
        let admin = ExecutionContext::principal(Uuid::new_v4(), true);
        let member = ExecutionContext::principal(Uuid::new_v4(), false);
        let other = Some(Uuid::new_v4());

        assert!(check_owner_override(&admin, other).is_ok());
        assert!(check_owner_override(&member, other).is_err());
        assert!(check_owner_override(&member, None).is_ok());
    }
}
