/// Course model and scoped database operations
///
/// Courses follow the same ownership-scoping pattern as
/// [`Project`](crate::models::project::Project).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::access::{ExecutionContext, OwnershipScope};

/// Course owned by a single user (its author)
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Course {
    /// Course ID
    pub id: Uuid,

    /// Owning user
    pub owner_id: Uuid,

    /// Course title
    pub title: String,

    /// When the course was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a course
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCourse {
    /// Course title
    pub title: String,

    /// Explicit owner; stamped from the context when `None`
    pub owner_id: Option<Uuid>,
}

impl Course {
    /// Creates a course, stamping the owner from the execution context
    pub async fn create(
        pool: &PgPool,
        ctx: &ExecutionContext,
        data: CreateCourse,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Course>(
            r#"
            INSERT INTO courses (owner_id, title)
            VALUES ($1, $2)
            RETURNING id, owner_id, title, created_at
            "#,
        )
        .bind(ctx.stamp_owner(data.owner_id))
        .bind(data.title)
        .fetch_one(pool)
        .await
    }

    /// Lists courses visible under the given scope
    pub async fn list(pool: &PgPool, scope: &OwnershipScope) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Course>(
            r#"
            SELECT id, owner_id, title, created_at
            FROM courses
            WHERE ($1::uuid IS NULL OR owner_id = $1)
            ORDER BY created_at DESC
            "#,
        )
        .bind(scope.owner_filter())
        .fetch_all(pool)
        .await
    }

    /// Counts courses visible under the given scope
    pub async fn count(pool: &PgPool, scope: &OwnershipScope) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM courses WHERE ($1::uuid IS NULL OR owner_id = $1)",
        )
        .bind(scope.owner_filter())
        .fetch_one(pool)
        .await
    }
}
