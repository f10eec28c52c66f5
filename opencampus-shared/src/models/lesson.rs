/// Lesson and video asset models
///
/// Lessons belong to a course but carry their own `owner_id` so ownership
/// scoping never needs a join. Video assets record uploaded file sizes in
/// bytes; the usage aggregator sums them per owner.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::access::{ExecutionContext, OwnershipScope};

/// Lesson within a course
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Lesson {
    /// Lesson ID
    pub id: Uuid,

    /// Owning user
    pub owner_id: Uuid,

    /// Parent course
    pub course_id: Uuid,

    /// Lesson title
    pub title: String,

    /// Whether the lesson has been completed
    pub completed: bool,

    /// When the lesson was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a lesson
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateLesson {
    /// Parent course
    pub course_id: Uuid,

    /// Lesson title
    pub title: String,

    /// Explicit owner; stamped from the context when `None`
    pub owner_id: Option<Uuid>,
}

/// Uploaded video file attached to a lesson
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct VideoAsset {
    /// Asset ID
    pub id: Uuid,

    /// Owning user
    pub owner_id: Uuid,

    /// Parent lesson
    pub lesson_id: Uuid,

    /// File size in bytes
    pub size_bytes: i64,

    /// When the asset was uploaded
    pub created_at: DateTime<Utc>,
}

impl Lesson {
    /// Creates a lesson, stamping the owner from the execution context
    pub async fn create(
        pool: &PgPool,
        ctx: &ExecutionContext,
        data: CreateLesson,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Lesson>(
            r#"
            INSERT INTO lessons (owner_id, course_id, title)
            VALUES ($1, $2, $3)
            RETURNING id, owner_id, course_id, title, completed, created_at
            "#,
        )
        .bind(ctx.stamp_owner(data.owner_id))
        .bind(data.course_id)
        .bind(data.title)
        .fetch_one(pool)
        .await
    }

    /// Lists lessons visible under the given scope
    pub async fn list(pool: &PgPool, scope: &OwnershipScope) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Lesson>(
            r#"
            SELECT id, owner_id, course_id, title, completed, created_at
            FROM lessons
            WHERE ($1::uuid IS NULL OR owner_id = $1)
            ORDER BY created_at DESC
            "#,
        )
        .bind(scope.owner_filter())
        .fetch_all(pool)
        .await
    }

    /// Counts lessons visible under the given scope
    pub async fn count(pool: &PgPool, scope: &OwnershipScope) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM lessons WHERE ($1::uuid IS NULL OR owner_id = $1)",
        )
        .bind(scope.owner_filter())
        .fetch_one(pool)
        .await
    }

    /// Marks a lesson completed
    pub async fn mark_completed(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE lessons SET completed = TRUE WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

impl VideoAsset {
    /// Records an uploaded video asset
    pub async fn create(
        pool: &PgPool,
        ctx: &ExecutionContext,
        lesson_id: Uuid,
        size_bytes: i64,
        owner_id: Option<Uuid>,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, VideoAsset>(
            r#"
            INSERT INTO video_assets (owner_id, lesson_id, size_bytes)
            VALUES ($1, $2, $3)
            RETURNING id, owner_id, lesson_id, size_bytes, created_at
            "#,
        )
        .bind(ctx.stamp_owner(owner_id))
        .bind(lesson_id)
        .bind(size_bytes)
        .fetch_one(pool)
        .await
    }

    /// Total bytes of video uploaded by a user
    pub async fn total_bytes_for_owner(pool: &PgPool, owner_id: Uuid) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COALESCE(SUM(size_bytes), 0) FROM video_assets WHERE owner_id = $1",
        )
        .bind(owner_id)
        .fetch_one(pool)
        .await
    }
}
