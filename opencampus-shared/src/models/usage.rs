/// Usage counter snapshot model
///
/// One row per user, created lazily on first recompute and fully replaced
/// on every update event (not incremental). The recompute itself lives in
/// [`metering`](crate::metering); this module only reads and upserts the
/// snapshot.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE usage_counters (
///     user_id UUID PRIMARY KEY REFERENCES users(id) ON DELETE CASCADE,
///     projects_count INTEGER NOT NULL DEFAULT 0,
///     courses_count INTEGER NOT NULL DEFAULT 0,
///     lessons_count INTEGER NOT NULL DEFAULT 0,
///     storage_used_mb BIGINT NOT NULL DEFAULT 0,
///     recalculated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Per-user usage counter snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct UsageCounters {
    /// User the snapshot belongs to
    pub user_id: Uuid,

    /// Number of projects owned
    pub projects_count: i32,

    /// Number of courses owned
    pub courses_count: i32,

    /// Number of lessons owned
    pub lessons_count: i32,

    /// Total video storage, whole megabytes (bytes rounded up)
    pub storage_used_mb: i64,

    /// When the snapshot was last recomputed
    pub recalculated_at: DateTime<Utc>,
}

impl UsageCounters {
    /// Gets a user's snapshot, or zero counters if none exists yet
    ///
    /// The zero snapshot is not persisted; persistence happens on the
    /// first recompute.
    pub async fn get_or_default(pool: &PgPool, user_id: Uuid) -> Result<Self, sqlx::Error> {
        let counters = sqlx::query_as::<_, UsageCounters>(
            r#"
            SELECT user_id, projects_count, courses_count, lessons_count,
                   storage_used_mb, recalculated_at
            FROM usage_counters
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(counters.unwrap_or(UsageCounters {
            user_id,
            projects_count: 0,
            courses_count: 0,
            lessons_count: 0,
            storage_used_mb: 0,
            recalculated_at: Utc::now(),
        }))
    }

    /// Persists a full snapshot, creating the row on first write
    pub async fn upsert(
        pool: &PgPool,
        user_id: Uuid,
        projects_count: i32,
        courses_count: i32,
        lessons_count: i32,
        storage_used_mb: i64,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, UsageCounters>(
            r#"
            INSERT INTO usage_counters
                (user_id, projects_count, courses_count, lessons_count, storage_used_mb, recalculated_at)
            VALUES ($1, $2, $3, $4, $5, NOW())
            ON CONFLICT (user_id) DO UPDATE SET
                projects_count = EXCLUDED.projects_count,
                courses_count = EXCLUDED.courses_count,
                lessons_count = EXCLUDED.lessons_count,
                storage_used_mb = EXCLUDED.storage_used_mb,
                recalculated_at = NOW()
            RETURNING user_id, projects_count, courses_count, lessons_count,
                      storage_used_mb, recalculated_at
            "#,
        )
        .bind(user_id)
        .bind(projects_count)
        .bind(courses_count)
        .bind(lessons_count)
        .bind(storage_used_mb)
        .fetch_one(pool)
        .await
    }
}
