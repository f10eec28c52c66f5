/// Usage counter recomputation
///
/// Counters are never incremented in place. Every update event triggers a
/// full recount from the content tables, so a lost or duplicated event can
/// never leave a counter permanently wrong. Recounts run either inline
/// (synchronously, after a content write) or through the recount job queue
/// drained by the worker.
///
/// # Example
///
/// ```rust,no_run
/// use opencampus_shared::metering::UsageMetricsAggregator;
/// use uuid::Uuid;
///
/// # async fn example(pool: sqlx::PgPool, user_id: Uuid) -> Result<(), sqlx::Error> {
/// let aggregator = UsageMetricsAggregator::new(pool);
/// aggregator.recount(user_id).await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::usage::UsageCounters;

const BYTES_PER_MB: i64 = 1_048_576;

/// State of a queued recount job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "recount_job_state", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RecountJobState {
    Pending,
    Running,
    Done,
    Failed,
}

/// Queued request to recompute one user's counters
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct RecountJob {
    /// Job ID
    pub id: Uuid,

    /// User whose counters should be recomputed
    pub user_id: Uuid,

    /// Current job state
    pub state: RecountJobState,

    /// Error message, set when the job failed
    pub error: Option<String>,

    /// When the job was enqueued
    pub created_at: DateTime<Utc>,

    /// When a worker picked the job up
    pub started_at: Option<DateTime<Utc>>,

    /// When the job finished (done or failed)
    pub finished_at: Option<DateTime<Utc>>,
}

/// Recomputes per-user usage counters from the content tables
#[derive(Debug, Clone)]
pub struct UsageMetricsAggregator {
    db: PgPool,
}

impl UsageMetricsAggregator {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Recounts all usage metrics for a user and stores the snapshot
    ///
    /// Counts projects, courses, and lessons owned by the user, sums video
    /// storage (bytes rounded up to whole megabytes), and replaces the
    /// user's snapshot row in a single upsert.
    ///
    /// If the user does not exist, logs a warning and returns `Ok(None)`
    /// without touching any counters. Events for deleted users are expected
    /// during normal operation and must not fail the queue.
    pub async fn recount(&self, user_id: Uuid) -> Result<Option<UsageCounters>, sqlx::Error> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
            .bind(user_id)
            .fetch_one(&self.db)
            .await?;

        if !exists {
            tracing::warn!(%user_id, "skipping usage recount for unknown user");
            return Ok(None);
        }

        let (projects, courses, lessons, storage_bytes): (i64, i64, i64, i64) =
            sqlx::query_as(
                r#"
                SELECT
                    (SELECT COUNT(*) FROM projects WHERE owner_id = $1),
                    (SELECT COUNT(*) FROM courses WHERE owner_id = $1),
                    (SELECT COUNT(*) FROM lessons WHERE owner_id = $1),
                    (SELECT COALESCE(SUM(size_bytes), 0) FROM video_assets WHERE owner_id = $1)
                "#,
            )
            .bind(user_id)
            .fetch_one(&self.db)
            .await?;

        let counters = UsageCounters::upsert(
            &self.db,
            user_id,
            projects as i32,
            courses as i32,
            lessons as i32,
            bytes_to_mb_ceil(storage_bytes),
        )
        .await?;

        tracing::debug!(
            %user_id,
            projects = counters.projects_count,
            courses = counters.courses_count,
            lessons = counters.lessons_count,
            storage_mb = counters.storage_used_mb,
            "recomputed usage counters"
        );

        Ok(Some(counters))
    }

    /// Enqueues a recount job for the worker to pick up
    pub async fn enqueue(&self, user_id: Uuid) -> Result<RecountJob, sqlx::Error> {
        sqlx::query_as::<_, RecountJob>(
            r#"
            INSERT INTO usage_recount_jobs (user_id)
            VALUES ($1)
            RETURNING id, user_id, state, error, created_at, started_at, finished_at
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.db)
        .await
    }
}

/// Rounds a byte count up to whole megabytes
fn bytes_to_mb_ceil(bytes: i64) -> i64 {
    if bytes <= 0 {
        return 0;
    }
    (bytes + BYTES_PER_MB - 1) / BYTES_PER_MB
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_bytes_is_zero_mb() {
        assert_eq!(bytes_to_mb_ceil(0), 0);
    }

    #[test]
    fn test_partial_megabyte_rounds_up() {
        assert_eq!(bytes_to_mb_ceil(1), 1);
        assert_eq!(bytes_to_mb_ceil(BYTES_PER_MB - 1), 1);
    }

    #[test]
    fn test_exact_megabytes() {
        assert_eq!(bytes_to_mb_ceil(BYTES_PER_MB), 1);
        assert_eq!(bytes_to_mb_ceil(10 * BYTES_PER_MB), 10);
    }

    #[test]
    fn test_just_over_a_megabyte() {
        assert_eq!(bytes_to_mb_ceil(BYTES_PER_MB + 1), 2);
    }
}
