/// Recount job queue reader
///
/// Polls the database for pending usage-recount jobs and claims them for
/// execution. Claiming uses `FOR UPDATE SKIP LOCKED`, so multiple workers
/// can drain the same queue without double-claiming.
///
/// # Polling Strategy
///
/// - Batch size: 10 jobs (configurable)
/// - Ordering: FIFO (created_at ASC)
///
/// # Example
///
/// ```no_run
/// use opencampus_worker::queue::RecountQueue;
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), Box<dyn std::error::Error>> {
/// let queue = RecountQueue::new(pool);
///
/// loop {
///     let jobs = queue.claim_jobs(None).await?;
///     for job in jobs {
///         println!("Claimed job for user {}", job.user_id);
///         // Run recount...
///     }
///     tokio::time::sleep(tokio::time::Duration::from_secs(1)).await;
/// }
/// # Ok(())
/// # }
/// ```

use opencampus_shared::metering::{RecountJob, RecountJobState};
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

/// Recount queue error
#[derive(Debug, Error)]
pub enum QueueError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Job not found (or not in the expected state)
    #[error("Job not found: {0}")]
    JobNotFound(Uuid),
}

/// Recount job queue reader
pub struct RecountQueue {
    /// Database connection pool
    db: PgPool,

    /// Maximum jobs to claim in one batch
    batch_size: usize,
}

impl RecountQueue {
    /// Creates a new queue reader with the default batch size
    pub fn new(db: PgPool) -> Self {
        RecountQueue { db, batch_size: 10 }
    }

    /// Creates a new queue reader with a custom batch size
    pub fn with_batch_size(db: PgPool, batch_size: usize) -> Self {
        RecountQueue { db, batch_size }
    }

    /// Claims pending jobs for execution
    ///
    /// Atomically transitions jobs from "pending" to "running" and returns
    /// them. Jobs locked by another worker are skipped.
    ///
    /// # Errors
    ///
    /// Returns error if the database query fails
    pub async fn claim_jobs(&self, limit: Option<usize>) -> Result<Vec<RecountJob>, QueueError> {
        let limit = limit.unwrap_or(self.batch_size) as i64;

        let jobs = sqlx::query_as::<_, RecountJob>(
            r#"
            WITH pending_jobs AS (
                SELECT id
                FROM usage_recount_jobs
                WHERE state = $1
                ORDER BY created_at ASC
                LIMIT $2
                FOR UPDATE SKIP LOCKED
            )
            UPDATE usage_recount_jobs
            SET
                state = $3,
                started_at = NOW()
            FROM pending_jobs
            WHERE usage_recount_jobs.id = pending_jobs.id
            RETURNING
                usage_recount_jobs.id,
                usage_recount_jobs.user_id,
                usage_recount_jobs.state,
                usage_recount_jobs.error,
                usage_recount_jobs.created_at,
                usage_recount_jobs.started_at,
                usage_recount_jobs.finished_at
            "#,
        )
        .bind(RecountJobState::Pending)
        .bind(limit)
        .bind(RecountJobState::Running)
        .fetch_all(&self.db)
        .await?;

        if !jobs.is_empty() {
            tracing::info!(count = jobs.len(), "Claimed recount jobs");
        }

        Ok(jobs)
    }

    /// Number of jobs currently pending
    pub async fn pending_count(&self) -> Result<i64, QueueError> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM usage_recount_jobs WHERE state = $1")
                .bind(RecountJobState::Pending)
                .fetch_one(&self.db)
                .await?;

        Ok(count)
    }

    /// Marks a running job as done
    ///
    /// # Errors
    ///
    /// Returns `JobNotFound` if the job does not exist or is not running
    pub async fn mark_done(&self, job_id: Uuid) -> Result<(), QueueError> {
        let result = sqlx::query(
            r#"
            UPDATE usage_recount_jobs
            SET state = $2, finished_at = NOW()
            WHERE id = $1 AND state = $3
            "#,
        )
        .bind(job_id)
        .bind(RecountJobState::Done)
        .bind(RecountJobState::Running)
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(QueueError::JobNotFound(job_id));
        }

        tracing::debug!(job_id = %job_id, "Recount job done");
        Ok(())
    }

    /// Marks a running job as failed with an error message
    ///
    /// # Errors
    ///
    /// Returns `JobNotFound` if the job does not exist or is not running
    pub async fn mark_failed(&self, job_id: Uuid, error: String) -> Result<(), QueueError> {
        let result = sqlx::query(
            r#"
            UPDATE usage_recount_jobs
            SET state = $2, finished_at = NOW(), error = $3
            WHERE id = $1 AND state = $4
            "#,
        )
        .bind(job_id)
        .bind(RecountJobState::Failed)
        .bind(error)
        .bind(RecountJobState::Running)
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(QueueError::JobNotFound(job_id));
        }

        tracing::warn!(job_id = %job_id, "Recount job failed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    // Integration tests with an actual database are in tests/queue_tests.rs
}
