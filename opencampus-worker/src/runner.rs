/// Worker poll loop
///
/// Claims recount jobs in batches and runs each through the
/// [`UsageMetricsAggregator`]. A job whose user no longer exists is still
/// marked done; the aggregator logs and skips it. Only database failures
/// mark a job failed.

use opencampus_shared::metering::UsageMetricsAggregator;
use sqlx::PgPool;
use std::time::Duration;

use crate::queue::{QueueError, RecountQueue};

/// Default pause between empty polls
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Claims and executes recount jobs until shutdown
pub struct Runner {
    queue: RecountQueue,
    aggregator: UsageMetricsAggregator,
    poll_interval: Duration,
}

impl Runner {
    pub fn new(db: PgPool) -> Self {
        Runner {
            queue: RecountQueue::new(db.clone()),
            aggregator: UsageMetricsAggregator::new(db),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Runs the poll loop until a shutdown signal arrives
    pub async fn run(&self, mut shutdown: tokio::sync::watch::Receiver<bool>) {
        loop {
            tokio::select! {
                _ = shutdown.changed() => {
                    tracing::info!("Shutdown signal received, stopping runner");
                    return;
                }
                result = self.drain_batch() => {
                    match result {
                        // Nothing claimed; wait before the next poll
                        Ok(0) => tokio::time::sleep(self.poll_interval).await,
                        Ok(_) => {}
                        Err(e) => {
                            tracing::error!(error = %e, "Queue poll failed");
                            tokio::time::sleep(self.poll_interval).await;
                        }
                    }
                }
            }
        }
    }

    /// Claims one batch and processes every job in it
    ///
    /// Returns the number of jobs claimed.
    pub async fn drain_batch(&self) -> Result<usize, QueueError> {
        let jobs = self.queue.claim_jobs(None).await?;
        let claimed = jobs.len();

        for job in jobs {
            match self.aggregator.recount(job.user_id).await {
                Ok(_) => self.queue.mark_done(job.id).await?,
                Err(e) => {
                    self.queue.mark_failed(job.id, e.to_string()).await?;
                }
            }
        }

        Ok(claimed)
    }
}
