/// Platform analytics for the admin dashboard
///
/// The engine reads the content, billing, and login tables directly; it
/// never touches the per-user usage counters, which exist for quota
/// display rather than reporting. Each report method runs its own queries,
/// so a full export is eventually consistent rather than a transactional
/// snapshot.
///
/// All percentage math is delegated to [`math`], where the
/// zero-denominator policy is defined and unit tested.

pub mod math;
pub mod types;

use chrono::{DateTime, Duration, NaiveTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::models::payment::PaymentStatus;
use crate::models::subscription::SubscriptionStatus;

pub use types::{
    AnalyticsExport, ChurnReport, CohortReport, CompletionMetric, DailyActivePoint,
    EngagementReport, FunnelStage, MetricWithDelta, SummaryReport, TrendPoint,
};

/// Width of the delta comparison window for summary metrics
const DELTA_WINDOW_DAYS: i64 = 30;

/// Default number of months in trend and cohort series
pub const DEFAULT_TREND_MONTHS: u32 = 6;

/// Default number of days in the daily-active series
pub const DEFAULT_DAU_DAYS: u32 = 14;

/// Computes admin dashboard reports from the platform tables
#[derive(Debug, Clone)]
pub struct AnalyticsEngine {
    db: PgPool,
}

impl AnalyticsEngine {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Top-line snapshot with 30-day deltas
    pub async fn summary(&self) -> Result<SummaryReport, sqlx::Error> {
        let now = Utc::now();
        let cutoff = now - Duration::days(DELTA_WINDOW_DAYS);
        let prior_cutoff = now - Duration::days(2 * DELTA_WINDOW_DAYS);

        let total_users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.db)
            .await?;
        let total_users_before: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE created_at < $1")
                .bind(cutoff)
                .fetch_one(&self.db)
                .await?;

        let active_users: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE last_login_at >= $1")
                .bind(cutoff)
                .fetch_one(&self.db)
                .await?;
        let active_users_before: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM users WHERE last_login_at >= $1 AND last_login_at < $2",
        )
        .bind(prior_cutoff)
        .bind(cutoff)
        .fetch_one(&self.db)
        .await?;

        let live_subscriptions: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM subscriptions WHERE status IN ($1, $2)",
        )
        .bind(SubscriptionStatus::Active)
        .bind(SubscriptionStatus::Trialing)
        .fetch_one(&self.db)
        .await?;
        // Reconstructed state as of the cutoff: started before it and not
        // yet canceled at that point.
        let live_subscriptions_before: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM subscriptions
            WHERE started_at < $1
              AND (canceled_at IS NULL OR canceled_at >= $1)
            "#,
        )
        .bind(cutoff)
        .fetch_one(&self.db)
        .await?;

        let (lessons_completed, lessons_total): (i64, i64) = sqlx::query_as(
            "SELECT COUNT(*) FILTER (WHERE completed), COUNT(*) FROM lessons",
        )
        .fetch_one(&self.db)
        .await?;
        let (tasks_completed, tasks_total): (i64, i64) = sqlx::query_as(
            "SELECT COUNT(*) FILTER (WHERE completed), COUNT(*) FROM tasks",
        )
        .fetch_one(&self.db)
        .await?;

        Ok(SummaryReport {
            total_users: MetricWithDelta {
                value: total_users,
                change_pct: math::percent_change(total_users_before, total_users),
            },
            active_users: MetricWithDelta {
                value: active_users,
                change_pct: math::percent_change(active_users_before, active_users),
            },
            active_subscriptions: MetricWithDelta {
                value: live_subscriptions,
                change_pct: math::percent_change(live_subscriptions_before, live_subscriptions),
            },
            lessons_completed: CompletionMetric {
                completed: lessons_completed,
                total: lessons_total,
                rate_pct: math::percent_of(lessons_completed, lessons_total),
            },
            tasks_completed: CompletionMetric {
                completed: tasks_completed,
                total: tasks_total,
                rate_pct: math::percent_of(tasks_completed, tasks_total),
            },
        })
    }

    /// Monthly signup and revenue series over the trailing `months` months
    ///
    /// Every month in the window appears in the result; months with no
    /// activity report zero.
    pub async fn monthly_trends(&self, months: u32) -> Result<Vec<TrendPoint>, sqlx::Error> {
        let today = Utc::now().date_naive();
        let window = math::month_sequence(today, months);
        let since = window
            .first()
            .copied()
            .unwrap_or(today)
            .and_time(NaiveTime::MIN)
            .and_utc();

        let signups: Vec<(chrono::NaiveDate, i64)> = sqlx::query_as(
            r#"
            SELECT date_trunc('month', created_at)::date, COUNT(*)
            FROM users
            WHERE created_at >= $1
            GROUP BY 1
            "#,
        )
        .bind(since)
        .fetch_all(&self.db)
        .await?;

        let revenue: Vec<(chrono::NaiveDate, Decimal)> = sqlx::query_as(
            r#"
            SELECT date_trunc('month', paid_at)::date, SUM(amount)
            FROM payments
            WHERE status = $2 AND paid_at >= $1
            GROUP BY 1
            "#,
        )
        .bind(since)
        .bind(PaymentStatus::Completed)
        .fetch_all(&self.db)
        .await?;

        Ok(window
            .into_iter()
            .map(|month| {
                use chrono::Datelike;
                let new_users = signups
                    .iter()
                    .find(|(m, _)| *m == month)
                    .map(|(_, c)| *c)
                    .unwrap_or(0);
                let month_revenue = revenue
                    .iter()
                    .find(|(m, _)| *m == month)
                    .map(|(_, r)| *r)
                    .unwrap_or(Decimal::ZERO);
                TrendPoint {
                    year: month.year(),
                    month: month.month(),
                    label: math::month_name(month.month()).to_string(),
                    new_users,
                    revenue: month_revenue,
                }
            })
            .collect())
    }

    /// Conversion funnel over `[from, to)`: signups, trial starts, paid
    /// conversions
    pub async fn funnel(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<FunnelStage>, sqlx::Error> {
        let signups: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM users WHERE created_at >= $1 AND created_at < $2",
        )
        .bind(from)
        .bind(to)
        .fetch_one(&self.db)
        .await?;

        let trials: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM subscriptions
            WHERE started_at >= $1 AND started_at < $2
              AND (status = $3 OR trial_ends_at IS NOT NULL)
            "#,
        )
        .bind(from)
        .bind(to)
        .bind(SubscriptionStatus::Trialing)
        .fetch_one(&self.db)
        .await?;

        let paid: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(DISTINCT user_id) FROM payments
            WHERE paid_at >= $1 AND paid_at < $2 AND status = $3
            "#,
        )
        .bind(from)
        .bind(to)
        .bind(PaymentStatus::Completed)
        .fetch_one(&self.db)
        .await?;

        let counts = [signups, trials, paid];
        let rates = math::funnel_rates(&counts);
        let names = ["signups", "trials", "paid"];

        Ok(names
            .iter()
            .zip(counts.iter().zip(rates))
            .map(|(name, (count, rate_pct))| FunnelStage {
                stage: name.to_string(),
                count: *count,
                rate_pct,
            })
            .collect())
    }

    /// Churn over the trailing 30 days plus month-over-month retention
    pub async fn churn(&self) -> Result<ChurnReport, sqlx::Error> {
        let now = Utc::now();
        let cutoff = now - Duration::days(DELTA_WINDOW_DAYS);
        let today = now.date_naive();
        let this_month = math::month_start(today).and_time(NaiveTime::MIN).and_utc();
        let previous_month = math::months_back(today, 1).and_time(NaiveTime::MIN).and_utc();

        let canceled: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM subscriptions WHERE canceled_at >= $1")
                .bind(cutoff)
                .fetch_one(&self.db)
                .await?;

        let started_this_month: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM subscriptions WHERE started_at >= $1")
                .bind(this_month)
                .fetch_one(&self.db)
                .await?;

        let started_previous_month: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM subscriptions WHERE started_at >= $1 AND started_at < $2",
        )
        .bind(previous_month)
        .bind(this_month)
        .fetch_one(&self.db)
        .await?;

        Ok(ChurnReport {
            canceled_last_30_days: canceled,
            started_this_month,
            started_previous_month,
            retention_pct: math::percent_of(started_this_month, started_previous_month),
        })
    }

    /// Completion rates and per-active-user averages
    pub async fn engagement(&self) -> Result<EngagementReport, sqlx::Error> {
        let cutoff = Utc::now() - Duration::days(DELTA_WINDOW_DAYS);

        let active_users: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE last_login_at >= $1")
                .bind(cutoff)
                .fetch_one(&self.db)
                .await?;

        let (lessons_completed, lessons_total): (i64, i64) = sqlx::query_as(
            "SELECT COUNT(*) FILTER (WHERE completed), COUNT(*) FROM lessons",
        )
        .fetch_one(&self.db)
        .await?;
        let (tasks_completed, tasks_total): (i64, i64) = sqlx::query_as(
            "SELECT COUNT(*) FILTER (WHERE completed), COUNT(*) FROM tasks",
        )
        .fetch_one(&self.db)
        .await?;

        let prompts: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM prompt_usages")
            .fetch_one(&self.db)
            .await?;
        let projects: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM projects")
            .fetch_one(&self.db)
            .await?;

        Ok(EngagementReport {
            active_users,
            lesson_completion_pct: math::percent_of(lessons_completed, lessons_total),
            task_completion_pct: math::percent_of(tasks_completed, tasks_total),
            avg_prompts_per_active_user: math::average_per(prompts, active_users),
            avg_projects_per_active_user: math::average_per(projects, active_users),
        })
    }

    /// Daily-active series over the trailing `days` days
    ///
    /// The full date range is materialized; days with no logins report 0.
    pub async fn daily_active(&self, days: u32) -> Result<Vec<DailyActivePoint>, sqlx::Error> {
        let today = Utc::now().date_naive();
        let start = today - Duration::days(days.saturating_sub(1) as i64);
        let since = start.and_time(NaiveTime::MIN).and_utc();

        let observed: Vec<(chrono::NaiveDate, i64)> = sqlx::query_as(
            r#"
            SELECT last_login_at::date, COUNT(*)
            FROM users
            WHERE last_login_at >= $1
            GROUP BY 1
            "#,
        )
        .bind(since)
        .fetch_all(&self.db)
        .await?;

        Ok(math::fill_daily(start, days, &observed)
            .into_iter()
            .map(|(date, count)| DailyActivePoint { date, count })
            .collect())
    }

    /// Signup-month cohorts with their current subscription retention
    ///
    /// Months with no signups are omitted entirely.
    pub async fn cohorts(&self, months: u32) -> Result<Vec<CohortReport>, sqlx::Error> {
        use chrono::Datelike;

        let today = Utc::now().date_naive();
        let since = math::months_back(today, months.saturating_sub(1))
            .and_time(NaiveTime::MIN)
            .and_utc();

        let rows: Vec<(chrono::NaiveDate, i64, i64)> = sqlx::query_as(
            r#"
            SELECT date_trunc('month', u.created_at)::date AS cohort,
                   COUNT(DISTINCT u.id),
                   COUNT(DISTINCT s.user_id)
            FROM users u
            LEFT JOIN subscriptions s
              ON s.user_id = u.id AND s.status IN ($2, $3)
            WHERE u.created_at >= $1
            GROUP BY 1
            ORDER BY 1
            "#,
        )
        .bind(since)
        .bind(SubscriptionStatus::Active)
        .bind(SubscriptionStatus::Trialing)
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(month, cohort_size, retained)| CohortReport {
                year: month.year(),
                month: month.month(),
                label: math::month_name(month.month()).to_string(),
                cohort_size,
                retained,
                retention_pct: math::percent_of(retained, cohort_size),
            })
            .collect())
    }

    /// Assembles every report into one export
    pub async fn export(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<AnalyticsExport, sqlx::Error> {
        Ok(AnalyticsExport {
            generated_at: Utc::now(),
            from,
            to,
            summary: self.summary().await?,
            trends: self.monthly_trends(DEFAULT_TREND_MONTHS).await?,
            funnel: self.funnel(from, to).await?,
            churn: self.churn().await?,
            engagement: self.engagement().await?,
            daily_active: self.daily_active(DEFAULT_DAU_DAYS).await?,
            cohorts: self.cohorts(DEFAULT_TREND_MONTHS).await?,
        })
    }
}
