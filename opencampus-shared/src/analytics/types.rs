/// Report types returned by the analytics engine
///
/// All of these serialize directly as API responses. Percentages are
/// pre-rounded to two decimal places by the engine.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A point-in-time count with its 30-day percent change
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricWithDelta {
    /// Current value
    pub value: i64,

    /// Percent change versus 30 days ago, rounded to 2 dp
    pub change_pct: f64,
}

/// A completed-out-of-total metric with its completion rate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionMetric {
    /// Completed count
    pub completed: i64,

    /// Total count
    pub total: i64,

    /// completed / total as a percentage, rounded to 2 dp
    pub rate_pct: f64,
}

/// Top-line dashboard snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryReport {
    /// All registered users
    pub total_users: MetricWithDelta,

    /// Users who logged in within the last 30 days
    pub active_users: MetricWithDelta,

    /// Live (active or trialing) subscriptions
    pub active_subscriptions: MetricWithDelta,

    /// Lesson completions platform-wide
    pub lessons_completed: CompletionMetric,

    /// Task completions platform-wide
    pub tasks_completed: CompletionMetric,
}

/// One calendar month in the growth trend series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    /// Year of the bucket
    pub year: i32,

    /// Month of the bucket (1-12)
    pub month: u32,

    /// English month name ("January", ...)
    pub label: String,

    /// Users who signed up during the month
    pub new_users: i64,

    /// Completed payment revenue during the month
    pub revenue: Decimal,
}

/// One stage of the conversion funnel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunnelStage {
    /// Stage name ("signups", "trials", "paid")
    pub stage: String,

    /// Users reaching this stage
    pub count: i64,

    /// Percent of the previous stage; the first stage is always 100
    pub rate_pct: f64,
}

/// Churn and retention snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChurnReport {
    /// Subscriptions canceled in the trailing 30 days
    pub canceled_last_30_days: i64,

    /// Subscriptions started this calendar month
    pub started_this_month: i64,

    /// Subscriptions started the previous calendar month
    pub started_previous_month: i64,

    /// this month / previous month as a percentage (0 when the previous
    /// month had no starts)
    pub retention_pct: f64,
}

/// Engagement snapshot across active users
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngagementReport {
    /// Users who logged in within the last 30 days
    pub active_users: i64,

    /// Percent of lessons completed platform-wide
    pub lesson_completion_pct: f64,

    /// Percent of tasks completed platform-wide
    pub task_completion_pct: f64,

    /// Prompt executions per active user
    pub avg_prompts_per_active_user: f64,

    /// Projects per active user
    pub avg_projects_per_active_user: f64,
}

/// One day in the daily-active-users series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyActivePoint {
    /// Calendar date
    pub date: NaiveDate,

    /// Users whose most recent login was on this date
    pub count: i64,
}

/// One signup-month cohort with its current retention
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CohortReport {
    /// Year of the cohort's signup month
    pub year: i32,

    /// Month of the cohort's signup month (1-12)
    pub month: u32,

    /// English month name
    pub label: String,

    /// Users who signed up during the month
    pub cohort_size: i64,

    /// Cohort members with a live subscription today
    pub retained: i64,

    /// retained / cohort_size as a percentage
    pub retention_pct: f64,
}

/// Complete analytics export
///
/// Each section is computed by its own query; the export is eventually
/// consistent and does not represent a single transactional snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsExport {
    /// When the export was generated
    pub generated_at: DateTime<Utc>,

    /// Start of the funnel window (inclusive)
    pub from: DateTime<Utc>,

    /// End of the funnel window (exclusive)
    pub to: DateTime<Utc>,

    pub summary: SummaryReport,
    pub trends: Vec<TrendPoint>,
    pub funnel: Vec<FunnelStage>,
    pub churn: ChurnReport,
    pub engagement: EngagementReport,
    pub daily_active: Vec<DailyActivePoint>,
    pub cohorts: Vec<CohortReport>,
}
