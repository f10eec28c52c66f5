/// Admin analytics endpoints
///
/// Thin wrappers over
/// [`AnalyticsEngine`](opencampus_shared::analytics::AnalyticsEngine); all
/// require the admin role.
///
/// # Endpoints
///
/// - `GET /v1/admin/analytics/summary`
/// - `GET /v1/admin/analytics/trends?months=6`
/// - `GET /v1/admin/analytics/funnel?from=..&to=..`
/// - `GET /v1/admin/analytics/churn`
/// - `GET /v1/admin/analytics/engagement`
/// - `GET /v1/admin/analytics/daily-active?days=14`
/// - `GET /v1/admin/analytics/cohorts?months=6`
/// - `GET /v1/admin/analytics/export?from=..&to=..`

use crate::{app::AppState, error::ApiResult, routes::require_admin};
use axum::{
    extract::{Query, State},
    Extension, Json,
};
use chrono::{DateTime, Duration, Utc};
use opencampus_shared::{
    access::ExecutionContext,
    analytics::{
        AnalyticsEngine, AnalyticsExport, ChurnReport, CohortReport, DailyActivePoint,
        EngagementReport, FunnelStage, SummaryReport, TrendPoint, DEFAULT_DAU_DAYS,
        DEFAULT_TREND_MONTHS,
    },
};
use serde::Deserialize;

/// Month-window query (trends, cohorts)
#[derive(Debug, Deserialize)]
pub struct MonthsQuery {
    pub months: Option<u32>,
}

/// Day-window query (daily active)
#[derive(Debug, Deserialize)]
pub struct DaysQuery {
    pub days: Option<u32>,
}

/// Date-range query (funnel, export); defaults to the trailing 30 days
#[derive(Debug, Deserialize)]
pub struct RangeQuery {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl RangeQuery {
    fn resolve(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        let to = self.to.unwrap_or_else(Utc::now);
        let from = self.from.unwrap_or(to - Duration::days(30));
        (from, to)
    }
}

/// `GET /v1/admin/analytics/summary`
pub async fn summary(
    State(state): State<AppState>,
    Extension(ctx): Extension<ExecutionContext>,
) -> ApiResult<Json<SummaryReport>> {
    require_admin(&ctx)?;
    Ok(Json(AnalyticsEngine::new(state.db.clone()).summary().await?))
}

/// `GET /v1/admin/analytics/trends`
pub async fn trends(
    State(state): State<AppState>,
    Extension(ctx): Extension<ExecutionContext>,
    Query(query): Query<MonthsQuery>,
) -> ApiResult<Json<Vec<TrendPoint>>> {
    require_admin(&ctx)?;
    let months = query.months.unwrap_or(DEFAULT_TREND_MONTHS);
    Ok(Json(
        AnalyticsEngine::new(state.db.clone())
            .monthly_trends(months)
            .await?,
    ))
}

/// `GET /v1/admin/analytics/funnel`
pub async fn funnel(
    State(state): State<AppState>,
    Extension(ctx): Extension<ExecutionContext>,
    Query(query): Query<RangeQuery>,
) -> ApiResult<Json<Vec<FunnelStage>>> {
    require_admin(&ctx)?;
    let (from, to) = query.resolve();
    Ok(Json(
        AnalyticsEngine::new(state.db.clone()).funnel(from, to).await?,
    ))
}

/// `GET /v1/admin/analytics/churn`
pub async fn churn(
    State(state): State<AppState>,
    Extension(ctx): Extension<ExecutionContext>,
) -> ApiResult<Json<ChurnReport>> {
    require_admin(&ctx)?;
    Ok(Json(AnalyticsEngine::new(state.db.clone()).churn().await?))
}

/// `GET /v1/admin/analytics/engagement`
pub async fn engagement(
    State(state): State<AppState>,
    Extension(ctx): Extension<ExecutionContext>,
) -> ApiResult<Json<EngagementReport>> {
    require_admin(&ctx)?;
    Ok(Json(
        AnalyticsEngine::new(state.db.clone()).engagement().await?,
    ))
}

/// `GET /v1/admin/analytics/daily-active`
pub async fn daily_active(
    State(state): State<AppState>,
    Extension(ctx): Extension<ExecutionContext>,
    Query(query): Query<DaysQuery>,
) -> ApiResult<Json<Vec<DailyActivePoint>>> {
    require_admin(&ctx)?;
    let days = query.days.unwrap_or(DEFAULT_DAU_DAYS);
    Ok(Json(
        AnalyticsEngine::new(state.db.clone())
            .daily_active(days)
            .await?,
    ))
}

/// `GET /v1/admin/analytics/cohorts`
pub async fn cohorts(
    State(state): State<AppState>,
    Extension(ctx): Extension<ExecutionContext>,
    Query(query): Query<MonthsQuery>,
) -> ApiResult<Json<Vec<CohortReport>>> {
    require_admin(&ctx)?;
    let months = query.months.unwrap_or(DEFAULT_TREND_MONTHS);
    Ok(Json(
        AnalyticsEngine::new(state.db.clone()).cohorts(months).await?,
    ))
}

/// `GET /v1/admin/analytics/export`
pub async fn export(
    State(state): State<AppState>,
    Extension(ctx): Extension<ExecutionContext>,
    Query(query): Query<RangeQuery>,
) -> ApiResult<Json<AnalyticsExport>> {
    require_admin(&ctx)?;
    let (from, to) = query.resolve();
    Ok(Json(
        AnalyticsEngine::new(state.db.clone()).export(from, to).await?,
    ))
}
