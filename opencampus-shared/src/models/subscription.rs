/// Subscription model and database operations
///
/// # Schema
///
/// ```sql
/// CREATE TYPE subscription_status AS ENUM ('active', 'trialing', 'canceled');
///
/// CREATE TABLE subscriptions (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     status subscription_status NOT NULL DEFAULT 'trialing',
///     started_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     trial_ends_at TIMESTAMPTZ,
///     canceled_at TIMESTAMPTZ
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Lifecycle state of a subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "subscription_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    /// Paying subscriber
    Active,

    /// In a trial period
    Trialing,

    /// Canceled (churned)
    Canceled,
}

impl SubscriptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::Trialing => "trialing",
            SubscriptionStatus::Canceled => "canceled",
        }
    }
}

/// Billing subscription
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Subscription {
    /// Subscription ID
    pub id: Uuid,

    /// Subscribed user
    pub user_id: Uuid,

    /// Current status
    pub status: SubscriptionStatus,

    /// When the subscription started
    pub started_at: DateTime<Utc>,

    /// Trial end date, if the subscription carries a trial
    pub trial_ends_at: Option<DateTime<Utc>>,

    /// When the subscription was canceled (None while live)
    pub canceled_at: Option<DateTime<Utc>>,
}

impl Subscription {
    /// Starts a subscription for a user
    pub async fn start(
        pool: &PgPool,
        user_id: Uuid,
        status: SubscriptionStatus,
        trial_ends_at: Option<DateTime<Utc>>,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Subscription>(
            r#"
            INSERT INTO subscriptions (user_id, status, trial_ends_at)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, status, started_at, trial_ends_at, canceled_at
            "#,
        )
        .bind(user_id)
        .bind(status)
        .bind(trial_ends_at)
        .fetch_one(pool)
        .await
    }

    /// Cancels a subscription (records churn)
    pub async fn cancel(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE subscriptions
            SET status = $2, canceled_at = NOW()
            WHERE id = $1 AND status <> $2
            "#,
        )
        .bind(id)
        .bind(SubscriptionStatus::Canceled)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Finds a user's most recent live (active or trialing) subscription
    pub async fn find_live_for_user(
        pool: &PgPool,
        user_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Subscription>(
            r#"
            SELECT id, user_id, status, started_at, trial_ends_at, canceled_at
            FROM subscriptions
            WHERE user_id = $1 AND status IN ($2, $3)
            ORDER BY started_at DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .bind(SubscriptionStatus::Active)
        .bind(SubscriptionStatus::Trialing)
        .fetch_optional(pool)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_as_str() {
        assert_eq!(SubscriptionStatus::Active.as_str(), "active");
        assert_eq!(SubscriptionStatus::Trialing.as_str(), "trialing");
        assert_eq!(SubscriptionStatus::Canceled.as_str(), "canceled");
    }
}
