/// Payment model and database operations
///
/// Amounts are decimal currency values (`NUMERIC(12,2)` in Postgres,
/// [`rust_decimal::Decimal`] in Rust). Revenue aggregation never touches
/// floating point, so repeated sums cannot drift.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Lifecycle state of a payment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "payment_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Awaiting settlement
    Pending,

    /// Settled; counts toward revenue
    Completed,

    /// Failed to settle
    Failed,

    /// Refunded after settlement
    Refunded,
}

/// Payment record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Payment {
    /// Payment ID
    pub id: Uuid,

    /// Paying user
    pub user_id: Uuid,

    /// Decimal currency amount
    pub amount: Decimal,

    /// Current status
    pub status: PaymentStatus,

    /// When the payment was made
    pub paid_at: DateTime<Utc>,
}

impl Payment {
    /// Records a payment
    pub async fn create(
        pool: &PgPool,
        user_id: Uuid,
        amount: Decimal,
        status: PaymentStatus,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Payment>(
            r#"
            INSERT INTO payments (user_id, amount, status)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, amount, status, paid_at
            "#,
        )
        .bind(user_id)
        .bind(amount)
        .bind(status)
        .fetch_one(pool)
        .await
    }

    /// Total completed revenue for a user
    pub async fn total_completed_for_user(
        pool: &PgPool,
        user_id: Uuid,
    ) -> Result<Decimal, sqlx::Error> {
        sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(amount), 0)
            FROM payments
            WHERE user_id = $1 AND status = $2
            "#,
        )
        .bind(user_id)
        .bind(PaymentStatus::Completed)
        .fetch_one(pool)
        .await
    }
}
