/// Prompt usage events
///
/// One row per AI prompt a user runs. The analytics engine reads these for
/// engagement and daily-active metrics; nothing ever updates a row after
/// insert.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// A single recorded prompt execution
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PromptUsage {
    /// Event ID
    pub id: Uuid,

    /// User who ran the prompt
    pub user_id: Uuid,

    /// When the prompt ran
    pub used_at: DateTime<Utc>,
}

impl PromptUsage {
    /// Records a prompt execution
    pub async fn record(pool: &PgPool, user_id: Uuid) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, PromptUsage>(
            r#"
            INSERT INTO prompt_usages (user_id)
            VALUES ($1)
            RETURNING id, user_id, used_at
            "#,
        )
        .bind(user_id)
        .fetch_one(pool)
        .await
    }

    /// Counts prompt executions for a user
    pub async fn count_for_user(pool: &PgPool, user_id: Uuid) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM prompt_usages WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(pool)
            .await
    }
}
