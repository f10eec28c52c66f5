/// Task model and scoped database operations

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::access::{ExecutionContext, OwnershipScope};

/// To-do task owned by a single user
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Task ID
    pub id: Uuid,

    /// Owning user
    pub owner_id: Uuid,

    /// Task title
    pub title: String,

    /// Whether the task has been completed
    pub completed: bool,

    /// When the task was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTask {
    /// Task title
    pub title: String,

    /// Explicit owner; stamped from the context when `None`
    pub owner_id: Option<Uuid>,
}

impl Task {
    /// Creates a task, stamping the owner from the execution context
    pub async fn create(
        pool: &PgPool,
        ctx: &ExecutionContext,
        data: CreateTask,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (owner_id, title)
            VALUES ($1, $2)
            RETURNING id, owner_id, title, completed, created_at
            "#,
        )
        .bind(ctx.stamp_owner(data.owner_id))
        .bind(data.title)
        .fetch_one(pool)
        .await
    }

    /// Lists tasks visible under the given scope
    pub async fn list(pool: &PgPool, scope: &OwnershipScope) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Task>(
            r#"
            SELECT id, owner_id, title, completed, created_at
            FROM tasks
            WHERE ($1::uuid IS NULL OR owner_id = $1)
            ORDER BY created_at DESC
            "#,
        )
        .bind(scope.owner_filter())
        .fetch_all(pool)
        .await
    }

    /// Marks a task completed
    pub async fn mark_completed(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE tasks SET completed = TRUE WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
