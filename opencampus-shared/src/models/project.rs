/// Project model and scoped database operations
///
/// Projects are owned entities: every row carries an `owner_id` and every
/// query runs through an [`OwnershipScope`]. The scope is bound as a single
/// nullable uuid so unrestricted scopes and owner-filtered scopes share one
/// query shape.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE projects (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     owner_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     name VARCHAR(255) NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use opencampus_shared::access::{ExecutionContext, OwnershipScope};
/// use opencampus_shared::models::project::{CreateProject, Project};
/// use sqlx::PgPool;
/// use uuid::Uuid;
///
/// # async fn example(pool: PgPool, user_id: Uuid) -> Result<(), sqlx::Error> {
/// let ctx = ExecutionContext::principal(user_id, false);
///
/// // Owner is stamped from the context
/// let project = Project::create(&pool, &ctx, CreateProject {
///     name: "Rust course notes".to_string(),
///     owner_id: None,
/// }).await?;
///
/// // Listing is restricted to the principal's rows
/// let scope = OwnershipScope::from_context(&ctx);
/// let mine = Project::list(&pool, &scope).await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::access::{ExecutionContext, OwnershipScope};

/// Project owned by a single user
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Project {
    /// Project ID
    pub id: Uuid,

    /// Owning user
    pub owner_id: Uuid,

    /// Project name
    pub name: String,

    /// When the project was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProject {
    /// Project name
    pub name: String,

    /// Explicit owner. Under a principal context this may be left `None`
    /// and the principal's id is stamped in; under `System` it is required
    /// (the insert fails on a null owner otherwise).
    pub owner_id: Option<Uuid>,
}

impl Project {
    /// Creates a project, stamping the owner from the execution context
    pub async fn create(
        pool: &PgPool,
        ctx: &ExecutionContext,
        data: CreateProject,
    ) -> Result<Self, sqlx::Error> {
        let owner_id = ctx.stamp_owner(data.owner_id);

        sqlx::query_as::<_, Project>(
            r#"
            INSERT INTO projects (owner_id, name)
            VALUES ($1, $2)
            RETURNING id, owner_id, name, created_at
            "#,
        )
        .bind(owner_id)
        .bind(data.name)
        .fetch_one(pool)
        .await
    }

    /// Lists projects visible under the given scope
    pub async fn list(pool: &PgPool, scope: &OwnershipScope) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Project>(
            r#"
            SELECT id, owner_id, name, created_at
            FROM projects
            WHERE ($1::uuid IS NULL OR owner_id = $1)
            ORDER BY created_at DESC
            "#,
        )
        .bind(scope.owner_filter())
        .fetch_all(pool)
        .await
    }

    /// Counts projects visible under the given scope
    pub async fn count(pool: &PgPool, scope: &OwnershipScope) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM projects WHERE ($1::uuid IS NULL OR owner_id = $1)",
        )
        .bind(scope.owner_filter())
        .fetch_one(pool)
        .await
    }
}
