/// Role and permission models
///
/// Shared, globally-scoped reference data. Rows are seeded from
/// [`RoleRegistry`](crate::access::RoleRegistry) and mutated only by
/// administrative action. The user-role and role-permission associations
/// live in join tables and are managed by
/// [`RoleResolver`](crate::access::RoleResolver).

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Named bundle of permissions
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Role {
    /// Role ID
    pub id: Uuid,

    /// Unique role name, e.g. "instructor"
    pub name: String,

    /// Human-readable description
    pub description: Option<String>,
}

/// Named capability
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Permission {
    /// Permission ID
    pub id: Uuid,

    /// Unique permission name, e.g. "courses.manage"
    pub name: String,
}

impl Role {
    /// Finds a role by its unique name
    pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Role>("SELECT id, name, description FROM roles WHERE name = $1")
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// Finds a role by id
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Role>("SELECT id, name, description FROM roles WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Lists all roles
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Role>("SELECT id, name, description FROM roles ORDER BY name ASC")
            .fetch_all(pool)
            .await
    }

    /// Lists the permissions attached to this role
    pub async fn permissions(&self, pool: &PgPool) -> Result<Vec<Permission>, sqlx::Error> {
        sqlx::query_as::<_, Permission>(
            r#"
            SELECT p.id, p.name
            FROM role_permissions rp
            JOIN permissions p ON p.id = rp.permission_id
            WHERE rp.role_id = $1
            ORDER BY p.name ASC
            "#,
        )
        .bind(self.id)
        .fetch_all(pool)
        .await
    }
}
