/// Role and permission resolution
///
/// This module answers "does this user hold this role / permission" and
/// mutates role assignment. Role arguments are a [`RoleRef`] sum type
/// (name or id) resolved once at the boundary into a concrete
/// [`Role`](crate::models::role::Role) record, never re-branched on
/// downstream.
///
/// # Error policy
///
/// Unknown role names are a hard [`AccessError::RoleNotFound`] for assign,
/// remove, and sync alike. Assignment and removal are idempotent: repeating
/// either leaves the same end state.
///
/// # Example
///
/// ```no_run
/// use opencampus_shared::access::{RoleRef, RoleResolver};
/// use sqlx::PgPool;
/// use uuid::Uuid;
///
/// # async fn example(pool: PgPool, user_id: Uuid) -> Result<(), Box<dyn std::error::Error>> {
/// let resolver = RoleResolver::new(pool);
///
/// resolver.assign_role(user_id, &RoleRef::name("instructor")).await?;
/// assert!(resolver.has_role(user_id, &RoleRef::name("instructor")).await?);
///
/// let permissions = resolver.all_permissions(user_id).await?;
/// # Ok(())
/// # }
/// ```

use sqlx::PgPool;
use uuid::Uuid;

use super::registry::ADMIN_ROLE;
use super::AccessError;
use crate::models::role::Role;

/// Reference to a role: by unique name or by id
///
/// Replaces the original system's runtime branching on argument type with
/// a tagged union resolved exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleRef {
    /// Role name, e.g. "instructor"
    Name(String),

    /// Role id
    Id(Uuid),
}

impl RoleRef {
    /// Convenience constructor for a name reference
    pub fn name(name: impl Into<String>) -> Self {
        RoleRef::Name(name.into())
    }

    /// Parses a string that is either a uuid or a role name
    ///
    /// Anything that parses as a uuid is treated as an id; everything else
    /// is a name. Role names are constrained to non-uuid shapes by the
    /// registry, so this is unambiguous.
    pub fn parse(s: &str) -> Self {
        match Uuid::parse_str(s) {
            Ok(id) => RoleRef::Id(id),
            Err(_) => RoleRef::Name(s.to_string()),
        }
    }

    /// Human-readable form for error messages
    fn describe(&self) -> String {
        match self {
            RoleRef::Name(name) => name.clone(),
            RoleRef::Id(id) => id.to_string(),
        }
    }
}

/// Role/permission membership queries and role mutation
pub struct RoleResolver {
    db: PgPool,
}

impl RoleResolver {
    /// Creates a new resolver
    pub fn new(db: PgPool) -> Self {
        RoleResolver { db }
    }

    /// Resolves a role reference to a concrete role record
    ///
    /// # Errors
    ///
    /// Returns `AccessError::RoleNotFound` if no role matches.
    pub async fn resolve(&self, role_ref: &RoleRef) -> Result<Role, AccessError> {
        let role = match role_ref {
            RoleRef::Name(name) => Role::find_by_name(&self.db, name).await?,
            RoleRef::Id(id) => Role::find_by_id(&self.db, *id).await?,
        };

        role.ok_or_else(|| AccessError::RoleNotFound(role_ref.describe()))
    }

    /// Checks whether a user holds a role
    ///
    /// An unknown role name is not an error here; it simply matches nothing.
    pub async fn has_role(&self, user_id: Uuid, role_ref: &RoleRef) -> Result<bool, AccessError> {
        let held: bool = match role_ref {
            RoleRef::Name(name) => {
                sqlx::query_scalar(
                    r#"
                    SELECT EXISTS(
                        SELECT 1 FROM user_roles ur
                        JOIN roles r ON r.id = ur.role_id
                        WHERE ur.user_id = $1 AND r.name = $2
                    )
                    "#,
                )
                .bind(user_id)
                .bind(name)
                .fetch_one(&self.db)
                .await?
            }
            RoleRef::Id(role_id) => {
                sqlx::query_scalar(
                    r#"
                    SELECT EXISTS(
                        SELECT 1 FROM user_roles
                        WHERE user_id = $1 AND role_id = $2
                    )
                    "#,
                )
                .bind(user_id)
                .bind(role_id)
                .fetch_one(&self.db)
                .await?
            }
        };

        Ok(held)
    }

    /// Checks whether a user holds any of the given roles (logical OR)
    pub async fn has_any_role(
        &self,
        user_id: Uuid,
        role_refs: &[RoleRef],
    ) -> Result<bool, AccessError> {
        for role_ref in role_refs {
            if self.has_role(user_id, role_ref).await? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Checks whether any of the user's roles carries the named permission
    pub async fn has_permission(
        &self,
        user_id: Uuid,
        permission: &str,
    ) -> Result<bool, AccessError> {
        let held: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM user_roles ur
                JOIN role_permissions rp ON rp.role_id = ur.role_id
                JOIN permissions p ON p.id = rp.permission_id
                WHERE ur.user_id = $1 AND p.name = $2
            )
            "#,
        )
        .bind(user_id)
        .bind(permission)
        .fetch_one(&self.db)
        .await?;

        Ok(held)
    }

    /// Whether the user holds the admin role
    pub async fn is_admin(&self, user_id: Uuid) -> Result<bool, AccessError> {
        self.has_role(user_id, &RoleRef::name(ADMIN_ROLE)).await
    }

    /// Lists the roles assigned to a user
    pub async fn roles_for(&self, user_id: Uuid) -> Result<Vec<Role>, AccessError> {
        let roles = sqlx::query_as::<_, Role>(
            r#"
            SELECT r.id, r.name, r.description
            FROM user_roles ur
            JOIN roles r ON r.id = ur.role_id
            WHERE ur.user_id = $1
            ORDER BY r.name ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;

        Ok(roles)
    }

    /// The de-duplicated union of every permission across the user's roles
    ///
    /// Order-insensitive; returned sorted for stable output.
    pub async fn all_permissions(&self, user_id: Uuid) -> Result<Vec<String>, AccessError> {
        let permissions: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT DISTINCT p.name
            FROM user_roles ur
            JOIN role_permissions rp ON rp.role_id = ur.role_id
            JOIN permissions p ON p.id = rp.permission_id
            WHERE ur.user_id = $1
            ORDER BY p.name ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;

        Ok(permissions)
    }

    /// Assigns a role to a user (idempotent)
    ///
    /// # Errors
    ///
    /// Returns `AccessError::RoleNotFound` for an unresolvable reference.
    pub async fn assign_role(&self, user_id: Uuid, role_ref: &RoleRef) -> Result<(), AccessError> {
        let role = self.resolve(role_ref).await?;

        sqlx::query(
            r#"
            INSERT INTO user_roles (user_id, role_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id, role_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(role.id)
        .execute(&self.db)
        .await?;

        tracing::debug!(user_id = %user_id, role = %role.name, "Role assigned");
        Ok(())
    }

    /// Removes a role from a user (idempotent)
    ///
    /// Removing a role the user does not hold is a no-op, but an
    /// unresolvable reference is still a hard error.
    pub async fn remove_role(&self, user_id: Uuid, role_ref: &RoleRef) -> Result<(), AccessError> {
        let role = self.resolve(role_ref).await?;

        sqlx::query("DELETE FROM user_roles WHERE user_id = $1 AND role_id = $2")
            .bind(user_id)
            .bind(role.id)
            .execute(&self.db)
            .await?;

        tracing::debug!(user_id = %user_id, role = %role.name, "Role removed");
        Ok(())
    }

    /// Replaces the user's full assigned-role set with exactly the given set
    ///
    /// All references are resolved up front; any unresolvable reference
    /// aborts the sync before a single row changes. The delete + insert
    /// runs in one transaction.
    pub async fn sync_roles(
        &self,
        user_id: Uuid,
        role_refs: &[RoleRef],
    ) -> Result<(), AccessError> {
        let mut role_ids = Vec::with_capacity(role_refs.len());
        for role_ref in role_refs {
            role_ids.push(self.resolve(role_ref).await?.id);
        }

        let mut tx = self.db.begin().await?;

        sqlx::query("DELETE FROM user_roles WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        for role_id in &role_ids {
            sqlx::query(
                r#"
                INSERT INTO user_roles (user_id, role_id)
                VALUES ($1, $2)
                ON CONFLICT (user_id, role_id) DO NOTHING
                "#,
            )
            .bind(user_id)
            .bind(role_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        tracing::debug!(user_id = %user_id, count = role_ids.len(), "Roles synced");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_ref_parse_uuid() {
        let id = Uuid::new_v4();
        assert_eq!(RoleRef::parse(&id.to_string()), RoleRef::Id(id));
    }

    #[test]
    fn test_role_ref_parse_name() {
        assert_eq!(RoleRef::parse("instructor"), RoleRef::name("instructor"));
    }

    #[test]
    fn test_role_ref_describe() {
        assert_eq!(RoleRef::name("support").describe(), "support");

        let id = Uuid::new_v4();
        assert_eq!(RoleRef::Id(id).describe(), id.to_string());
    }

    // Integration tests against a live database are in tests/access_tests.rs
}
