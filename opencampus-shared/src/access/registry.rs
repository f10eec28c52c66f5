/// Built-in role and permission definitions
///
/// Roles and permissions are shared, globally-scoped reference data. The
/// definitions here are the source of truth for what ships with the
/// platform; [`RoleRegistry::sync`] upserts them into the database and is
/// safe to run on every startup.
///
/// # Roles
///
/// - **admin**: full platform control, analytics, role management
/// - **instructor**: authors courses and lessons
/// - **member**: regular end user, manages own content
/// - **support**: handles support tickets and content moderation

use sqlx::PgPool;
use tracing::info;

use super::AccessError;

/// Name of the role that grants admin privileges
pub const ADMIN_ROLE: &str = "admin";

/// A built-in role and the permissions it bundles
#[derive(Debug, Clone, Copy)]
pub struct RoleDefinition {
    /// Unique role name
    pub name: &'static str,

    /// Human-readable description
    pub description: &'static str,

    /// Named capabilities granted by this role
    pub permissions: &'static [&'static str],
}

const BUILTIN_ROLES: &[RoleDefinition] = &[
    RoleDefinition {
        name: ADMIN_ROLE,
        description: "Full platform control",
        permissions: &[
            "users.manage",
            "roles.manage",
            "courses.manage",
            "lessons.manage",
            "projects.manage",
            "tasks.manage",
            "tickets.manage",
            "content.moderate",
            "analytics.view",
        ],
    },
    RoleDefinition {
        name: "instructor",
        description: "Authors courses and lessons",
        permissions: &["courses.manage", "lessons.manage", "projects.manage", "tasks.manage"],
    },
    RoleDefinition {
        name: "member",
        description: "Regular platform user",
        permissions: &["projects.manage", "tasks.manage"],
    },
    RoleDefinition {
        name: "support",
        description: "Handles tickets and moderation",
        permissions: &["tickets.manage", "content.moderate"],
    },
];

/// Registry of built-in role -> permission mappings
pub struct RoleRegistry;

impl RoleRegistry {
    /// All built-in role definitions
    pub fn builtin() -> &'static [RoleDefinition] {
        BUILTIN_ROLES
    }

    /// Looks up a built-in definition by role name
    pub fn definition(name: &str) -> Option<&'static RoleDefinition> {
        BUILTIN_ROLES.iter().find(|d| d.name == name)
    }

    /// Upserts the built-in roles and permissions into the database
    ///
    /// Idempotent: existing rows are left in place, missing ones are
    /// created, and role-permission links are completed. Permissions
    /// removed from a definition are not revoked here; that is an explicit
    /// administrative action.
    ///
    /// # Errors
    ///
    /// Returns an error if any statement fails; the whole sync runs in a
    /// single transaction.
    pub async fn sync(pool: &PgPool) -> Result<(), AccessError> {
        let mut tx = pool.begin().await?;

        for def in BUILTIN_ROLES {
            sqlx::query(
                r#"
                INSERT INTO roles (name, description)
                VALUES ($1, $2)
                ON CONFLICT (name) DO NOTHING
                "#,
            )
            .bind(def.name)
            .bind(def.description)
            .execute(&mut *tx)
            .await?;

            for permission in def.permissions {
                sqlx::query(
                    r#"
                    INSERT INTO permissions (name)
                    VALUES ($1)
                    ON CONFLICT (name) DO NOTHING
                    "#,
                )
                .bind(permission)
                .execute(&mut *tx)
                .await?;

                sqlx::query(
                    r#"
                    INSERT INTO role_permissions (role_id, permission_id)
                    SELECT r.id, p.id
                    FROM roles r, permissions p
                    WHERE r.name = $1 AND p.name = $2
                    ON CONFLICT DO NOTHING
                    "#,
                )
                .bind(def.name)
                .bind(permission)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;

        info!(roles = BUILTIN_ROLES.len(), "Role registry synced");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_builtin_role_names_are_unique() {
        let names: HashSet<_> = RoleRegistry::builtin().iter().map(|d| d.name).collect();
        assert_eq!(names.len(), RoleRegistry::builtin().len());
    }

    #[test]
    fn test_admin_definition_exists() {
        let admin = RoleRegistry::definition(ADMIN_ROLE).expect("admin role defined");
        assert!(admin.permissions.contains(&"roles.manage"));
        assert!(admin.permissions.contains(&"analytics.view"));
    }

    #[test]
    fn test_unknown_definition() {
        assert!(RoleRegistry::definition("superuser").is_none());
    }

    #[test]
    fn test_every_role_has_permissions() {
        for def in RoleRegistry::builtin() {
            assert!(!def.permissions.is_empty(), "role {} has no permissions", def.name);
        }
    }
}
