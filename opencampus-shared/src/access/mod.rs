/// Access control: execution context, ownership scoping, and role resolution
///
/// This module implements row-level ownership scoping and role-based access
/// control for OpenCampus.
///
/// # Design
///
/// Authorization state is never ambient. Every repository and service method
/// that needs to know "who is asking" takes an explicit [`ExecutionContext`]:
///
/// 1. **ExecutionContext**: either a [`Principal`] (request-scoped) or
///    `System` (trusted background execution, scoping off by construction)
/// 2. **OwnershipScope**: owner filter derived from the context, applied to
///    every query over owned entities
/// 3. **RoleResolver**: role/permission membership queries and role mutation
/// 4. **RoleRegistry**: built-in role -> permission definitions and seeding
///
/// # Example
///
/// ```no_run
/// use opencampus_shared::access::{ExecutionContext, OwnershipScope, Principal};
/// use opencampus_shared::models::project::Project;
/// use sqlx::PgPool;
/// use uuid::Uuid;
///
/// # async fn example(pool: PgPool, user_id: Uuid) -> Result<(), sqlx::Error> {
/// let ctx = ExecutionContext::principal(user_id, false);
/// let scope = OwnershipScope::from_context(&ctx);
///
/// // Returns only projects owned by `user_id`
/// let projects = Project::list(&pool, &scope).await?;
/// # Ok(())
/// # }
/// ```

pub mod context;
pub mod registry;
pub mod resolver;
pub mod scope;

pub use context::{ExecutionContext, Principal};
pub use registry::RoleRegistry;
pub use resolver::{RoleRef, RoleResolver};
pub use scope::OwnershipScope;

use uuid::Uuid;

/// Error type for access-control operations
#[derive(Debug, thiserror::Error)]
pub enum AccessError {
    /// Role name or id could not be resolved
    ///
    /// Raised uniformly by assign, remove, and sync. The original system
    /// only hard-failed on assign and silently dropped unknown names
    /// elsewhere; that asymmetry is deliberately not preserved.
    #[error("Role not found: {0}")]
    RoleNotFound(String),

    /// User does not exist
    #[error("User not found: {0}")]
    UserNotFound(Uuid),

    /// Caller is not allowed to perform the operation
    #[error("Not authorized to perform this operation")]
    Forbidden,

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}
