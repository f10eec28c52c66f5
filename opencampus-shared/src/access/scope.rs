/// Row-level ownership scoping for owned entities
///
/// Every query over an owned-entity table goes through an [`OwnershipScope`]
/// that either restricts rows to a single owner or applies no restriction.
/// The scope is derived from the [`ExecutionContext`] once, at the boundary,
/// and passed down to repositories; repositories never look at the context
/// directly.
///
/// # Scoping rules
///
/// | Context                  | Filter                      |
/// |--------------------------|-----------------------------|
/// | `System`                 | none                        |
/// | Admin principal          | none                        |
/// | Regular principal        | `owner_id = principal.id`   |
///
/// The SQL pattern is a single nullable bind:
/// `WHERE ($1::uuid IS NULL OR owner_id = $1)`.
///
/// # Example
///
/// ```
/// use opencampus_shared::access::{ExecutionContext, OwnershipScope};
/// use uuid::Uuid;
///
/// let user = Uuid::new_v4();
/// let ctx = ExecutionContext::principal(user, false);
///
/// let scope = OwnershipScope::from_context(&ctx);
/// assert_eq!(scope.owner_filter(), Some(user));
///
/// let admin_ctx = ExecutionContext::principal(Uuid::new_v4(), true);
/// assert_eq!(OwnershipScope::from_context(&admin_ctx).owner_filter(), None);
/// ```

use uuid::Uuid;

use super::context::ExecutionContext;

/// Owner filter applied to owned-entity queries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwnershipScope {
    owner: Option<Uuid>,
}

impl OwnershipScope {
    /// Derives the automatic scope from an execution context
    ///
    /// `System` and admin principals are unscoped; regular principals are
    /// restricted to their own rows.
    pub fn from_context(ctx: &ExecutionContext) -> Self {
        let owner = match ctx {
            ExecutionContext::System => None,
            ExecutionContext::Principal(p) if p.is_admin => None,
            ExecutionContext::Principal(p) => Some(p.id),
        };
        OwnershipScope { owner }
    }

    /// Builds an explicit "query as a specific user" scope
    ///
    /// Bypasses the automatic admin/system exemption and filters by the
    /// supplied user id. With no id, falls back to the current principal
    /// (admins included); under `System` with no id, no filter is applied.
    ///
    /// This is the admin-tooling escape hatch: an admin inspecting one
    /// user's content passes that user's id here.
    pub fn as_user(ctx: &ExecutionContext, user_id: Option<Uuid>) -> Self {
        OwnershipScope {
            owner: user_id.or_else(|| ctx.user_id()),
        }
    }

    /// An unrestricted scope
    ///
    /// Only for call sites that already decided scoping does not apply.
    pub fn unscoped() -> Self {
        OwnershipScope { owner: None }
    }

    /// The owner id to filter by, or `None` for no restriction
    ///
    /// Bind directly as a nullable uuid:
    /// `WHERE ($1::uuid IS NULL OR owner_id = $1)`
    pub fn owner_filter(&self) -> Option<Uuid> {
        self.owner
    }

    /// Whether this scope restricts rows at all
    pub fn is_restricted(&self) -> bool {
        self.owner.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_for_regular_principal() {
        let id = Uuid::new_v4();
        let ctx = ExecutionContext::principal(id, false);

        let scope = OwnershipScope::from_context(&ctx);
        assert_eq!(scope.owner_filter(), Some(id));
        assert!(scope.is_restricted());
    }

    #[test]
    fn test_scope_for_admin_is_unrestricted() {
        let ctx = ExecutionContext::principal(Uuid::new_v4(), true);

        let scope = OwnershipScope::from_context(&ctx);
        assert_eq!(scope.owner_filter(), None);
        assert!(!scope.is_restricted());
    }

    #[test]
    fn test_scope_for_system_is_unrestricted() {
        let scope = OwnershipScope::from_context(&ExecutionContext::System);
        assert_eq!(scope.owner_filter(), None);
    }

    #[test]
    fn test_as_user_with_explicit_id() {
        let admin = ExecutionContext::principal(Uuid::new_v4(), true);
        let target = Uuid::new_v4();

        // Admin inspecting a specific user's rows gets a restricted scope
        let scope = OwnershipScope::as_user(&admin, Some(target));
        assert_eq!(scope.owner_filter(), Some(target));
    }

    #[test]
    fn test_as_user_falls_back_to_principal() {
        let id = Uuid::new_v4();
        let ctx = ExecutionContext::principal(id, true);

        // No explicit id: even an admin is pinned to their own rows
        let scope = OwnershipScope::as_user(&ctx, None);
        assert_eq!(scope.owner_filter(), Some(id));
    }

    #[test]
    fn test_as_user_under_system_with_no_id() {
        let scope = OwnershipScope::as_user(&ExecutionContext::System, None);
        assert_eq!(scope.owner_filter(), None);
    }
}
