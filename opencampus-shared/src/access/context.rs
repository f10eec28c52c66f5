/// Execution context for authorization decisions
///
/// Every data-access path is parameterized by an [`ExecutionContext`] instead
/// of reading an ambient "current user". This makes the trust boundary
/// explicit: `System` is a distinct variant that callers must construct on
/// purpose, never the result of a missing principal.
///
/// # Contexts
///
/// - `Principal`: an authenticated end user or admin; owned-entity queries
///   are restricted to rows they own unless they are an admin
/// - `System`: trusted non-interactive execution (worker jobs, console
///   tooling); no ownership restriction is applied
///
/// A request-triggered code path must never run under `System`. The API
/// server only ever constructs `Principal` contexts from validated tokens.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The acting user behind a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// User ID
    pub id: Uuid,

    /// Whether the user holds the admin role
    ///
    /// Derived from role assignment at authentication time, not stored
    /// on the user row.
    pub is_admin: bool,
}

/// Who a unit of work runs as
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionContext {
    /// Trusted background execution. Ownership scoping is off.
    System,

    /// Request-scoped execution on behalf of a user.
    Principal(Principal),
}

impl ExecutionContext {
    /// Creates a principal context
    pub fn principal(id: Uuid, is_admin: bool) -> Self {
        ExecutionContext::Principal(Principal { id, is_admin })
    }

    /// Gets the acting principal, if any
    pub fn acting_principal(&self) -> Option<&Principal> {
        match self {
            ExecutionContext::System => None,
            ExecutionContext::Principal(p) => Some(p),
        }
    }

    /// Gets the acting user's id, if any
    pub fn user_id(&self) -> Option<Uuid> {
        self.acting_principal().map(|p| p.id)
    }

    /// Whether the context is an admin principal
    pub fn is_admin(&self) -> bool {
        matches!(self, ExecutionContext::Principal(p) if p.is_admin)
    }

    /// Whether the context is trusted system execution
    pub fn is_system(&self) -> bool {
        matches!(self, ExecutionContext::System)
    }

    /// Resolves the owner to stamp onto a newly created owned entity
    ///
    /// An active principal's id wins over nothing; an explicit owner always
    /// wins. Under `System` with no explicit owner, `None` is returned and
    /// the caller must supply one (the insert will fail otherwise, by
    /// schema constraint).
    pub fn stamp_owner(&self, explicit: Option<Uuid>) -> Option<Uuid> {
        explicit.or_else(|| self.user_id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_principal_context() {
        let id = Uuid::new_v4();
        let ctx = ExecutionContext::principal(id, false);

        assert_eq!(ctx.user_id(), Some(id));
        assert!(!ctx.is_admin());
        assert!(!ctx.is_system());
    }

    #[test]
    fn test_admin_context() {
        let ctx = ExecutionContext::principal(Uuid::new_v4(), true);
        assert!(ctx.is_admin());
    }

    #[test]
    fn test_system_context() {
        let ctx = ExecutionContext::System;
        assert!(ctx.is_system());
        assert!(ctx.user_id().is_none());
        assert!(!ctx.is_admin());
    }

    #[test]
    fn test_stamp_owner_from_principal() {
        let id = Uuid::new_v4();
        let ctx = ExecutionContext::principal(id, false);

        assert_eq!(ctx.stamp_owner(None), Some(id));
    }

    #[test]
    fn test_stamp_owner_explicit_wins() {
        let id = Uuid::new_v4();
        let other = Uuid::new_v4();
        let ctx = ExecutionContext::principal(id, false);

        assert_eq!(ctx.stamp_owner(Some(other)), Some(other));
    }

    #[test]
    fn test_stamp_owner_system_requires_explicit() {
        let ctx = ExecutionContext::System;
        assert_eq!(ctx.stamp_owner(None), None);

        let id = Uuid::new_v4();
        assert_eq!(ctx.stamp_owner(Some(id)), Some(id));
    }
}
