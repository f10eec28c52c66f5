/// API route handlers
///
/// # Modules
///
/// - `health`: Health check endpoint
/// - `auth`: Registration, login, token refresh
/// - `content`: Ownership-scoped content listings and creation
/// - `usage`: Usage counter endpoints
/// - `roles`: Role administration (admin-only)
/// - `analytics`: Admin dashboard reports (admin-only)

pub mod analytics;
pub mod auth;
pub mod content;
pub mod health;
pub mod roles;
pub mod usage;

use crate::error::{ApiError, ValidationErrorDetail};
use opencampus_shared::access::ExecutionContext;

/// Rejects non-admin principals
///
/// `System` never reaches a handler; requests always carry a principal.
pub(crate) fn require_admin(ctx: &ExecutionContext) -> Result<(), ApiError> {
    if ctx.is_admin() {
        Ok(())
    } else {
        Err(ApiError::Forbidden(
            "Administrator access required".to_string(),
        ))
    }
}

/// Converts validator errors into the API's validation error shape
pub(crate) fn validation_error(e: validator::ValidationErrors) -> ApiError {
    let errors: Vec<ValidationErrorDetail> = e
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| ValidationErrorDetail {
                field: field.to_string(),
                message: error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "Validation failed".to_string()),
            })
        })
        .collect();
    ApiError::ValidationError(errors)
}
