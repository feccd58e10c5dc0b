//! RBAC helpers for role-based route guarding.

use rolegate_core::error::AppError;

use crate::error::ApiError;
use crate::extractors::AuthUser;

/// Checks that the authenticated caller holds the Admin role.
pub fn require_admin(auth: &AuthUser) -> Result<(), ApiError> {
    if !auth.is_admin() {
        return Err(ApiError(AppError::authorization("Admin access required")));
    }
    Ok(())
}
