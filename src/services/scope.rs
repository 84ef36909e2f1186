use crate::api::errors::ApiError;
use crate::db::models::User;
use crate::db::types::UserRole;

/// The single place deciding which school a request operates on.
///
/// Superadmins may address any tenant by passing a school id explicitly;
/// everyone else always acts on the school from their own account, and any
/// requested school id is ignored rather than rejected.
pub(crate) fn resolve_school_scope(
    user: &User,
    requested: Option<String>,
) -> Result<String, ApiError> {
    if user.role == UserRole::Superadmin {
        requested
            .filter(|value| !value.trim().is_empty())
            .or_else(|| user.school_id.clone())
            .ok_or_else(|| ApiError::Validation("School ID is required".to_string()))
    } else {
        user.school_id
            .clone()
            .ok_or_else(|| {
                ApiError::Validation("School ID is required for non-superadmin users".to_string())
            })
    }
}

/// Tenant gate for operations on a single record: `None` means the caller is
/// unrestricted (superadmin), `Some(school)` means the target must belong to
/// that school.
pub(crate) fn tenant_gate(user: &User) -> Result<Option<String>, ApiError> {
    if user.role == UserRole::Superadmin {
        Ok(None)
    } else {
        user.school_id.clone().map(Some).ok_or_else(|| {
            ApiError::Validation("School ID is required for non-superadmin users".to_string())
        })
    }
}
