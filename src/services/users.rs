use sqlx::PgPool;
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::core::security;
use crate::core::time::primitive_now_utc;
use crate::db;
use crate::db::models::User;
use crate::db::types::{AccountStatus, UserRole};
use crate::repositories;

const DUPLICATE_MESSAGE: &str = "User with this email or username already exists";

pub(crate) struct NewUser<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub username: &'a str,
    pub password: &'a str,
    pub role: UserRole,
    pub school_id: Option<&'a str>,
    pub status: AccountStatus,
}

/// Shared creation path for the admin CRUD surface, bulk admin imports and
/// first-sign-in federated accounts. Email is stored lowercased and both
/// email and username are globally unique.
pub(crate) async fn create(pool: &PgPool, params: NewUser<'_>) -> Result<User, ApiError> {
    let email = params.email.trim().to_lowercase();

    if params.role != UserRole::Superadmin && params.school_id.is_none() {
        return Err(ApiError::Validation(
            "School ID is required for non-superadmin users".to_string(),
        ));
    }

    let existing = repositories::users::exists_by_email(pool, &email)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to check existing user"))?;
    if existing.is_some() {
        return Err(ApiError::Conflict(DUPLICATE_MESSAGE.to_string()));
    }

    let existing = repositories::users::exists_by_username(pool, params.username)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to check existing user"))?;
    if existing.is_some() {
        return Err(ApiError::Conflict(DUPLICATE_MESSAGE.to_string()));
    }

    let password_hash = security::hash_password(params.password)
        .map_err(|e| ApiError::internal(e, "Failed to hash password"))?;

    let now = primitive_now_utc();
    repositories::users::create(
        pool,
        repositories::users::CreateUser {
            id: &Uuid::new_v4().to_string(),
            name: params.name,
            email: &email,
            username: params.username,
            password_hash,
            role: params.role,
            school_id: if params.role == UserRole::Superadmin { None } else { params.school_id },
            status: params.status,
            created_at: now,
            updated_at: now,
        },
    )
    .await
    .map_err(|e| {
        if db::is_unique_violation(&e) {
            ApiError::Conflict(DUPLICATE_MESSAGE.to_string())
        } else {
            ApiError::internal(e, "Failed to create user")
        }
    })
}
