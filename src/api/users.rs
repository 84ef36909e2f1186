use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::api::errors::ApiError;
use crate::api::guards::CurrentSuperadmin;
use crate::api::pagination::{default_limit, default_page, PageInfo, PageQuery};
use crate::api::validation::{validate_password_len, validate_payload};
use crate::core::security;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::db;
use crate::db::types::{AccountStatus, UserRole};
use crate::repositories;
use crate::schemas::user::{UserCreate, UserResponse, UserUpdate};
use crate::schemas::Envelope;
use crate::services::users;

#[derive(Debug, Deserialize)]
struct UserListQuery {
    #[serde(default)]
    role: Option<UserRole>,
    #[serde(default)]
    status: Option<AccountStatus>,
    #[serde(default)]
    #[serde(alias = "schoolId")]
    school_id: Option<String>,
    #[serde(default = "default_page")]
    page: i64,
    #[serde(default = "default_limit")]
    limit: i64,
}

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/:user_id", get(get_user).patch(update_user).delete(delete_user))
}

async fn list_users(
    Query(params): Query<UserListQuery>,
    CurrentSuperadmin(_admin): CurrentSuperadmin,
    State(state): State<AppState>,
) -> Result<Json<Envelope<Vec<UserResponse>>>, ApiError> {
    let (page, limit, offset) =
        PageQuery { page: params.page, limit: params.limit }.normalize();

    let filter = repositories::users::UserFilter {
        role: params.role,
        status: params.status,
        school_id: params.school_id.as_deref(),
    };

    let users = repositories::users::list(state.db(), &filter, offset, limit)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list users"))?;
    let total = repositories::users::count(state.db(), &filter)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to count users"))?;

    Ok(Json(Envelope::page(
        users.into_iter().map(|user| UserResponse::from_db(user, None)).collect(),
        PageInfo::new(page, limit, total),
    )))
}

async fn get_user(
    Path(user_id): Path<String>,
    CurrentSuperadmin(_admin): CurrentSuperadmin,
    State(state): State<AppState>,
) -> Result<Json<Envelope<UserResponse>>, ApiError> {
    let user = repositories::users::find_by_id(state.db(), &user_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch user"))?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(Envelope::data(UserResponse::from_db(user, None))))
}

async fn create_user(
    CurrentSuperadmin(admin): CurrentSuperadmin,
    State(state): State<AppState>,
    Json(payload): Json<UserCreate>,
) -> Result<(StatusCode, Json<Envelope<UserResponse>>), ApiError> {
    validate_payload(&payload)?;
    validate_password_len(&payload.password)?;

    let user = users::create(
        state.db(),
        users::NewUser {
            name: payload.name.trim(),
            email: &payload.email,
            username: payload.username.trim(),
            password: &payload.password,
            role: payload.role,
            school_id: payload.school_id.as_deref(),
            status: payload.status,
        },
    )
    .await?;

    tracing::info!(
        admin_id = %admin.id,
        user_id = %user.id,
        action = "user_create",
        "Superadmin created user"
    );

    Ok((
        StatusCode::CREATED,
        Json(Envelope::with_message("User created successfully", UserResponse::from_db(user, None))),
    ))
}

async fn update_user(
    Path(user_id): Path<String>,
    CurrentSuperadmin(admin): CurrentSuperadmin,
    State(state): State<AppState>,
    Json(payload): Json<UserUpdate>,
) -> Result<Json<Envelope<UserResponse>>, ApiError> {
    validate_payload(&payload)?;

    let existing = repositories::users::find_by_id(state.db(), &user_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch user"))?;
    if existing.is_none() {
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    let password_hash = match payload.password.as_deref() {
        Some(password) => {
            validate_password_len(password)?;
            Some(
                security::hash_password(password)
                    .map_err(|e| ApiError::internal(e, "Failed to hash password"))?,
            )
        }
        None => None,
    };

    repositories::users::update(
        state.db(),
        &user_id,
        repositories::users::UpdateUser {
            name: payload.name,
            email: payload.email.map(|email| email.trim().to_lowercase()),
            username: payload.username,
            password_hash,
            role: payload.role,
            school_id: payload.school_id,
            status: payload.status,
            updated_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| {
        if db::is_unique_violation(&e) {
            ApiError::Conflict("User with this email or username already exists".to_string())
        } else {
            ApiError::internal(e, "Failed to update user")
        }
    })?;

    let updated = repositories::users::fetch_one_by_id(state.db(), &user_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch updated user"))?;

    tracing::info!(
        admin_id = %admin.id,
        user_id = %updated.id,
        action = "user_update",
        "Superadmin updated user"
    );

    Ok(Json(Envelope::with_message(
        "User updated successfully",
        UserResponse::from_db(updated, None),
    )))
}

async fn delete_user(
    Path(user_id): Path<String>,
    CurrentSuperadmin(admin): CurrentSuperadmin,
    State(state): State<AppState>,
) -> Result<Json<Envelope<()>>, ApiError> {
    let deleted = repositories::users::delete(state.db(), &user_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete user"))?;
    if !deleted {
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    tracing::info!(
        admin_id = %admin.id,
        user_id = %user_id,
        action = "user_delete",
        "Superadmin deleted user"
    );

    Ok(Json(Envelope::message_only("User deleted successfully")))
}
