use sqlx::PgPool;
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::core::time::primitive_now_utc;
use crate::db;
use crate::db::models::Class;
use crate::repositories;

pub(crate) struct NewClass<'a> {
    pub school_id: &'a str,
    pub session_id: &'a str,
    pub class_name: &'a str,
}

pub(crate) async fn create(pool: &PgPool, params: NewClass<'_>) -> Result<Class, ApiError> {
    let session = repositories::sessions::find_by_id(pool, params.session_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch session"))?
        .ok_or_else(|| ApiError::NotFound("Session not found".to_string()))?;

    if session.school_id != params.school_id {
        return Err(ApiError::Forbidden("Session does not belong to your school".to_string()));
    }

    if !session.active_status {
        return Err(ApiError::Validation(
            "Cannot create class in an inactive session".to_string(),
        ));
    }

    let existing = repositories::classes::exists_by_name(
        pool,
        params.school_id,
        params.session_id,
        params.class_name,
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to check class name"))?;
    if existing.is_some() {
        return Err(ApiError::Conflict(
            "Class name already exists for this session in your school".to_string(),
        ));
    }

    let now = primitive_now_utc();
    repositories::classes::create(
        pool,
        repositories::classes::CreateClass {
            id: &Uuid::new_v4().to_string(),
            class_name: params.class_name,
            school_id: params.school_id,
            session_id: params.session_id,
            created_at: now,
            updated_at: now,
        },
    )
    .await
    .map_err(|e| {
        if db::is_unique_violation(&e) {
            ApiError::Conflict(
                "Class name already exists for this session in your school".to_string(),
            )
        } else {
            ApiError::internal(e, "Failed to create class")
        }
    })
}

pub(crate) async fn freeze(
    pool: &PgPool,
    class_id: &str,
    caller_school: Option<&str>,
) -> Result<Class, ApiError> {
    let class = fetch_scoped(pool, class_id, caller_school).await?;

    if class.frozen {
        return Err(ApiError::InvalidState("Class is already frozen".to_string()));
    }

    repositories::classes::set_frozen(pool, &class.id, true, primitive_now_utc())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to freeze class"))
}

pub(crate) async fn unfreeze(
    pool: &PgPool,
    class_id: &str,
    caller_school: Option<&str>,
) -> Result<Class, ApiError> {
    let class = fetch_scoped(pool, class_id, caller_school).await?;

    if !class.frozen {
        return Err(ApiError::InvalidState("Class is already unfrozen".to_string()));
    }

    repositories::classes::set_frozen(pool, &class.id, false, primitive_now_utc())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to unfreeze class"))
}

async fn fetch_scoped(
    pool: &PgPool,
    class_id: &str,
    caller_school: Option<&str>,
) -> Result<Class, ApiError> {
    let class = repositories::classes::find_by_id(pool, class_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch class"))?
        .ok_or_else(|| ApiError::NotFound("Class not found".to_string()))?;

    if let Some(school_id) = caller_school {
        if class.school_id != school_id {
            return Err(ApiError::Forbidden("Class does not belong to your school".to_string()));
        }
    }

    Ok(class)
}
