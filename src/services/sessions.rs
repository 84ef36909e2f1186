use sqlx::PgPool;
use time::Date;
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::core::time::primitive_now_utc;
use crate::db;
use crate::db::models::Session;
use crate::repositories;

pub(crate) struct NewSession<'a> {
    pub school_id: &'a str,
    pub session_name: &'a str,
    pub start_date: Date,
    pub end_date: Date,
}

pub(crate) async fn create(pool: &PgPool, params: NewSession<'_>) -> Result<Session, ApiError> {
    if params.start_date >= params.end_date {
        return Err(ApiError::Validation("Start date must be before end date".to_string()));
    }

    let existing =
        repositories::sessions::exists_by_name(pool, params.school_id, params.session_name)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to check session name"))?;
    if existing.is_some() {
        return Err(ApiError::Conflict(
            "Session name already exists for this school".to_string(),
        ));
    }

    let now = primitive_now_utc();
    repositories::sessions::create(
        pool,
        repositories::sessions::CreateSession {
            id: &Uuid::new_v4().to_string(),
            session_name: params.session_name,
            start_date: params.start_date,
            end_date: params.end_date,
            school_id: params.school_id,
            created_at: now,
            updated_at: now,
        },
    )
    .await
    .map_err(|e| {
        if db::is_unique_violation(&e) {
            ApiError::Conflict("Session name already exists for this school".to_string())
        } else {
            ApiError::internal(e, "Failed to create session")
        }
    })
}

pub(crate) async fn activate(
    pool: &PgPool,
    session_id: &str,
    caller_school: Option<&str>,
) -> Result<Session, ApiError> {
    let session = fetch_scoped(pool, session_id, caller_school).await?;

    repositories::sessions::activate(pool, &session.id, &session.school_id, primitive_now_utc())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to activate session"))
}

pub(crate) async fn deactivate(
    pool: &PgPool,
    session_id: &str,
    caller_school: Option<&str>,
) -> Result<Session, ApiError> {
    let session = fetch_scoped(pool, session_id, caller_school).await?;

    if !session.active_status {
        return Err(ApiError::InvalidState("Session is already inactive".to_string()));
    }

    repositories::sessions::deactivate(pool, &session.id, primitive_now_utc())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to deactivate session"))
}

async fn fetch_scoped(
    pool: &PgPool,
    session_id: &str,
    caller_school: Option<&str>,
) -> Result<Session, ApiError> {
    let session = repositories::sessions::find_by_id(pool, session_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch session"))?
        .ok_or_else(|| ApiError::NotFound("Session not found".to_string()))?;

    if let Some(school_id) = caller_school {
        if session.school_id != school_id {
            return Err(ApiError::Forbidden(
                "Session does not belong to your school".to_string(),
            ));
        }
    }

    Ok(session)
}
