use sqlx::PgPool;
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::core::time::primitive_now_utc;
use crate::db;
use crate::db::models::Teacher;
use crate::db::types::AccountStatus;
use crate::repositories;

const CLASS_TAKEN_MESSAGE: &str =
    "A teacher is already assigned to this class. Only one teacher per class is allowed.";

pub(crate) struct NewTeacher<'a> {
    pub name: &'a str,
    pub mobile: &'a str,
    pub email: &'a str,
    pub photo_url: Option<&'a str>,
    pub class_id: Option<&'a str>,
}

pub(crate) async fn create(
    pool: &PgPool,
    school_id: &str,
    params: NewTeacher<'_>,
) -> Result<Teacher, ApiError> {
    if let Some(class_id) = params.class_id {
        check_assignable(pool, school_id, class_id, None).await?;
    }

    let existing = repositories::teachers::exists_by_email(pool, school_id, params.email, None)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to check teacher email"))?;
    if existing.is_some() {
        return Err(ApiError::Conflict("Email already exists for this school".to_string()));
    }

    let now = primitive_now_utc();
    repositories::teachers::create(
        pool,
        repositories::teachers::CreateTeacher {
            id: &Uuid::new_v4().to_string(),
            name: params.name,
            mobile: params.mobile,
            email: params.email,
            photo_url: params.photo_url,
            class_id: params.class_id,
            school_id,
            created_at: now,
            updated_at: now,
        },
    )
    .await
    .map_err(map_teacher_insert_error)
}

pub(crate) struct TeacherPatch {
    pub name: Option<String>,
    pub mobile: Option<String>,
    pub email: Option<String>,
    pub photo_url: Option<String>,
    pub class_id: Option<String>,
    pub status: Option<AccountStatus>,
}

pub(crate) async fn update(
    pool: &PgPool,
    teacher_id: &str,
    caller_school: Option<&str>,
    patch: TeacherPatch,
) -> Result<Teacher, ApiError> {
    let teacher = fetch_scoped(pool, teacher_id, caller_school).await?;

    if let Some(email) = patch.email.as_deref() {
        if email != teacher.email {
            let existing = repositories::teachers::exists_by_email(
                pool,
                &teacher.school_id,
                email,
                Some(&teacher.id),
            )
            .await
            .map_err(|e| ApiError::internal(e, "Failed to check teacher email"))?;
            if existing.is_some() {
                return Err(ApiError::Conflict(
                    "Email already exists for this school".to_string(),
                ));
            }
        }
    }

    if let Some(class_id) = patch.class_id.as_deref() {
        if teacher.class_id.as_deref() != Some(class_id) {
            check_assignable(pool, &teacher.school_id, class_id, Some(&teacher.id)).await?;
        }
    }

    repositories::teachers::update(
        pool,
        &teacher.id,
        repositories::teachers::UpdateTeacher {
            name: patch.name,
            mobile: patch.mobile,
            email: patch.email,
            photo_url: patch.photo_url,
            class_id: patch.class_id,
            status: patch.status,
            updated_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(map_teacher_insert_error)
}

/// Delete is a soft transition: the row is kept with status=inactive so the
/// historical class assignment stays on record.
pub(crate) async fn deactivate(
    pool: &PgPool,
    teacher_id: &str,
    caller_school: Option<&str>,
) -> Result<Teacher, ApiError> {
    let teacher = fetch_scoped(pool, teacher_id, caller_school).await?;

    repositories::teachers::set_status(pool, &teacher.id, AccountStatus::Inactive, primitive_now_utc())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to deactivate teacher"))
}

/// Assignment requires the class to exist in the same school, its session to
/// be active, and no other active teacher holding it.
async fn check_assignable(
    pool: &PgPool,
    school_id: &str,
    class_id: &str,
    exclude_teacher: Option<&str>,
) -> Result<(), ApiError> {
    let class = repositories::classes::find_by_id(pool, class_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch class"))?
        .ok_or_else(|| ApiError::NotFound("Class not found".to_string()))?;

    if class.school_id != school_id {
        return Err(ApiError::Forbidden("Class does not belong to your school".to_string()));
    }

    let session = repositories::sessions::find_by_id(pool, &class.session_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch session"))?
        .ok_or_else(|| ApiError::NotFound("Session not found".to_string()))?;

    if !session.active_status {
        return Err(ApiError::Validation(
            "Cannot assign teacher to a class in an inactive session".to_string(),
        ));
    }

    let occupied =
        repositories::teachers::find_active_for_class(pool, class_id, exclude_teacher)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to check class assignment"))?;
    if occupied.is_some() {
        return Err(ApiError::Conflict(CLASS_TAKEN_MESSAGE.to_string()));
    }

    Ok(())
}

async fn fetch_scoped(
    pool: &PgPool,
    teacher_id: &str,
    caller_school: Option<&str>,
) -> Result<Teacher, ApiError> {
    let teacher = repositories::teachers::find_by_id(pool, teacher_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch teacher"))?
        .ok_or_else(|| ApiError::NotFound("Teacher not found".to_string()))?;

    if let Some(school_id) = caller_school {
        if teacher.school_id != school_id {
            return Err(ApiError::Forbidden(
                "Teacher does not belong to your school".to_string(),
            ));
        }
    }

    Ok(teacher)
}

// The partial unique index on (class_id) WHERE status='active' closes the
// check-then-insert race; a lost race lands here instead of corrupting state.
fn map_teacher_insert_error(error: sqlx::Error) -> ApiError {
    if db::is_unique_violation(&error) {
        if db::violated_constraint(&error) == Some("teachers_one_active_per_class") {
            return ApiError::Conflict(CLASS_TAKEN_MESSAGE.to_string());
        }
        return ApiError::Conflict("Email already exists for this school".to_string());
    }
    ApiError::internal(error, "Failed to write teacher")
}
