use sqlx::PgPool;
use time::Date;
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::core::time::primitive_now_utc;
use crate::db;
use crate::db::models::Student;
use crate::repositories;

pub(crate) struct NewStudent<'a> {
    pub admission_no: &'a str,
    pub name: &'a str,
    pub dob: Date,
    pub father_name: &'a str,
    pub mother_name: &'a str,
    pub mobile: &'a str,
    pub address: &'a str,
    pub aadhaar: Option<&'a str>,
    pub photo_url: Option<&'a str>,
    pub class_id: &'a str,
}

/// Creates a student under the class's school and session. The class is the
/// tenant anchor: school_id and session_id are copied from it, never from
/// caller input, so a mismatched school id in the request cannot move the
/// record across tenants.
pub(crate) async fn create(
    pool: &PgPool,
    caller_school: Option<&str>,
    params: NewStudent<'_>,
) -> Result<Student, ApiError> {
    let class = repositories::classes::find_by_id(pool, params.class_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch class"))?
        .ok_or_else(|| ApiError::NotFound("Class not found".to_string()))?;

    if let Some(school_id) = caller_school {
        if class.school_id != school_id {
            return Err(ApiError::Forbidden("Class does not belong to your school".to_string()));
        }
    }

    let session = repositories::sessions::find_by_id(pool, &class.session_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch session"))?
        .ok_or_else(|| ApiError::NotFound("Session not found".to_string()))?;

    if !session.active_status {
        return Err(ApiError::Validation(
            "Cannot create student in an inactive session".to_string(),
        ));
    }

    if class.frozen {
        return Err(ApiError::Validation(
            "Cannot create student in a frozen class".to_string(),
        ));
    }

    let existing =
        repositories::students::exists_by_admission_no(pool, &class.school_id, params.admission_no)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to check admission number"))?;
    if existing.is_some() {
        return Err(ApiError::Conflict(
            "Admission number already exists for this school".to_string(),
        ));
    }

    let now = primitive_now_utc();
    repositories::students::create(
        pool,
        repositories::students::CreateStudent {
            id: &Uuid::new_v4().to_string(),
            admission_no: params.admission_no,
            name: params.name,
            dob: params.dob,
            father_name: params.father_name,
            mother_name: params.mother_name,
            mobile: params.mobile,
            address: params.address,
            aadhaar: params.aadhaar,
            photo_url: params.photo_url,
            class_id: &class.id,
            session_id: &class.session_id,
            school_id: &class.school_id,
            created_at: now,
            updated_at: now,
        },
    )
    .await
    .map_err(|e| {
        if db::is_unique_violation(&e) {
            ApiError::Conflict("Admission number already exists for this school".to_string())
        } else {
            ApiError::internal(e, "Failed to create student")
        }
    })
}

pub(crate) struct StudentPatch {
    pub admission_no: Option<String>,
    pub name: Option<String>,
    pub dob: Option<Date>,
    pub father_name: Option<String>,
    pub mother_name: Option<String>,
    pub mobile: Option<String>,
    pub address: Option<String>,
    pub aadhaar: Option<String>,
    pub photo_url: Option<String>,
}

/// Updates are blocked entirely while the student's class is frozen,
/// regardless of which fields the patch touches.
pub(crate) async fn update(
    pool: &PgPool,
    student_id: &str,
    caller_school: Option<&str>,
    patch: StudentPatch,
) -> Result<Student, ApiError> {
    let student = fetch_mutable(pool, student_id, caller_school, "update").await?;

    if let Some(admission_no) = patch.admission_no.as_deref() {
        if admission_no != student.admission_no {
            let existing = repositories::students::exists_by_admission_no(
                pool,
                &student.school_id,
                admission_no,
            )
            .await
            .map_err(|e| ApiError::internal(e, "Failed to check admission number"))?;
            if existing.is_some() {
                return Err(ApiError::Conflict(
                    "Admission number already exists for this school".to_string(),
                ));
            }
        }
    }

    repositories::students::update(
        pool,
        &student.id,
        repositories::students::UpdateStudent {
            admission_no: patch.admission_no,
            name: patch.name,
            dob: patch.dob,
            father_name: patch.father_name,
            mother_name: patch.mother_name,
            mobile: patch.mobile,
            address: patch.address,
            aadhaar: patch.aadhaar,
            photo_url: patch.photo_url,
            updated_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| {
        if db::is_unique_violation(&e) {
            ApiError::Conflict("Admission number already exists for this school".to_string())
        } else {
            ApiError::internal(e, "Failed to update student")
        }
    })
}

pub(crate) async fn delete(
    pool: &PgPool,
    student_id: &str,
    caller_school: Option<&str>,
) -> Result<(), ApiError> {
    let student = fetch_mutable(pool, student_id, caller_school, "delete").await?;

    let deleted = repositories::students::delete(pool, &student.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete student"))?;
    if !deleted {
        return Err(ApiError::NotFound("Student not found".to_string()));
    }

    Ok(())
}

async fn fetch_mutable(
    pool: &PgPool,
    student_id: &str,
    caller_school: Option<&str>,
    action: &str,
) -> Result<Student, ApiError> {
    let student = repositories::students::find_by_id(pool, student_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch student"))?
        .ok_or_else(|| ApiError::NotFound("Student not found".to_string()))?;

    if let Some(school_id) = caller_school {
        if student.school_id != school_id {
            return Err(ApiError::Forbidden(
                "Student does not belong to your school".to_string(),
            ));
        }
    }

    let class = repositories::classes::find_by_id(pool, &student.class_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch class"))?
        .ok_or_else(|| ApiError::NotFound("Class not found".to_string()))?;

    if class.frozen {
        return Err(ApiError::Validation(format!(
            "Cannot {action} student in a frozen class"
        )));
    }

    Ok(student)
}
