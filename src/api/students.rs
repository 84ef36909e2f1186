use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};
use serde::Deserialize;

use crate::api::errors::ApiError;
use crate::api::guards::{require_role, CurrentUser};
use crate::api::pagination::{default_limit, default_page, PageInfo, PageQuery};
use crate::api::validation::{parse_date_field, validate_payload};
use crate::core::state::AppState;
use crate::db::types::UserRole;
use crate::repositories;
use crate::schemas::student::{StudentCreate, StudentResponse, StudentUpdate};
use crate::schemas::Envelope;
use crate::services::{scope, students};

#[derive(Debug, Deserialize)]
struct StudentListQuery {
    #[serde(default)]
    #[serde(alias = "schoolId")]
    school_id: Option<String>,
    #[serde(default)]
    #[serde(alias = "classId")]
    class_id: Option<String>,
    #[serde(default = "default_page")]
    page: i64,
    #[serde(default = "default_limit")]
    limit: i64,
}

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_students).post(create_student))
        .route("/:student_id", patch(update_student).delete(delete_student))
}

async fn create_student(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Json(payload): Json<StudentCreate>,
) -> Result<(StatusCode, Json<Envelope<StudentResponse>>), ApiError> {
    require_role(&user, &[UserRole::Superadmin, UserRole::Schooladmin])?;
    validate_payload(&payload)?;

    let dob = parse_date_field(&payload.dob, "date of birth")?;
    let gate = scope::tenant_gate(&user)?;

    let student = students::create(
        state.db(),
        gate.as_deref(),
        students::NewStudent {
            admission_no: payload.admission_no.trim(),
            name: payload.name.trim(),
            dob,
            father_name: payload.father_name.trim(),
            mother_name: payload.mother_name.trim(),
            mobile: payload.mobile.trim(),
            address: payload.address.trim(),
            aadhaar: payload.aadhaar.as_deref(),
            photo_url: payload.photo_url.as_deref(),
            class_id: payload.class_id.trim(),
        },
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(Envelope::with_message(
            "Student created successfully",
            StudentResponse::from_db(student),
        )),
    ))
}

async fn list_students(
    Query(params): Query<StudentListQuery>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<Envelope<Vec<StudentResponse>>>, ApiError> {
    let school_id = scope::resolve_school_scope(&user, params.school_id)?;

    // A class filter from another tenant is a scoping violation, not an
    // empty result.
    if let Some(class_id) = params.class_id.as_deref() {
        let class = repositories::classes::find_by_id(state.db(), class_id)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to fetch class"))?;
        match class {
            Some(class) if class.school_id == school_id => {}
            _ => {
                return Err(ApiError::Forbidden(
                    "Class does not belong to your school".to_string(),
                ))
            }
        }
    }

    let (page, limit, offset) =
        PageQuery { page: params.page, limit: params.limit }.normalize();

    let students = repositories::students::list(
        state.db(),
        &school_id,
        params.class_id.as_deref(),
        offset,
        limit,
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to list students"))?;

    let total = repositories::students::count(state.db(), &school_id, params.class_id.as_deref())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to count students"))?;

    Ok(Json(Envelope::page(
        students.into_iter().map(StudentResponse::from_db).collect(),
        PageInfo::new(page, limit, total),
    )))
}

async fn update_student(
    Path(student_id): Path<String>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Json(payload): Json<StudentUpdate>,
) -> Result<Json<Envelope<StudentResponse>>, ApiError> {
    require_role(&user, &[UserRole::Superadmin, UserRole::Schooladmin])?;
    let gate = scope::tenant_gate(&user)?;

    let dob = match payload.dob.as_deref() {
        Some(value) => Some(parse_date_field(value, "date of birth")?),
        None => None,
    };

    let student = students::update(
        state.db(),
        &student_id,
        gate.as_deref(),
        students::StudentPatch {
            admission_no: payload.admission_no,
            name: payload.name,
            dob,
            father_name: payload.father_name,
            mother_name: payload.mother_name,
            mobile: payload.mobile,
            address: payload.address,
            aadhaar: payload.aadhaar,
            photo_url: payload.photo_url,
        },
    )
    .await?;

    Ok(Json(Envelope::with_message(
        "Student updated successfully",
        StudentResponse::from_db(student),
    )))
}

async fn delete_student(
    Path(student_id): Path<String>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<Envelope<()>>, ApiError> {
    require_role(&user, &[UserRole::Superadmin, UserRole::Schooladmin])?;
    let gate = scope::tenant_gate(&user)?;

    students::delete(state.db(), &student_id, gate.as_deref()).await?;

    Ok(Json(Envelope::message_only("Student deleted successfully")))
}
