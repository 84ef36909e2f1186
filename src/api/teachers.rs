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
use crate::api::validation::validate_payload;
use crate::core::state::AppState;
use crate::db::types::UserRole;
use crate::repositories;
use crate::schemas::teacher::{TeacherCreate, TeacherResponse, TeacherUpdate};
use crate::schemas::Envelope;
use crate::services::{scope, teachers};

#[derive(Debug, Deserialize)]
struct TeacherListQuery {
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
        .route("/", get(list_teachers).post(create_teacher))
        .route("/:teacher_id", patch(update_teacher).delete(delete_teacher))
}

async fn create_teacher(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Json(payload): Json<TeacherCreate>,
) -> Result<(StatusCode, Json<Envelope<TeacherResponse>>), ApiError> {
    require_role(&user, &[UserRole::Superadmin, UserRole::Schooladmin])?;
    validate_payload(&payload)?;

    let school_id = scope::resolve_school_scope(&user, payload.school_id.clone())?;

    let teacher = teachers::create(
        state.db(),
        &school_id,
        teachers::NewTeacher {
            name: payload.name.trim(),
            mobile: payload.mobile.trim(),
            email: payload.email.trim(),
            photo_url: payload.photo_url.as_deref(),
            class_id: payload.class_id.as_deref().filter(|value| !value.trim().is_empty()),
        },
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(Envelope::with_message(
            "Teacher created successfully",
            TeacherResponse::from_db(teacher),
        )),
    ))
}

async fn list_teachers(
    Query(params): Query<TeacherListQuery>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<Envelope<Vec<TeacherResponse>>>, ApiError> {
    let school_id = scope::resolve_school_scope(&user, params.school_id)?;
    let (page, limit, offset) =
        PageQuery { page: params.page, limit: params.limit }.normalize();

    let teachers = repositories::teachers::list(
        state.db(),
        &school_id,
        params.class_id.as_deref(),
        offset,
        limit,
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to list teachers"))?;

    let total = repositories::teachers::count(state.db(), &school_id, params.class_id.as_deref())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to count teachers"))?;

    Ok(Json(Envelope::page(
        teachers.into_iter().map(TeacherResponse::from_db).collect(),
        PageInfo::new(page, limit, total),
    )))
}

async fn update_teacher(
    Path(teacher_id): Path<String>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Json(payload): Json<TeacherUpdate>,
) -> Result<Json<Envelope<TeacherResponse>>, ApiError> {
    require_role(
        &user,
        &[UserRole::Superadmin, UserRole::Schooladmin, UserRole::Teacher],
    )?;
    validate_payload(&payload)?;
    let gate = scope::tenant_gate(&user)?;

    let teacher = teachers::update(
        state.db(),
        &teacher_id,
        gate.as_deref(),
        teachers::TeacherPatch {
            name: payload.name,
            mobile: payload.mobile,
            email: payload.email,
            photo_url: payload.photo_url,
            class_id: payload.class_id.filter(|value| !value.trim().is_empty()),
            status: payload.status,
        },
    )
    .await?;

    Ok(Json(Envelope::with_message(
        "Teacher updated successfully",
        TeacherResponse::from_db(teacher),
    )))
}

async fn delete_teacher(
    Path(teacher_id): Path<String>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<Envelope<TeacherResponse>>, ApiError> {
    require_role(&user, &[UserRole::Superadmin, UserRole::Schooladmin])?;
    let gate = scope::tenant_gate(&user)?;

    let teacher = teachers::deactivate(state.db(), &teacher_id, gate.as_deref()).await?;

    Ok(Json(Envelope::with_message(
        "Teacher deactivated successfully",
        TeacherResponse::from_db(teacher),
    )))
}
