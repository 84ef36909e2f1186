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
use crate::schemas::class::{ClassCreate, ClassResponse};
use crate::schemas::Envelope;
use crate::services::{classes, scope};

#[derive(Debug, Deserialize)]
struct ClassListQuery {
    #[serde(default)]
    #[serde(alias = "schoolId")]
    school_id: Option<String>,
    #[serde(default)]
    #[serde(alias = "sessionId")]
    session_id: Option<String>,
    #[serde(default = "default_page")]
    page: i64,
    #[serde(default = "default_limit")]
    limit: i64,
}

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_classes).post(create_class))
        .route("/:class_id/freeze", patch(freeze_class))
        .route("/:class_id/unfreeze", patch(unfreeze_class))
}

async fn create_class(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Json(payload): Json<ClassCreate>,
) -> Result<(StatusCode, Json<Envelope<ClassResponse>>), ApiError> {
    require_role(&user, &[UserRole::Superadmin, UserRole::Schooladmin])?;
    validate_payload(&payload)?;

    let school_id = scope::resolve_school_scope(&user, payload.school_id.clone())?;

    let class = classes::create(
        state.db(),
        classes::NewClass {
            school_id: &school_id,
            session_id: payload.session_id.trim(),
            class_name: payload.class_name.trim(),
        },
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(Envelope::with_message("Class created successfully", ClassResponse::from_db(class))),
    ))
}

async fn list_classes(
    Query(params): Query<ClassListQuery>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<Envelope<Vec<ClassResponse>>>, ApiError> {
    let school_id = scope::resolve_school_scope(&user, params.school_id)?;
    let (page, limit, offset) =
        PageQuery { page: params.page, limit: params.limit }.normalize();

    let classes = repositories::classes::list(
        state.db(),
        &school_id,
        params.session_id.as_deref(),
        offset,
        limit,
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to list classes"))?;

    let total = repositories::classes::count(state.db(), &school_id, params.session_id.as_deref())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to count classes"))?;

    Ok(Json(Envelope::page(
        classes.into_iter().map(ClassResponse::from_db).collect(),
        PageInfo::new(page, limit, total),
    )))
}

async fn freeze_class(
    Path(class_id): Path<String>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<Envelope<ClassResponse>>, ApiError> {
    require_role(&user, &[UserRole::Superadmin, UserRole::Schooladmin])?;
    let gate = scope::tenant_gate(&user)?;

    let class = classes::freeze(state.db(), &class_id, gate.as_deref()).await?;

    Ok(Json(Envelope::with_message("Class frozen successfully", ClassResponse::from_db(class))))
}

async fn unfreeze_class(
    Path(class_id): Path<String>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<Envelope<ClassResponse>>, ApiError> {
    require_role(&user, &[UserRole::Superadmin, UserRole::Schooladmin])?;
    let gate = scope::tenant_gate(&user)?;

    let class = classes::unfreeze(state.db(), &class_id, gate.as_deref()).await?;

    Ok(Json(Envelope::with_message("Class unfrozen successfully", ClassResponse::from_db(class))))
}

#[cfg(test)]
mod tests;
