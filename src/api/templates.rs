use axum::{
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::api::errors::ApiError;
use crate::api::guards::CurrentUser;
use crate::core::state::AppState;
use crate::db::models::Template;
use crate::db::types::{TemplateKind, UserRole};
use crate::repositories;
use crate::schemas::template::TemplateResponse;
use crate::schemas::Envelope;
use crate::services::{excel, scope};

#[derive(Debug, Deserialize)]
struct TemplateListQuery {
    #[serde(default)]
    #[serde(alias = "schoolId")]
    school_id: Option<String>,
    #[serde(default)]
    kind: Option<String>,
}

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_templates))
        .route("/active/:kind", get(get_active_template))
        .route("/:template_id", get(get_template))
        .route("/:template_id/download-excel", get(download_schema))
}

async fn list_templates(
    Query(params): Query<TemplateListQuery>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<Envelope<Vec<TemplateResponse>>>, ApiError> {
    let school_id = scope::resolve_school_scope(&user, params.school_id)?;
    let kind = parse_kind_filter(params.kind.as_deref())?;

    let templates = repositories::templates::list(state.db(), &school_id, kind)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list templates"))?;

    Ok(Json(Envelope::data(
        templates.into_iter().map(TemplateResponse::from_db).collect(),
    )))
}

async fn get_active_template(
    Path(kind): Path<String>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<Envelope<TemplateResponse>>, ApiError> {
    let kind = TemplateKind::parse(&kind).ok_or_else(|| {
        ApiError::Validation("Invalid template type. Must be student, teacher, or admin".to_string())
    })?;
    let school_id = scope::resolve_school_scope(&user, None)?;

    let template = repositories::templates::find_latest(state.db(), &school_id, kind)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch template"))?
        .ok_or_else(|| ApiError::NotFound("Template not found".to_string()))?;

    Ok(Json(Envelope::data(TemplateResponse::from_db(template))))
}

async fn get_template(
    Path(template_id): Path<String>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<Envelope<TemplateResponse>>, ApiError> {
    let template = fetch_scoped(&state, user.role, user.school_id.as_deref(), &template_id).await?;
    Ok(Json(Envelope::data(TemplateResponse::from_db(template))))
}

/// Ships the template's column schema as a CSV attachment; any spreadsheet
/// tool opens it for filling out before a bulk import.
async fn download_schema(
    Path(template_id): Path<String>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let template = fetch_scoped(&state, user.role, user.school_id.as_deref(), &template_id).await?;

    let body = excel::column_schema_csv(&template.data_tags.0);
    let filename = format!("{}-template.csv", template.kind.as_str());

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, format!("attachment; filename=\"{filename}\"")),
        ],
        body,
    ))
}

async fn fetch_scoped(
    state: &AppState,
    role: UserRole,
    user_school: Option<&str>,
    template_id: &str,
) -> Result<Template, ApiError> {
    let template = repositories::templates::find_by_id(state.db(), template_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch template"))?
        .ok_or_else(|| ApiError::NotFound("Template not found".to_string()))?;

    if role != UserRole::Superadmin && user_school != Some(template.school_id.as_str()) {
        return Err(ApiError::Forbidden("Template does not belong to your school".to_string()));
    }

    Ok(template)
}

fn parse_kind_filter(value: Option<&str>) -> Result<Option<TemplateKind>, ApiError> {
    match value {
        None => Ok(None),
        Some(raw) => TemplateKind::parse(raw).map(Some).ok_or_else(|| {
            ApiError::Validation(
                "Invalid template type. Must be student, teacher, or admin".to_string(),
            )
        }),
    }
}

#[cfg(test)]
mod tests;
