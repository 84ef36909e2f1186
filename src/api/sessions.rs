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
use crate::schemas::session::{SessionCreate, SessionResponse};
use crate::schemas::Envelope;
use crate::services::{scope, sessions};

#[derive(Debug, Deserialize)]
struct SessionListQuery {
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
        .route("/", get(list_sessions).post(create_session))
        .route("/:session_id/activate", patch(activate_session))
        .route("/:session_id/deactivate", patch(deactivate_session))
}

async fn create_session(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Json(payload): Json<SessionCreate>,
) -> Result<(StatusCode, Json<Envelope<SessionResponse>>), ApiError> {
    require_role(&user, &[UserRole::Superadmin, UserRole::Schooladmin])?;
    validate_payload(&payload)?;

    let start_date = parse_date_field(&payload.start_date, "start date")?;
    let end_date = parse_date_field(&payload.end_date, "end date")?;
    let school_id = scope::resolve_school_scope(&user, payload.school_id.clone())?;

    let session = sessions::create(
        state.db(),
        sessions::NewSession {
            school_id: &school_id,
            session_name: payload.session_name.trim(),
            start_date,
            end_date,
        },
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(Envelope::with_message(
            "Session created successfully",
            SessionResponse::from_db(session),
        )),
    ))
}

async fn list_sessions(
    Query(params): Query<SessionListQuery>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<Envelope<Vec<SessionResponse>>>, ApiError> {
    let school_id = scope::resolve_school_scope(&user, params.school_id)?;
    let (page, limit, offset) =
        PageQuery { page: params.page, limit: params.limit }.normalize();

    let sessions = repositories::sessions::list(
        state.db(),
        &school_id,
        params.session_id.as_deref(),
        offset,
        limit,
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to list sessions"))?;

    let total = repositories::sessions::count(state.db(), &school_id, params.session_id.as_deref())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to count sessions"))?;

    Ok(Json(Envelope::page(
        sessions.into_iter().map(SessionResponse::from_db).collect(),
        PageInfo::new(page, limit, total),
    )))
}

async fn activate_session(
    Path(session_id): Path<String>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<Envelope<SessionResponse>>, ApiError> {
    require_role(&user, &[UserRole::Superadmin, UserRole::Schooladmin])?;
    let gate = scope::tenant_gate(&user)?;

    let session = sessions::activate(state.db(), &session_id, gate.as_deref()).await?;

    Ok(Json(Envelope::with_message(
        "Session activated successfully",
        SessionResponse::from_db(session),
    )))
}

async fn deactivate_session(
    Path(session_id): Path<String>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<Envelope<SessionResponse>>, ApiError> {
    require_role(&user, &[UserRole::Superadmin, UserRole::Schooladmin])?;
    let gate = scope::tenant_gate(&user)?;

    let session = sessions::deactivate(state.db(), &session_id, gate.as_deref()).await?;

    Ok(Json(Envelope::with_message(
        "Session deactivated successfully",
        SessionResponse::from_db(session),
    )))
}

#[cfg(test)]
mod tests;
