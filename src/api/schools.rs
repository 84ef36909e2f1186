use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use crate::api::errors::ApiError;
use crate::api::guards::CurrentSuperadmin;
use crate::api::pagination::{PageInfo, PageQuery};
use crate::api::validation::validate_payload;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::repositories;
use crate::schemas::school::{
    AllowedLoginResponse, AllowedLoginUpdate, SchoolCreate, SchoolResponse, SchoolUpdate,
};
use crate::schemas::Envelope;
use crate::services::schools;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_schools).post(create_school))
        .route(
            "/:school_id",
            get(get_school).patch(update_school).delete(delete_school),
        )
        .route(
            "/:school_id/allowed-logins",
            get(get_allowed_logins).patch(update_allowed_logins),
        )
}

async fn create_school(
    CurrentSuperadmin(admin): CurrentSuperadmin,
    State(state): State<AppState>,
    Json(payload): Json<SchoolCreate>,
) -> Result<(StatusCode, Json<Envelope<SchoolResponse>>), ApiError> {
    validate_payload(&payload)?;

    let school = schools::create(
        state.db(),
        schools::NewSchool {
            name: payload.name.trim(),
            address: payload.address.trim(),
            contact_email: payload.contact_email.trim(),
            status: payload.status,
        },
    )
    .await?;

    tracing::info!(
        admin_id = %admin.id,
        school_id = %school.id,
        action = "school_create",
        "Superadmin created school"
    );

    Ok((
        StatusCode::CREATED,
        Json(Envelope::with_message("School created successfully", SchoolResponse::from_db(school))),
    ))
}

async fn list_schools(
    Query(params): Query<PageQuery>,
    CurrentSuperadmin(_admin): CurrentSuperadmin,
    State(state): State<AppState>,
) -> Result<Json<Envelope<Vec<SchoolResponse>>>, ApiError> {
    let (page, limit, offset) = params.normalize();

    let schools = repositories::schools::list(state.db(), offset, limit)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list schools"))?;
    let total = repositories::schools::count(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to count schools"))?;

    Ok(Json(Envelope::page(
        schools.into_iter().map(SchoolResponse::from_db).collect(),
        PageInfo::new(page, limit, total),
    )))
}

async fn get_school(
    Path(school_id): Path<String>,
    CurrentSuperadmin(_admin): CurrentSuperadmin,
    State(state): State<AppState>,
) -> Result<Json<Envelope<SchoolResponse>>, ApiError> {
    let school = repositories::schools::find_by_id(state.db(), &school_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch school"))?
        .ok_or_else(|| ApiError::NotFound("School not found".to_string()))?;

    Ok(Json(Envelope::data(SchoolResponse::from_db(school))))
}

async fn update_school(
    Path(school_id): Path<String>,
    CurrentSuperadmin(_admin): CurrentSuperadmin,
    State(state): State<AppState>,
    Json(payload): Json<SchoolUpdate>,
) -> Result<Json<Envelope<SchoolResponse>>, ApiError> {
    validate_payload(&payload)?;

    let existing = repositories::schools::find_by_id(state.db(), &school_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch school"))?;
    if existing.is_none() {
        return Err(ApiError::NotFound("School not found".to_string()));
    }

    repositories::schools::update(
        state.db(),
        &school_id,
        repositories::schools::UpdateSchool {
            name: payload.name,
            address: payload.address,
            contact_email: payload.contact_email,
            status: payload.status,
            updated_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to update school"))?;

    let updated = repositories::schools::fetch_one_by_id(state.db(), &school_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch updated school"))?;

    Ok(Json(Envelope::with_message(
        "School updated successfully",
        SchoolResponse::from_db(updated),
    )))
}

async fn delete_school(
    Path(school_id): Path<String>,
    CurrentSuperadmin(admin): CurrentSuperadmin,
    State(state): State<AppState>,
) -> Result<Json<Envelope<()>>, ApiError> {
    let deleted = repositories::schools::delete(state.db(), &school_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete school"))?;
    if !deleted {
        return Err(ApiError::NotFound("School not found".to_string()));
    }

    tracing::info!(
        admin_id = %admin.id,
        school_id = %school_id,
        action = "school_delete",
        "Superadmin deleted school"
    );

    Ok(Json(Envelope::message_only("School deleted successfully")))
}

async fn get_allowed_logins(
    Path(school_id): Path<String>,
    CurrentSuperadmin(_admin): CurrentSuperadmin,
    State(state): State<AppState>,
) -> Result<Json<Envelope<AllowedLoginResponse>>, ApiError> {
    let allowed = repositories::allowed_logins::find_by_school(state.db(), &school_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch allowed-login record"))?
        .ok_or_else(|| ApiError::NotFound("Allowed-login record not found".to_string()))?;

    Ok(Json(Envelope::data(AllowedLoginResponse::from_db(allowed))))
}

async fn update_allowed_logins(
    Path(school_id): Path<String>,
    CurrentSuperadmin(_admin): CurrentSuperadmin,
    State(state): State<AppState>,
    Json(payload): Json<AllowedLoginUpdate>,
) -> Result<Json<Envelope<AllowedLoginResponse>>, ApiError> {
    let existing = repositories::allowed_logins::find_by_school(state.db(), &school_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch allowed-login record"))?;
    if existing.is_none() {
        return Err(ApiError::NotFound("Allowed-login record not found".to_string()));
    }

    repositories::allowed_logins::update(
        state.db(),
        &school_id,
        payload.allow_school_admin,
        payload.allow_teacher,
        primitive_now_utc(),
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to update allowed-login record"))?;

    let updated = repositories::allowed_logins::find_by_school(state.db(), &school_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch updated allowed-login record"))?
        .ok_or_else(|| {
            ApiError::Internal("Allowed-login record missing after update".to_string())
        })?;

    Ok(Json(Envelope::with_message(
        "Login gates updated successfully",
        AllowedLoginResponse::from_db(updated),
    )))
}

#[cfg(test)]
mod tests;
