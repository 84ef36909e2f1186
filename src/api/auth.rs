use axum::{
    extract::State,
    http::HeaderMap,
    routing::{get, post},
    Json, Router,
};
use rand::{distributions::Alphanumeric, Rng};
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::guards::CurrentUser;
use crate::core::security;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::db::models::User;
use crate::db::types::{AccountStatus, SchoolStatus, UserRole};
use crate::repositories;
use crate::schemas::auth::{GoogleLoginRequest, LoginRequest, LoginResponse};
use crate::schemas::user::UserResponse;
use crate::schemas::Envelope;
use crate::services::google_oauth::{self, GoogleAuthError};
use crate::services::{schools, users};

// Wrong password, unknown email and gated roles all produce this exact
// response so a caller cannot probe which one applied.
const INVALID_CREDENTIALS: &str = "Invalid credentials";

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/google", post(google))
        .route("/me", get(me))
}

async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<Envelope<LoginResponse>>, ApiError> {
    let email = payload.email.trim().to_lowercase();
    if email.is_empty() || payload.password.is_empty() {
        return Err(ApiError::Validation("Please provide email and password".to_string()));
    }

    let user = repositories::users::find_by_email(state.db(), &email)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load user"))?
        .ok_or(ApiError::Unauthenticated(INVALID_CREDENTIALS))?;

    if user.status != AccountStatus::Active {
        return Err(ApiError::Unauthenticated("Account is inactive"));
    }

    ensure_login_allowed(&state, &user).await?;

    let verified = security::verify_password(&payload.password, &user.password_hash)
        .map_err(|_| ApiError::Unauthenticated(INVALID_CREDENTIALS))?;
    if !verified {
        return Err(ApiError::Unauthenticated(INVALID_CREDENTIALS));
    }

    issue_credential(&state, user, &headers).await
}

async fn google(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<GoogleLoginRequest>,
) -> Result<Json<Envelope<LoginResponse>>, ApiError> {
    let id_token = payload.id_token.trim();
    if id_token.is_empty() {
        return Err(ApiError::Validation("Google ID token is required".to_string()));
    }

    let Some(client_id) = state.settings().google().client_id.clone() else {
        return Err(ApiError::Internal("Google sign-in is not configured".to_string()));
    };

    let info =
        google_oauth::verify_id_token(&client_id, id_token).await.map_err(|err| match err {
            GoogleAuthError::Request(err) => {
                ApiError::internal(err, "Failed to verify Google token")
            }
            GoogleAuthError::Rejected | GoogleAuthError::AudienceMismatch => {
                ApiError::Unauthenticated("Invalid Google token")
            }
        })?;

    let email = info
        .email
        .as_deref()
        .map(|value| value.trim().to_lowercase())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| ApiError::Validation("Email not found in Google token".to_string()))?;

    let user = repositories::users::find_by_email(state.db(), &email)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load user"))?;

    let user = match user {
        Some(user) => user,
        None => provision_federated_user(&state, &email, info.name.as_deref()).await?,
    };

    if user.status != AccountStatus::Active {
        return Err(ApiError::Unauthenticated("Account is inactive"));
    }

    ensure_login_allowed(&state, &user).await?;

    issue_credential(&state, user, &headers).await
}

async fn me(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Envelope<UserResponse>>, ApiError> {
    let school_name = school_name(&state, &user).await;
    Ok(Json(Envelope::data(UserResponse::from_db(user, school_name))))
}

async fn issue_credential(
    state: &AppState,
    user: User,
    headers: &HeaderMap,
) -> Result<Json<Envelope<LoginResponse>>, ApiError> {
    let token = security::create_access_token(&user, state.settings(), None)
        .map_err(|e| ApiError::internal(e, "Failed to create access token"))?;

    record_login(state, &user, &client_ip(headers)).await;

    let school_name = school_name(state, &user).await;
    Ok(Json(Envelope::data(LoginResponse {
        token,
        user: UserResponse::from_db(user, school_name),
    })))
}

/// Per-school login gates. Superadmins are exempt; everyone else needs the
/// AllowedLogin row for their school with the role's flag set.
async fn ensure_login_allowed(state: &AppState, user: &User) -> Result<(), ApiError> {
    if user.role == UserRole::Superadmin {
        return Ok(());
    }

    let Some(school_id) = user.school_id.as_deref() else {
        return Err(ApiError::Unauthenticated(INVALID_CREDENTIALS));
    };

    let allowed = repositories::allowed_logins::find_by_school(state.db(), school_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load login gates"))?;

    let Some(allowed) = allowed else {
        return Err(ApiError::Unauthenticated(INVALID_CREDENTIALS));
    };

    let permitted = match user.role {
        UserRole::Schooladmin => allowed.allow_school_admin,
        UserRole::Teacher => allowed.allow_teacher,
        UserRole::Superadmin => true,
    };

    if permitted {
        Ok(())
    } else {
        Err(ApiError::Unauthenticated(INVALID_CREDENTIALS))
    }
}

/// First federated sign-in: the account is created as a teacher of the first
/// active school (a default school is provisioned when none exists) with a
/// random password that can never be typed.
async fn provision_federated_user(
    state: &AppState,
    email: &str,
    name: Option<&str>,
) -> Result<User, ApiError> {
    let school = repositories::schools::find_first_active(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to look up active school"))?;

    let school = match school {
        Some(school) => school,
        None => {
            schools::create(
                state.db(),
                schools::NewSchool {
                    name: "Default School",
                    address: "Address not provided",
                    contact_email: email,
                    status: SchoolStatus::Active,
                },
            )
            .await?
        }
    };

    let password: String =
        rand::thread_rng().sample_iter(&Alphanumeric).take(24).map(char::from).collect();
    let local_part = email.split('@').next().unwrap_or("teacher");
    let suffix = Uuid::new_v4().simple().to_string();
    let username = format!("{local_part}_{}", &suffix[..6]);

    let user = users::create(
        state.db(),
        users::NewUser {
            name: name.filter(|value| !value.trim().is_empty()).unwrap_or(local_part),
            email,
            username: &username,
            password: &password,
            role: UserRole::Teacher,
            school_id: Some(&school.id),
            status: AccountStatus::Active,
        },
    )
    .await?;

    tracing::info!(username = %user.username, "Created user from Google sign-in");
    Ok(user)
}

// Audit-trail write failures never block authentication.
async fn record_login(state: &AppState, user: &User, ip_address: &str) {
    let result = repositories::login_logs::insert(
        state.db(),
        repositories::login_logs::CreateLoginLog {
            id: &Uuid::new_v4().to_string(),
            username: &user.username,
            role: user.role,
            school_id: user.school_id.as_deref(),
            ip_address,
            logged_at: primitive_now_utc(),
        },
    )
    .await;

    if let Err(err) = result {
        tracing::warn!(error = %err, username = %user.username, "Failed to write login log");
    }
}

async fn school_name(state: &AppState, user: &User) -> Option<String> {
    match user.school_id.as_deref() {
        Some(school_id) => {
            repositories::schools::find_name_by_id(state.db(), school_id).await.ok().flatten()
        }
        None => None,
    }
}

fn client_ip(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .or_else(|| {
            headers
                .get("x-real-ip")
                .and_then(|value| value.to_str().ok())
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        })
        .unwrap_or_else(|| "127.0.0.1".to_string())
}


#[cfg(test)]
mod tests;
