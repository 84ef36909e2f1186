use uuid::Uuid;

use crate::core::security;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::db::types::{AccountStatus, UserRole};
use crate::repositories;

/// Creates or repairs the initial superadmin account from
/// FIRST_SUPERADMIN_EMAIL / FIRST_SUPERADMIN_PASSWORD.
pub(crate) async fn ensure_superadmin(state: &AppState) -> anyhow::Result<()> {
    let admin = state.settings().admin();
    if admin.first_superadmin_email.is_empty() || admin.first_superadmin_password.is_empty() {
        tracing::warn!("FIRST_SUPERADMIN_EMAIL/PASSWORD not configured; skipping superadmin bootstrap");
        return Ok(());
    }

    let email = admin.first_superadmin_email.to_lowercase();
    let user = repositories::users::find_by_email(state.db(), &email).await?;
    let now = primitive_now_utc();

    if let Some(user) = user {
        let verified =
            security::verify_password(&admin.first_superadmin_password, &user.password_hash)
                .unwrap_or(false);
        let needs_update =
            !verified || user.role != UserRole::Superadmin || user.status != AccountStatus::Active;

        if needs_update {
            let password_hash = if verified {
                None
            } else {
                Some(security::hash_password(&admin.first_superadmin_password)?)
            };

            repositories::users::update(
                state.db(),
                &user.id,
                repositories::users::UpdateUser {
                    name: None,
                    email: None,
                    username: None,
                    password_hash,
                    role: Some(UserRole::Superadmin),
                    school_id: None,
                    status: Some(AccountStatus::Active),
                    updated_at: now,
                },
            )
            .await?;
            tracing::info!("Updated default superadmin {email}");
        } else {
            tracing::info!("Default superadmin already up to date");
        }

        return Ok(());
    }

    let password_hash = security::hash_password(&admin.first_superadmin_password)?;
    let username = email.split('@').next().unwrap_or("superadmin").to_string();

    repositories::users::create(
        state.db(),
        repositories::users::CreateUser {
            id: &Uuid::new_v4().to_string(),
            name: "Super Admin",
            email: &email,
            username: &username,
            password_hash,
            role: UserRole::Superadmin,
            school_id: None,
            status: AccountStatus::Active,
            created_at: now,
            updated_at: now,
        },
    )
    .await?;

    tracing::info!("Created default superadmin {email}");
    Ok(())
}
