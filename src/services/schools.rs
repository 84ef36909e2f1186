use sqlx::PgPool;
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::core::time::primitive_now_utc;
use crate::db::models::School;
use crate::db::types::{SchoolStatus, TemplateKind};
use crate::repositories;

pub(crate) struct NewSchool<'a> {
    pub name: &'a str,
    pub address: &'a str,
    pub contact_email: &'a str,
    pub status: SchoolStatus,
}

/// Creating a school also provisions its login gates (both roles allowed)
/// and one default card template per entity kind, so bulk import and card
/// issuance work out of the box for a fresh tenant.
pub(crate) async fn create(pool: &PgPool, params: NewSchool<'_>) -> Result<School, ApiError> {
    let now = primitive_now_utc();
    let school = repositories::schools::create(
        pool,
        repositories::schools::CreateSchool {
            id: &Uuid::new_v4().to_string(),
            name: params.name,
            address: params.address,
            contact_email: params.contact_email,
            status: params.status,
            created_at: now,
            updated_at: now,
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create school"))?;

    repositories::allowed_logins::create(
        pool,
        repositories::allowed_logins::CreateAllowedLogin {
            id: &Uuid::new_v4().to_string(),
            school_id: &school.id,
            allow_school_admin: true,
            allow_teacher: true,
            created_at: now,
            updated_at: now,
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create allowed-login record"))?;

    for kind in [TemplateKind::Student, TemplateKind::Teacher, TemplateKind::Admin] {
        repositories::templates::create(
            pool,
            repositories::templates::CreateTemplate {
                id: &Uuid::new_v4().to_string(),
                school_id: &school.id,
                kind,
                layout_config: default_layout_config(),
                data_tags: default_data_tags(kind),
                created_at: now,
                updated_at: now,
            },
        )
        .await
        .map_err(|e| ApiError::internal(e, "Failed to create default template"))?;
    }

    Ok(school)
}

// CR80 card at 300 dpi, landscape.
fn default_layout_config() -> serde_json::Value {
    serde_json::json!({
        "orientation": "landscape",
        "width": 1011,
        "height": 638,
        "background": "#ffffff"
    })
}

fn default_data_tags(kind: TemplateKind) -> Vec<String> {
    let tags: &[&str] = match kind {
        TemplateKind::Student => &[
            "name",
            "admissionNo",
            "classId",
            "dob",
            "fatherName",
            "motherName",
            "mobile",
            "address",
            "aadhaar",
            "photoUrl",
        ],
        TemplateKind::Teacher => &["name", "email", "mobile", "classId", "photoUrl"],
        TemplateKind::Admin => &["name", "email", "username", "password"],
    };
    tags.iter().map(|tag| tag.to_string()).collect()
}
