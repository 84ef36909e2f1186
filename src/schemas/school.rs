use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::time::format_primitive;
use crate::db::models::{AllowedLogin, School};
use crate::db::types::SchoolStatus;

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct SchoolCreate {
    #[validate(length(min = 1, message = "School name is required"))]
    pub(crate) name: String,
    #[validate(length(min = 1, message = "Address is required"))]
    pub(crate) address: String,
    #[serde(alias = "contactEmail")]
    #[validate(email(message = "Invalid contact email"))]
    pub(crate) contact_email: String,
    #[serde(default = "default_status")]
    pub(crate) status: SchoolStatus,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct SchoolUpdate {
    #[serde(default)]
    pub(crate) name: Option<String>,
    #[serde(default)]
    pub(crate) address: Option<String>,
    #[serde(default)]
    #[serde(alias = "contactEmail")]
    #[validate(email(message = "Invalid contact email"))]
    pub(crate) contact_email: Option<String>,
    #[serde(default)]
    pub(crate) status: Option<SchoolStatus>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AllowedLoginUpdate {
    #[serde(default)]
    #[serde(alias = "allowSchoolAdmin")]
    pub(crate) allow_school_admin: Option<bool>,
    #[serde(default)]
    #[serde(alias = "allowTeacher")]
    pub(crate) allow_teacher: Option<bool>,
}

#[derive(Debug, Serialize)]
pub(crate) struct SchoolResponse {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) address: String,
    pub(crate) contact_email: String,
    pub(crate) status: SchoolStatus,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
}

impl SchoolResponse {
    pub(crate) fn from_db(school: School) -> Self {
        Self {
            id: school.id,
            name: school.name,
            address: school.address,
            contact_email: school.contact_email,
            status: school.status,
            created_at: format_primitive(school.created_at),
            updated_at: format_primitive(school.updated_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct AllowedLoginResponse {
    pub(crate) id: String,
    pub(crate) school_id: String,
    pub(crate) allow_school_admin: bool,
    pub(crate) allow_teacher: bool,
    pub(crate) updated_at: String,
}

impl AllowedLoginResponse {
    pub(crate) fn from_db(allowed: AllowedLogin) -> Self {
        Self {
            id: allowed.id,
            school_id: allowed.school_id,
            allow_school_admin: allowed.allow_school_admin,
            allow_teacher: allowed.allow_teacher,
            updated_at: format_primitive(allowed.updated_at),
        }
    }
}

fn default_status() -> SchoolStatus {
    SchoolStatus::Active
}
