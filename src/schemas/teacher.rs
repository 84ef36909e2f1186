use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::time::format_primitive;
use crate::db::models::Teacher;
use crate::db::types::AccountStatus;

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct TeacherCreate {
    #[validate(length(min = 1, message = "Name is required"))]
    pub(crate) name: String,
    #[validate(email(message = "Invalid email address"))]
    pub(crate) email: String,
    #[validate(length(min = 1, message = "Mobile is required"))]
    pub(crate) mobile: String,
    #[serde(default)]
    #[serde(alias = "photoUrl")]
    pub(crate) photo_url: Option<String>,
    #[serde(default)]
    #[serde(alias = "classId")]
    pub(crate) class_id: Option<String>,
    #[serde(default)]
    #[serde(alias = "schoolId")]
    pub(crate) school_id: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub(crate) struct TeacherUpdate {
    #[serde(default)]
    pub(crate) name: Option<String>,
    #[serde(default)]
    #[validate(email(message = "Invalid email address"))]
    pub(crate) email: Option<String>,
    #[serde(default)]
    pub(crate) mobile: Option<String>,
    #[serde(default)]
    #[serde(alias = "photoUrl")]
    pub(crate) photo_url: Option<String>,
    #[serde(default)]
    #[serde(alias = "classId")]
    pub(crate) class_id: Option<String>,
    #[serde(default)]
    pub(crate) status: Option<AccountStatus>,
}

#[derive(Debug, Serialize)]
pub(crate) struct TeacherResponse {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) mobile: String,
    pub(crate) email: String,
    pub(crate) photo_url: Option<String>,
    pub(crate) class_id: Option<String>,
    pub(crate) school_id: String,
    pub(crate) status: AccountStatus,
    pub(crate) created_at: String,
}

impl TeacherResponse {
    pub(crate) fn from_db(teacher: Teacher) -> Self {
        Self {
            id: teacher.id,
            name: teacher.name,
            mobile: teacher.mobile,
            email: teacher.email,
            photo_url: teacher.photo_url,
            class_id: teacher.class_id,
            school_id: teacher.school_id,
            status: teacher.status,
            created_at: format_primitive(teacher.created_at),
        }
    }
}
