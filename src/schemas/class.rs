use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::time::format_primitive;
use crate::db::models::Class;

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct ClassCreate {
    #[serde(alias = "className")]
    #[validate(length(min = 1, message = "Class name is required"))]
    pub(crate) class_name: String,
    #[serde(alias = "sessionId")]
    #[validate(length(min = 1, message = "Session ID is required"))]
    pub(crate) session_id: String,
    #[serde(default)]
    #[serde(alias = "schoolId")]
    pub(crate) school_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ClassResponse {
    pub(crate) id: String,
    pub(crate) class_name: String,
    pub(crate) school_id: String,
    pub(crate) session_id: String,
    pub(crate) frozen: bool,
    pub(crate) created_at: String,
}

impl ClassResponse {
    pub(crate) fn from_db(class: Class) -> Self {
        Self {
            id: class.id,
            class_name: class.class_name,
            school_id: class.school_id,
            session_id: class.session_id,
            frozen: class.frozen,
            created_at: format_primitive(class.created_at),
        }
    }
}
