use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::time::{format_date, format_primitive};
use crate::db::models::Session;

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct SessionCreate {
    #[serde(alias = "sessionName")]
    #[validate(length(min = 1, message = "Session name is required"))]
    pub(crate) session_name: String,
    #[serde(alias = "startDate")]
    #[validate(length(min = 1, message = "Start date is required"))]
    pub(crate) start_date: String,
    #[serde(alias = "endDate")]
    #[validate(length(min = 1, message = "End date is required"))]
    pub(crate) end_date: String,
    #[serde(default)]
    #[serde(alias = "schoolId")]
    pub(crate) school_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct SessionResponse {
    pub(crate) id: String,
    pub(crate) session_name: String,
    pub(crate) start_date: String,
    pub(crate) end_date: String,
    pub(crate) school_id: String,
    pub(crate) active_status: bool,
    pub(crate) created_at: String,
}

impl SessionResponse {
    pub(crate) fn from_db(session: Session) -> Self {
        Self {
            id: session.id,
            session_name: session.session_name,
            start_date: format_date(session.start_date),
            end_date: format_date(session.end_date),
            school_id: session.school_id,
            active_status: session.active_status,
            created_at: format_primitive(session.created_at),
        }
    }
}
