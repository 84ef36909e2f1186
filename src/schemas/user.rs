use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::time::format_primitive;
use crate::db::models::User;
use crate::db::types::{AccountStatus, UserRole};

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct UserCreate {
    #[validate(length(min = 1, message = "Name is required"))]
    pub(crate) name: String,
    #[validate(email(message = "Invalid email address"))]
    pub(crate) email: String,
    #[validate(length(min = 1, message = "Username is required"))]
    pub(crate) username: String,
    pub(crate) password: String,
    pub(crate) role: UserRole,
    #[serde(default)]
    #[serde(alias = "schoolId")]
    pub(crate) school_id: Option<String>,
    #[serde(default = "default_status")]
    pub(crate) status: AccountStatus,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct UserUpdate {
    #[serde(default)]
    pub(crate) name: Option<String>,
    #[serde(default)]
    #[validate(email(message = "Invalid email address"))]
    pub(crate) email: Option<String>,
    #[serde(default)]
    pub(crate) username: Option<String>,
    #[serde(default)]
    pub(crate) password: Option<String>,
    #[serde(default)]
    pub(crate) role: Option<UserRole>,
    #[serde(default)]
    #[serde(alias = "schoolId")]
    pub(crate) school_id: Option<String>,
    #[serde(default)]
    pub(crate) status: Option<AccountStatus>,
}

#[derive(Debug, Serialize)]
pub(crate) struct UserResponse {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) email: String,
    pub(crate) username: String,
    pub(crate) role: UserRole,
    pub(crate) school_id: Option<String>,
    pub(crate) school_name: Option<String>,
    pub(crate) status: AccountStatus,
    pub(crate) created_at: String,
}

impl UserResponse {
    pub(crate) fn from_db(user: User, school_name: Option<String>) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            username: user.username,
            role: user.role,
            school_id: user.school_id,
            school_name,
            status: user.status,
            created_at: format_primitive(user.created_at),
        }
    }
}

fn default_status() -> AccountStatus {
    AccountStatus::Active
}
