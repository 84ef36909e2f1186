use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use time::{Date, PrimitiveDateTime};

use crate::db::types::{AccountStatus, SchoolStatus, TemplateKind, UserRole};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct School {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) address: String,
    pub(crate) contact_email: String,
    pub(crate) status: SchoolStatus,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct AllowedLogin {
    pub(crate) id: String,
    pub(crate) school_id: String,
    pub(crate) allow_school_admin: bool,
    pub(crate) allow_teacher: bool,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct User {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) email: String,
    pub(crate) username: String,
    pub(crate) password_hash: String,
    pub(crate) role: UserRole,
    pub(crate) school_id: Option<String>,
    pub(crate) status: AccountStatus,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

/// Academic year of one school. At most one session per school is active at
/// a time; the activation path is the only writer that flips the flag on.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Session {
    pub(crate) id: String,
    pub(crate) session_name: String,
    pub(crate) start_date: Date,
    pub(crate) end_date: Date,
    pub(crate) school_id: String,
    pub(crate) active_status: bool,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

/// A frozen class is locked for ID-card issuance: every student mutation
/// underneath it is rejected until it is unfrozen again.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Class {
    pub(crate) id: String,
    pub(crate) class_name: String,
    pub(crate) school_id: String,
    pub(crate) session_id: String,
    pub(crate) frozen: bool,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

/// school_id and session_id are always copied from the referenced class at
/// creation time, never taken from caller input.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Student {
    pub(crate) id: String,
    pub(crate) admission_no: String,
    pub(crate) name: String,
    pub(crate) dob: Date,
    pub(crate) father_name: String,
    pub(crate) mother_name: String,
    pub(crate) mobile: String,
    pub(crate) address: String,
    pub(crate) aadhaar: Option<String>,
    pub(crate) photo_url: Option<String>,
    pub(crate) class_id: String,
    pub(crate) session_id: String,
    pub(crate) school_id: String,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Teacher {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) mobile: String,
    pub(crate) email: String,
    pub(crate) photo_url: Option<String>,
    pub(crate) class_id: Option<String>,
    pub(crate) school_id: String,
    pub(crate) status: AccountStatus,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Template {
    pub(crate) id: String,
    pub(crate) school_id: String,
    pub(crate) kind: TemplateKind,
    pub(crate) layout_config: Json<serde_json::Value>,
    pub(crate) data_tags: Json<Vec<String>>,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}
