use std::collections::HashMap;

use serde::Serialize;

use crate::api::pagination::PageInfo;

pub(crate) mod auth;
pub(crate) mod bulk_import;
pub(crate) mod class;
pub(crate) mod school;
pub(crate) mod session;
pub(crate) mod student;
pub(crate) mod teacher;
pub(crate) mod template;
pub(crate) mod user;

/// Standard response envelope shared by every endpoint.
#[derive(Debug, Serialize)]
pub(crate) struct Envelope<T> {
    pub(crate) success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) pagination: Option<PageInfo>,
}

impl<T> Envelope<T> {
    pub(crate) fn data(data: T) -> Self {
        Self { success: true, message: None, data: Some(data), pagination: None }
    }

    pub(crate) fn with_message(message: impl Into<String>, data: T) -> Self {
        Self { success: true, message: Some(message.into()), data: Some(data), pagination: None }
    }

    pub(crate) fn page(data: T, pagination: PageInfo) -> Self {
        Self { success: true, message: None, data: Some(data), pagination: Some(pagination) }
    }
}

impl Envelope<()> {
    pub(crate) fn message_only(message: impl Into<String>) -> Self {
        Self { success: true, message: Some(message.into()), data: None, pagination: None }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct HealthResponse {
    pub(crate) service: String,
    pub(crate) status: String,
    pub(crate) components: HashMap<String, String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct RootResponse {
    pub(crate) message: String,
    pub(crate) version: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_skips_absent_fields() {
        let body = serde_json::to_value(Envelope::data(42)).unwrap();
        assert_eq!(body, serde_json::json!({"success": true, "data": 42}));

        let body = serde_json::to_value(Envelope::message_only("done")).unwrap();
        assert_eq!(body, serde_json::json!({"success": true, "message": "done"}));
    }
}
