use serde::Serialize;

use crate::core::time::format_primitive;
use crate::db::models::Template;
use crate::db::types::TemplateKind;

#[derive(Debug, Serialize)]
pub(crate) struct TemplateResponse {
    pub(crate) id: String,
    pub(crate) school_id: String,
    pub(crate) kind: TemplateKind,
    pub(crate) layout_config: serde_json::Value,
    pub(crate) data_tags: Vec<String>,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
}

impl TemplateResponse {
    pub(crate) fn from_db(template: Template) -> Self {
        Self {
            id: template.id,
            school_id: template.school_id,
            kind: template.kind,
            layout_config: template.layout_config.0,
            data_tags: template.data_tags.0,
            created_at: format_primitive(template.created_at),
            updated_at: format_primitive(template.updated_at),
        }
    }
}
