use sqlx::PgPool;

use crate::db::models::Template;
use crate::db::types::TemplateKind;

const COLUMNS: &str =
    "id, school_id, kind, layout_config, data_tags, created_at, updated_at";

pub(crate) async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<Template>, sqlx::Error> {
    sqlx::query_as::<_, Template>(&format!("SELECT {COLUMNS} FROM templates WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn list(
    pool: &PgPool,
    school_id: &str,
    kind: Option<TemplateKind>,
) -> Result<Vec<Template>, sqlx::Error> {
    match kind {
        Some(kind) => {
            sqlx::query_as::<_, Template>(&format!(
                "SELECT {COLUMNS} FROM templates
                 WHERE school_id = $1 AND kind = $2
                 ORDER BY updated_at DESC"
            ))
            .bind(school_id)
            .bind(kind)
            .fetch_all(pool)
            .await
        }
        None => {
            sqlx::query_as::<_, Template>(&format!(
                "SELECT {COLUMNS} FROM templates
                 WHERE school_id = $1
                 ORDER BY updated_at DESC"
            ))
            .bind(school_id)
            .fetch_all(pool)
            .await
        }
    }
}

/// The most recently updated template of a kind is the one considered
/// current for card issuance and import column layout.
pub(crate) async fn find_latest(
    pool: &PgPool,
    school_id: &str,
    kind: TemplateKind,
) -> Result<Option<Template>, sqlx::Error> {
    sqlx::query_as::<_, Template>(&format!(
        "SELECT {COLUMNS} FROM templates
         WHERE school_id = $1 AND kind = $2
         ORDER BY updated_at DESC LIMIT 1"
    ))
    .bind(school_id)
    .bind(kind)
    .fetch_optional(pool)
    .await
}

pub(crate) struct CreateTemplate<'a> {
    pub id: &'a str,
    pub school_id: &'a str,
    pub kind: TemplateKind,
    pub layout_config: serde_json::Value,
    pub data_tags: Vec<String>,
    pub created_at: time::PrimitiveDateTime,
    pub updated_at: time::PrimitiveDateTime,
}

pub(crate) async fn create(
    pool: &PgPool,
    params: CreateTemplate<'_>,
) -> Result<Template, sqlx::Error> {
    sqlx::query_as::<_, Template>(&format!(
        "INSERT INTO templates (
            id, school_id, kind, layout_config, data_tags, created_at, updated_at
        ) VALUES ($1,$2,$3,$4,$5,$6,$7)
        RETURNING {COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.school_id)
    .bind(params.kind)
    .bind(sqlx::types::Json(params.layout_config))
    .bind(sqlx::types::Json(params.data_tags))
    .bind(params.created_at)
    .bind(params.updated_at)
    .fetch_one(pool)
    .await
}
