use sqlx::PgPool;

use crate::db::models::Class;

const COLUMNS: &str =
    "id, class_name, school_id, session_id, frozen, created_at, updated_at";

pub(crate) async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<Class>, sqlx::Error> {
    sqlx::query_as::<_, Class>(&format!("SELECT {COLUMNS} FROM classes WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn exists_by_name(
    pool: &PgPool,
    school_id: &str,
    session_id: &str,
    class_name: &str,
) -> Result<Option<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>(
        "SELECT id FROM classes
         WHERE school_id = $1 AND session_id = $2 AND class_name = $3",
    )
    .bind(school_id)
    .bind(session_id)
    .bind(class_name)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn list(
    pool: &PgPool,
    school_id: &str,
    session_id: Option<&str>,
    offset: i64,
    limit: i64,
) -> Result<Vec<Class>, sqlx::Error> {
    match session_id {
        Some(session_id) => {
            sqlx::query_as::<_, Class>(&format!(
                "SELECT {COLUMNS} FROM classes
                 WHERE school_id = $1 AND session_id = $2
                 ORDER BY class_name OFFSET $3 LIMIT $4"
            ))
            .bind(school_id)
            .bind(session_id)
            .bind(offset)
            .bind(limit)
            .fetch_all(pool)
            .await
        }
        None => {
            sqlx::query_as::<_, Class>(&format!(
                "SELECT {COLUMNS} FROM classes
                 WHERE school_id = $1
                 ORDER BY class_name OFFSET $2 LIMIT $3"
            ))
            .bind(school_id)
            .bind(offset)
            .bind(limit)
            .fetch_all(pool)
            .await
        }
    }
}

pub(crate) async fn count(
    pool: &PgPool,
    school_id: &str,
    session_id: Option<&str>,
) -> Result<i64, sqlx::Error> {
    match session_id {
        Some(session_id) => {
            sqlx::query_scalar::<_, i64>(
                "SELECT COUNT(*) FROM classes WHERE school_id = $1 AND session_id = $2",
            )
            .bind(school_id)
            .bind(session_id)
            .fetch_one(pool)
            .await
        }
        None => {
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM classes WHERE school_id = $1")
                .bind(school_id)
                .fetch_one(pool)
                .await
        }
    }
}

pub(crate) struct CreateClass<'a> {
    pub id: &'a str,
    pub class_name: &'a str,
    pub school_id: &'a str,
    pub session_id: &'a str,
    pub created_at: time::PrimitiveDateTime,
    pub updated_at: time::PrimitiveDateTime,
}

pub(crate) async fn create(pool: &PgPool, params: CreateClass<'_>) -> Result<Class, sqlx::Error> {
    sqlx::query_as::<_, Class>(&format!(
        "INSERT INTO classes (
            id, class_name, school_id, session_id, frozen, created_at, updated_at
        ) VALUES ($1,$2,$3,$4,FALSE,$5,$6)
        RETURNING {COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.class_name)
    .bind(params.school_id)
    .bind(params.session_id)
    .bind(params.created_at)
    .bind(params.updated_at)
    .fetch_one(pool)
    .await
}

pub(crate) async fn set_frozen(
    pool: &PgPool,
    id: &str,
    frozen: bool,
    now: time::PrimitiveDateTime,
) -> Result<Class, sqlx::Error> {
    sqlx::query_as::<_, Class>(&format!(
        "UPDATE classes SET frozen = $2, updated_at = $3 WHERE id = $1 RETURNING {COLUMNS}",
    ))
    .bind(id)
    .bind(frozen)
    .bind(now)
    .fetch_one(pool)
    .await
}
