use sqlx::PgPool;
use time::Date;

use crate::db::models::Session;

const COLUMNS: &str = "\
    id, session_name, start_date, end_date, school_id, active_status, \
    created_at, updated_at";

pub(crate) async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<Session>, sqlx::Error> {
    sqlx::query_as::<_, Session>(&format!("SELECT {COLUMNS} FROM sessions WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn exists_by_name(
    pool: &PgPool,
    school_id: &str,
    session_name: &str,
) -> Result<Option<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>(
        "SELECT id FROM sessions WHERE school_id = $1 AND session_name = $2",
    )
    .bind(school_id)
    .bind(session_name)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn list(
    pool: &PgPool,
    school_id: &str,
    session_id: Option<&str>,
    offset: i64,
    limit: i64,
) -> Result<Vec<Session>, sqlx::Error> {
    match session_id {
        Some(session_id) => {
            sqlx::query_as::<_, Session>(&format!(
                "SELECT {COLUMNS} FROM sessions
                 WHERE school_id = $1 AND id = $2
                 ORDER BY start_date DESC OFFSET $3 LIMIT $4"
            ))
            .bind(school_id)
            .bind(session_id)
            .bind(offset)
            .bind(limit)
            .fetch_all(pool)
            .await
        }
        None => {
            sqlx::query_as::<_, Session>(&format!(
                "SELECT {COLUMNS} FROM sessions
                 WHERE school_id = $1
                 ORDER BY start_date DESC OFFSET $2 LIMIT $3"
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
                "SELECT COUNT(*) FROM sessions WHERE school_id = $1 AND id = $2",
            )
            .bind(school_id)
            .bind(session_id)
            .fetch_one(pool)
            .await
        }
        None => {
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM sessions WHERE school_id = $1")
                .bind(school_id)
                .fetch_one(pool)
                .await
        }
    }
}

pub(crate) struct CreateSession<'a> {
    pub id: &'a str,
    pub session_name: &'a str,
    pub start_date: Date,
    pub end_date: Date,
    pub school_id: &'a str,
    pub created_at: time::PrimitiveDateTime,
    pub updated_at: time::PrimitiveDateTime,
}

pub(crate) async fn create(
    pool: &PgPool,
    params: CreateSession<'_>,
) -> Result<Session, sqlx::Error> {
    sqlx::query_as::<_, Session>(&format!(
        "INSERT INTO sessions (
            id, session_name, start_date, end_date, school_id, active_status,
            created_at, updated_at
        ) VALUES ($1,$2,$3,$4,$5,FALSE,$6,$7)
        RETURNING {COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.session_name)
    .bind(params.start_date)
    .bind(params.end_date)
    .bind(params.school_id)
    .bind(params.created_at)
    .bind(params.updated_at)
    .fetch_one(pool)
    .await
}

/// Deactivates every other session of the school and activates the target
/// in one transaction, so the one-active-session invariant holds even under
/// concurrent activations.
pub(crate) async fn activate(
    pool: &PgPool,
    id: &str,
    school_id: &str,
    now: time::PrimitiveDateTime,
) -> Result<Session, sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        "UPDATE sessions SET active_status = FALSE, updated_at = $2
         WHERE school_id = $1 AND id <> $3 AND active_status",
    )
    .bind(school_id)
    .bind(now)
    .bind(id)
    .execute(&mut *tx)
    .await?;

    let session = sqlx::query_as::<_, Session>(&format!(
        "UPDATE sessions SET active_status = TRUE, updated_at = $2
         WHERE id = $1
         RETURNING {COLUMNS}",
    ))
    .bind(id)
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(session)
}

pub(crate) async fn deactivate(
    pool: &PgPool,
    id: &str,
    now: time::PrimitiveDateTime,
) -> Result<Session, sqlx::Error> {
    sqlx::query_as::<_, Session>(&format!(
        "UPDATE sessions SET active_status = FALSE, updated_at = $2
         WHERE id = $1
         RETURNING {COLUMNS}",
    ))
    .bind(id)
    .bind(now)
    .fetch_one(pool)
    .await
}
