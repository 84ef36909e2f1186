use sqlx::PgPool;

use crate::db::models::Teacher;
use crate::db::types::AccountStatus;

const COLUMNS: &str = "\
    id, name, mobile, email, photo_url, class_id, school_id, status, \
    created_at, updated_at";

pub(crate) async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<Teacher>, sqlx::Error> {
    sqlx::query_as::<_, Teacher>(&format!("SELECT {COLUMNS} FROM teachers WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn exists_by_email(
    pool: &PgPool,
    school_id: &str,
    email: &str,
    exclude_id: Option<&str>,
) -> Result<Option<String>, sqlx::Error> {
    match exclude_id {
        Some(exclude_id) => {
            sqlx::query_scalar::<_, String>(
                "SELECT id FROM teachers
                 WHERE school_id = $1 AND email = $2 AND id <> $3",
            )
            .bind(school_id)
            .bind(email)
            .bind(exclude_id)
            .fetch_optional(pool)
            .await
        }
        None => {
            sqlx::query_scalar::<_, String>(
                "SELECT id FROM teachers WHERE school_id = $1 AND email = $2",
            )
            .bind(school_id)
            .bind(email)
            .fetch_optional(pool)
            .await
        }
    }
}

pub(crate) async fn find_active_for_class(
    pool: &PgPool,
    class_id: &str,
    exclude_id: Option<&str>,
) -> Result<Option<String>, sqlx::Error> {
    match exclude_id {
        Some(exclude_id) => {
            sqlx::query_scalar::<_, String>(
                "SELECT id FROM teachers
                 WHERE class_id = $1 AND status = 'active' AND id <> $2",
            )
            .bind(class_id)
            .bind(exclude_id)
            .fetch_optional(pool)
            .await
        }
        None => {
            sqlx::query_scalar::<_, String>(
                "SELECT id FROM teachers WHERE class_id = $1 AND status = 'active'",
            )
            .bind(class_id)
            .fetch_optional(pool)
            .await
        }
    }
}

pub(crate) async fn list(
    pool: &PgPool,
    school_id: &str,
    class_id: Option<&str>,
    offset: i64,
    limit: i64,
) -> Result<Vec<Teacher>, sqlx::Error> {
    match class_id {
        Some(class_id) => {
            sqlx::query_as::<_, Teacher>(&format!(
                "SELECT {COLUMNS} FROM teachers
                 WHERE school_id = $1 AND class_id = $2
                 ORDER BY name OFFSET $3 LIMIT $4"
            ))
            .bind(school_id)
            .bind(class_id)
            .bind(offset)
            .bind(limit)
            .fetch_all(pool)
            .await
        }
        None => {
            sqlx::query_as::<_, Teacher>(&format!(
                "SELECT {COLUMNS} FROM teachers
                 WHERE school_id = $1
                 ORDER BY name OFFSET $2 LIMIT $3"
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
    class_id: Option<&str>,
) -> Result<i64, sqlx::Error> {
    match class_id {
        Some(class_id) => {
            sqlx::query_scalar::<_, i64>(
                "SELECT COUNT(*) FROM teachers WHERE school_id = $1 AND class_id = $2",
            )
            .bind(school_id)
            .bind(class_id)
            .fetch_one(pool)
            .await
        }
        None => {
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM teachers WHERE school_id = $1")
                .bind(school_id)
                .fetch_one(pool)
                .await
        }
    }
}

pub(crate) struct CreateTeacher<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub mobile: &'a str,
    pub email: &'a str,
    pub photo_url: Option<&'a str>,
    pub class_id: Option<&'a str>,
    pub school_id: &'a str,
    pub created_at: time::PrimitiveDateTime,
    pub updated_at: time::PrimitiveDateTime,
}

pub(crate) async fn create(
    pool: &PgPool,
    params: CreateTeacher<'_>,
) -> Result<Teacher, sqlx::Error> {
    sqlx::query_as::<_, Teacher>(&format!(
        "INSERT INTO teachers (
            id, name, mobile, email, photo_url, class_id, school_id, status,
            created_at, updated_at
        ) VALUES ($1,$2,$3,$4,$5,$6,$7,'active',$8,$9)
        RETURNING {COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.name)
    .bind(params.mobile)
    .bind(params.email)
    .bind(params.photo_url)
    .bind(params.class_id)
    .bind(params.school_id)
    .bind(params.created_at)
    .bind(params.updated_at)
    .fetch_one(pool)
    .await
}

pub(crate) struct UpdateTeacher {
    pub name: Option<String>,
    pub mobile: Option<String>,
    pub email: Option<String>,
    pub photo_url: Option<String>,
    pub class_id: Option<String>,
    pub status: Option<AccountStatus>,
    pub updated_at: time::PrimitiveDateTime,
}

pub(crate) async fn update(
    pool: &PgPool,
    id: &str,
    params: UpdateTeacher,
) -> Result<Teacher, sqlx::Error> {
    sqlx::query_as::<_, Teacher>(&format!(
        "UPDATE teachers SET
            name = COALESCE($1, name),
            mobile = COALESCE($2, mobile),
            email = COALESCE($3, email),
            photo_url = COALESCE($4, photo_url),
            class_id = COALESCE($5, class_id),
            status = COALESCE($6, status),
            updated_at = $7
         WHERE id = $8
         RETURNING {COLUMNS}",
    ))
    .bind(params.name)
    .bind(params.mobile)
    .bind(params.email)
    .bind(params.photo_url)
    .bind(params.class_id)
    .bind(params.status)
    .bind(params.updated_at)
    .bind(id)
    .fetch_one(pool)
    .await
}

pub(crate) async fn set_status(
    pool: &PgPool,
    id: &str,
    status: AccountStatus,
    now: time::PrimitiveDateTime,
) -> Result<Teacher, sqlx::Error> {
    sqlx::query_as::<_, Teacher>(&format!(
        "UPDATE teachers SET status = $2, updated_at = $3 WHERE id = $1 RETURNING {COLUMNS}",
    ))
    .bind(id)
    .bind(status)
    .bind(now)
    .fetch_one(pool)
    .await
}
