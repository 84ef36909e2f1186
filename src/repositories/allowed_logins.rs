use sqlx::PgPool;

use crate::db::models::AllowedLogin;

const COLUMNS: &str =
    "id, school_id, allow_school_admin, allow_teacher, created_at, updated_at";

pub(crate) async fn find_by_school(
    pool: &PgPool,
    school_id: &str,
) -> Result<Option<AllowedLogin>, sqlx::Error> {
    sqlx::query_as::<_, AllowedLogin>(&format!(
        "SELECT {COLUMNS} FROM allowed_logins WHERE school_id = $1"
    ))
    .bind(school_id)
    .fetch_optional(pool)
    .await
}

pub(crate) struct CreateAllowedLogin<'a> {
    pub id: &'a str,
    pub school_id: &'a str,
    pub allow_school_admin: bool,
    pub allow_teacher: bool,
    pub created_at: time::PrimitiveDateTime,
    pub updated_at: time::PrimitiveDateTime,
}

pub(crate) async fn create(
    pool: &PgPool,
    params: CreateAllowedLogin<'_>,
) -> Result<AllowedLogin, sqlx::Error> {
    sqlx::query_as::<_, AllowedLogin>(&format!(
        "INSERT INTO allowed_logins (
            id, school_id, allow_school_admin, allow_teacher, created_at, updated_at
        ) VALUES ($1,$2,$3,$4,$5,$6)
        RETURNING {COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.school_id)
    .bind(params.allow_school_admin)
    .bind(params.allow_teacher)
    .bind(params.created_at)
    .bind(params.updated_at)
    .fetch_one(pool)
    .await
}

pub(crate) async fn update(
    pool: &PgPool,
    school_id: &str,
    allow_school_admin: Option<bool>,
    allow_teacher: Option<bool>,
    updated_at: time::PrimitiveDateTime,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE allowed_logins SET
            allow_school_admin = COALESCE($1, allow_school_admin),
            allow_teacher = COALESCE($2, allow_teacher),
            updated_at = $3
         WHERE school_id = $4",
    )
    .bind(allow_school_admin)
    .bind(allow_teacher)
    .bind(updated_at)
    .bind(school_id)
    .execute(pool)
    .await?;
    Ok(())
}
