use sqlx::PgPool;

use crate::db::models::School;
use crate::db::types::SchoolStatus;

const COLUMNS: &str = "id, name, address, contact_email, status, created_at, updated_at";

pub(crate) async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<School>, sqlx::Error> {
    sqlx::query_as::<_, School>(&format!("SELECT {COLUMNS} FROM schools WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn fetch_one_by_id(pool: &PgPool, id: &str) -> Result<School, sqlx::Error> {
    sqlx::query_as::<_, School>(&format!("SELECT {COLUMNS} FROM schools WHERE id = $1"))
        .bind(id)
        .fetch_one(pool)
        .await
}

pub(crate) async fn find_name_by_id(
    pool: &PgPool,
    id: &str,
) -> Result<Option<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>("SELECT name FROM schools WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn find_first_active(pool: &PgPool) -> Result<Option<School>, sqlx::Error> {
    sqlx::query_as::<_, School>(&format!(
        "SELECT {COLUMNS} FROM schools WHERE status = 'active' ORDER BY created_at LIMIT 1"
    ))
    .fetch_optional(pool)
    .await
}

pub(crate) async fn list(
    pool: &PgPool,
    offset: i64,
    limit: i64,
) -> Result<Vec<School>, sqlx::Error> {
    sqlx::query_as::<_, School>(&format!(
        "SELECT {COLUMNS} FROM schools ORDER BY name OFFSET $1 LIMIT $2"
    ))
    .bind(offset)
    .bind(limit)
    .fetch_all(pool)
    .await
}

pub(crate) async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM schools").fetch_one(pool).await
}

pub(crate) struct CreateSchool<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub address: &'a str,
    pub contact_email: &'a str,
    pub status: SchoolStatus,
    pub created_at: time::PrimitiveDateTime,
    pub updated_at: time::PrimitiveDateTime,
}

pub(crate) async fn create(pool: &PgPool, params: CreateSchool<'_>) -> Result<School, sqlx::Error> {
    sqlx::query_as::<_, School>(&format!(
        "INSERT INTO schools (id, name, address, contact_email, status, created_at, updated_at)
         VALUES ($1,$2,$3,$4,$5,$6,$7)
         RETURNING {COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.name)
    .bind(params.address)
    .bind(params.contact_email)
    .bind(params.status)
    .bind(params.created_at)
    .bind(params.updated_at)
    .fetch_one(pool)
    .await
}

pub(crate) struct UpdateSchool {
    pub name: Option<String>,
    pub address: Option<String>,
    pub contact_email: Option<String>,
    pub status: Option<SchoolStatus>,
    pub updated_at: time::PrimitiveDateTime,
}

pub(crate) async fn update(
    pool: &PgPool,
    id: &str,
    params: UpdateSchool,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE schools SET
            name = COALESCE($1, name),
            address = COALESCE($2, address),
            contact_email = COALESCE($3, contact_email),
            status = COALESCE($4, status),
            updated_at = $5
         WHERE id = $6",
    )
    .bind(params.name)
    .bind(params.address)
    .bind(params.contact_email)
    .bind(params.status)
    .bind(params.updated_at)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(())
}

pub(crate) async fn delete(pool: &PgPool, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM schools WHERE id = $1").bind(id).execute(pool).await?;
    Ok(result.rows_affected() > 0)
}
