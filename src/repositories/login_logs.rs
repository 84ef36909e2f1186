use sqlx::PgPool;

use crate::db::types::UserRole;

// Append-only: inserts are the only operation the application performs.

pub(crate) struct CreateLoginLog<'a> {
    pub id: &'a str,
    pub username: &'a str,
    pub role: UserRole,
    pub school_id: Option<&'a str>,
    pub ip_address: &'a str,
    pub logged_at: time::PrimitiveDateTime,
}

pub(crate) async fn insert(pool: &PgPool, params: CreateLoginLog<'_>) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO login_logs (id, username, role, school_id, ip_address, logged_at)
         VALUES ($1,$2,$3,$4,$5,$6)",
    )
    .bind(params.id)
    .bind(params.username)
    .bind(params.role)
    .bind(params.school_id)
    .bind(params.ip_address)
    .bind(params.logged_at)
    .execute(pool)
    .await?;
    Ok(())
}
