use sqlx::PgPool;
use time::Date;

use crate::db::models::Student;

const COLUMNS: &str = "\
    id, admission_no, name, dob, father_name, mother_name, mobile, address, \
    aadhaar, photo_url, class_id, session_id, school_id, created_at, updated_at";

pub(crate) async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<Student>, sqlx::Error> {
    sqlx::query_as::<_, Student>(&format!("SELECT {COLUMNS} FROM students WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn exists_by_admission_no(
    pool: &PgPool,
    school_id: &str,
    admission_no: &str,
) -> Result<Option<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>(
        "SELECT id FROM students WHERE school_id = $1 AND admission_no = $2",
    )
    .bind(school_id)
    .bind(admission_no)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn list(
    pool: &PgPool,
    school_id: &str,
    class_id: Option<&str>,
    offset: i64,
    limit: i64,
) -> Result<Vec<Student>, sqlx::Error> {
    match class_id {
        Some(class_id) => {
            sqlx::query_as::<_, Student>(&format!(
                "SELECT {COLUMNS} FROM students
                 WHERE school_id = $1 AND class_id = $2
                 ORDER BY admission_no OFFSET $3 LIMIT $4"
            ))
            .bind(school_id)
            .bind(class_id)
            .bind(offset)
            .bind(limit)
            .fetch_all(pool)
            .await
        }
        None => {
            sqlx::query_as::<_, Student>(&format!(
                "SELECT {COLUMNS} FROM students
                 WHERE school_id = $1
                 ORDER BY admission_no OFFSET $2 LIMIT $3"
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
                "SELECT COUNT(*) FROM students WHERE school_id = $1 AND class_id = $2",
            )
            .bind(school_id)
            .bind(class_id)
            .fetch_one(pool)
            .await
        }
        None => {
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM students WHERE school_id = $1")
                .bind(school_id)
                .fetch_one(pool)
                .await
        }
    }
}

pub(crate) struct CreateStudent<'a> {
    pub id: &'a str,
    pub admission_no: &'a str,
    pub name: &'a str,
    pub dob: Date,
    pub father_name: &'a str,
    pub mother_name: &'a str,
    pub mobile: &'a str,
    pub address: &'a str,
    pub aadhaar: Option<&'a str>,
    pub photo_url: Option<&'a str>,
    pub class_id: &'a str,
    pub session_id: &'a str,
    pub school_id: &'a str,
    pub created_at: time::PrimitiveDateTime,
    pub updated_at: time::PrimitiveDateTime,
}

pub(crate) async fn create(
    pool: &PgPool,
    params: CreateStudent<'_>,
) -> Result<Student, sqlx::Error> {
    sqlx::query_as::<_, Student>(&format!(
        "INSERT INTO students (
            id, admission_no, name, dob, father_name, mother_name, mobile, address,
            aadhaar, photo_url, class_id, session_id, school_id, created_at, updated_at
        ) VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11,$12,$13,$14,$15)
        RETURNING {COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.admission_no)
    .bind(params.name)
    .bind(params.dob)
    .bind(params.father_name)
    .bind(params.mother_name)
    .bind(params.mobile)
    .bind(params.address)
    .bind(params.aadhaar)
    .bind(params.photo_url)
    .bind(params.class_id)
    .bind(params.session_id)
    .bind(params.school_id)
    .bind(params.created_at)
    .bind(params.updated_at)
    .fetch_one(pool)
    .await
}

pub(crate) struct UpdateStudent {
    pub admission_no: Option<String>,
    pub name: Option<String>,
    pub dob: Option<Date>,
    pub father_name: Option<String>,
    pub mother_name: Option<String>,
    pub mobile: Option<String>,
    pub address: Option<String>,
    pub aadhaar: Option<String>,
    pub photo_url: Option<String>,
    pub updated_at: time::PrimitiveDateTime,
}

pub(crate) async fn update(
    pool: &PgPool,
    id: &str,
    params: UpdateStudent,
) -> Result<Student, sqlx::Error> {
    sqlx::query_as::<_, Student>(&format!(
        "UPDATE students SET
            admission_no = COALESCE($1, admission_no),
            name = COALESCE($2, name),
            dob = COALESCE($3, dob),
            father_name = COALESCE($4, father_name),
            mother_name = COALESCE($5, mother_name),
            mobile = COALESCE($6, mobile),
            address = COALESCE($7, address),
            aadhaar = COALESCE($8, aadhaar),
            photo_url = COALESCE($9, photo_url),
            updated_at = $10
         WHERE id = $11
         RETURNING {COLUMNS}",
    ))
    .bind(params.admission_no)
    .bind(params.name)
    .bind(params.dob)
    .bind(params.father_name)
    .bind(params.mother_name)
    .bind(params.mobile)
    .bind(params.address)
    .bind(params.aadhaar)
    .bind(params.photo_url)
    .bind(params.updated_at)
    .bind(id)
    .fetch_one(pool)
    .await
}

pub(crate) async fn delete(pool: &PgPool, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM students WHERE id = $1").bind(id).execute(pool).await?;
    Ok(result.rows_affected() > 0)
}
