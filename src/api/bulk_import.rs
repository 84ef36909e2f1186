use std::collections::HashMap;

use axum::{
    extract::{Multipart, Path, State},
    routing::post,
    Json, Router,
};

use crate::api::errors::ApiError;
use crate::api::guards::{require_role, CurrentUser};
use crate::api::validation::parse_date_field;
use crate::core::state::AppState;
use crate::db::types::{AccountStatus, TemplateKind, UserRole};
use crate::schemas::bulk_import::{BulkImportReport, RowError};
use crate::schemas::Envelope;
use crate::services::{excel, scope, students, teachers, users};

pub(crate) fn router() -> Router<AppState> {
    Router::new().route("/:entity_type", post(import_excel))
}

/// Row-by-row import through the same creation services as the single-entity
/// endpoints. A failing row is recorded and the batch continues; only
/// file-level problems abort the request.
async fn import_excel(
    Path(entity_type): Path<String>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Envelope<BulkImportReport>>, ApiError> {
    require_role(&user, &[UserRole::Superadmin, UserRole::Schooladmin])?;

    let kind = TemplateKind::parse(&entity_type).ok_or_else(|| {
        ApiError::Validation("Invalid entity type. Must be student, teacher, or admin".to_string())
    })?;

    let mut upload: Option<(String, Vec<u8>)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| ApiError::Validation("Invalid multipart payload".to_string()))?
    {
        if field.name() == Some("file") {
            let filename = field.file_name().unwrap_or("upload").to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|_| ApiError::Validation("Failed to read uploaded file".to_string()))?;
            upload = Some((filename, bytes.to_vec()));
        }
    }

    let Some((filename, bytes)) = upload else {
        return Err(ApiError::Validation("No file uploaded".to_string()));
    };

    let lower = filename.to_lowercase();
    if !(lower.ends_with(".xlsx") || lower.ends_with(".xls")) {
        return Err(ApiError::Validation(
            "Only Excel files (.xlsx, .xls) are allowed".to_string(),
        ));
    }

    let sheet = excel::parse_workbook(&bytes)?;
    if sheet.rows.is_empty() {
        return Err(ApiError::Validation("Excel file contains no data rows".to_string()));
    }

    let gate = scope::tenant_gate(&user)?;

    let mut report = BulkImportReport {
        total: sheet.rows.len(),
        success: 0,
        failed: 0,
        errors: Vec::new(),
    };

    for (index, cells) in sheet.rows.iter().enumerate() {
        // Data rows are 1-indexed plus one for the header row.
        let row_number = index + 2;
        let fields = excel::map_row(&sheet.headers, cells);

        let outcome = match kind {
            TemplateKind::Student => import_student_row(&state, gate.as_deref(), &fields).await,
            TemplateKind::Teacher => import_teacher_row(&state, gate.as_deref(), &fields).await,
            TemplateKind::Admin => import_admin_row(&state, gate.as_deref(), &fields).await,
        };

        match outcome {
            Ok(()) => report.success += 1,
            Err(error) => {
                report.failed += 1;
                report.errors.push(RowError {
                    row: row_number,
                    data: excel::row_json(&sheet.headers, cells),
                    error: error.message(),
                });
            }
        }
    }

    tracing::info!(
        entity_type = entity_type.as_str(),
        total = report.total,
        success = report.success,
        failed = report.failed,
        "Bulk import finished"
    );

    let message =
        format!("Import completed: {} successful, {} failed", report.success, report.failed);
    Ok(Json(Envelope::with_message(message, report)))
}

async fn import_student_row(
    state: &AppState,
    gate: Option<&str>,
    fields: &HashMap<&'static str, &str>,
) -> Result<(), ApiError> {
    let class_id = required(fields, "classId", "Class ID")?;
    let admission_no = required(fields, "admissionNo", "Admission number")?;
    let name = required(fields, "name", "Name")?;
    let dob = parse_date_field(required(fields, "dob", "Date of birth")?, "date of birth")?;
    let father_name = required(fields, "fatherName", "Father name")?;
    let mother_name = required(fields, "motherName", "Mother name")?;
    let mobile = required(fields, "mobile", "Mobile")?;
    let address = required(fields, "address", "Address")?;

    students::create(
        state.db(),
        gate,
        students::NewStudent {
            admission_no,
            name,
            dob,
            father_name,
            mother_name,
            mobile,
            address,
            aadhaar: fields.get("aadhaar").copied(),
            photo_url: fields.get("photoUrl").copied(),
            class_id,
        },
    )
    .await
    .map(|_| ())
}

async fn import_teacher_row(
    state: &AppState,
    gate: Option<&str>,
    fields: &HashMap<&'static str, &str>,
) -> Result<(), ApiError> {
    let name = required(fields, "name", "Name")?;
    let email = required(fields, "email", "Email")?;
    let mobile = required(fields, "mobile", "Mobile")?;
    let school_id = row_school(gate, fields)?;

    teachers::create(
        state.db(),
        &school_id,
        teachers::NewTeacher {
            name,
            mobile,
            email,
            photo_url: fields.get("photoUrl").copied(),
            class_id: fields.get("classId").copied(),
        },
    )
    .await
    .map(|_| ())
}

async fn import_admin_row(
    state: &AppState,
    gate: Option<&str>,
    fields: &HashMap<&'static str, &str>,
) -> Result<(), ApiError> {
    let name = required(fields, "name", "Name")?;
    let email = required(fields, "email", "Email")?;
    let school_id = row_school(gate, fields)?;

    let username = fields
        .get("username")
        .copied()
        .map(str::to_string)
        .unwrap_or_else(|| email.split('@').next().unwrap_or("admin").to_string());
    // Rows without a password column get the username as the initial password.
    let password = fields
        .get("password")
        .copied()
        .map(str::to_string)
        .unwrap_or_else(|| username.clone());

    users::create(
        state.db(),
        users::NewUser {
            name,
            email,
            username: &username,
            password: &password,
            role: UserRole::Schooladmin,
            school_id: Some(&school_id),
            status: AccountStatus::Active,
        },
    )
    .await
    .map(|_| ())
}

fn required<'a>(
    fields: &HashMap<&'static str, &'a str>,
    key: &'static str,
    label: &str,
) -> Result<&'a str, ApiError> {
    fields
        .get(key)
        .copied()
        .ok_or_else(|| ApiError::Validation(format!("{label} is required")))
}

/// School for teacher/admin rows: non-superadmin callers always import into
/// their own school (a "School ID" column cannot cross tenants); superadmins
/// must provide one per row.
fn row_school(
    gate: Option<&str>,
    fields: &HashMap<&'static str, &str>,
) -> Result<String, ApiError> {
    match gate {
        Some(school_id) => Ok(school_id.to_string()),
        None => fields
            .get("schoolId")
            .copied()
            .map(str::to_string)
            .ok_or_else(|| ApiError::Validation("School ID is required".to_string())),
    }
}

#[cfg(test)]
mod tests;
