use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use tower::ServiceExt;

use crate::db::types::UserRole;
use crate::test_support;

const BOUNDARY: &str = "schoolcard-test-boundary";

fn multipart_request(uri: &str, token: &str, parts: &[(&str, Option<&str>, &str)]) -> Request<Body> {
    let mut body = String::new();
    for (name, filename, content) in parts {
        body.push_str(&format!("--{BOUNDARY}\r\n"));
        match filename {
            Some(filename) => body.push_str(&format!(
                "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n\r\n"
            )),
            None => {
                body.push_str(&format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n"))
            }
        }
        body.push_str(content);
        body.push_str("\r\n");
    }
    body.push_str(&format!("--{BOUNDARY}--\r\n"));

    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}"))
        .body(Body::from(body))
        .expect("multipart request")
}

#[tokio::test]
async fn unknown_entity_type_is_rejected() {
    let ctx = test_support::setup_test_context().await;

    let school = test_support::insert_school(ctx.state.db(), "Green Park School").await;
    let admin = test_support::insert_user(
        ctx.state.db(),
        "Admin",
        "bulkadmin1@example.org",
        "bulkadmin1",
        UserRole::Schooladmin,
        Some(&school.id),
        "admin-pass",
    )
    .await;
    let token = test_support::bearer_token(&admin, ctx.state.settings());

    let response = ctx
        .app
        .oneshot(multipart_request("/api/v1/bulk-import/principal", &token, &[]))
        .await
        .expect("import");

    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "response: {body}");
    assert_eq!(body["message"], "Invalid entity type. Must be student, teacher, or admin");
}

#[tokio::test]
async fn missing_file_aborts_the_request() {
    let ctx = test_support::setup_test_context().await;

    let school = test_support::insert_school(ctx.state.db(), "Green Park School").await;
    let admin = test_support::insert_user(
        ctx.state.db(),
        "Admin",
        "bulkadmin2@example.org",
        "bulkadmin2",
        UserRole::Schooladmin,
        Some(&school.id),
        "admin-pass",
    )
    .await;
    let token = test_support::bearer_token(&admin, ctx.state.settings());

    let response = ctx
        .app
        .oneshot(multipart_request(
            "/api/v1/bulk-import/student",
            &token,
            &[("note", None, "not a file")],
        ))
        .await
        .expect("import");

    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "response: {body}");
    assert_eq!(body["message"], "No file uploaded");
}

#[tokio::test]
async fn non_excel_upload_is_rejected() {
    let ctx = test_support::setup_test_context().await;

    let school = test_support::insert_school(ctx.state.db(), "Green Park School").await;
    let admin = test_support::insert_user(
        ctx.state.db(),
        "Admin",
        "bulkadmin3@example.org",
        "bulkadmin3",
        UserRole::Schooladmin,
        Some(&school.id),
        "admin-pass",
    )
    .await;
    let token = test_support::bearer_token(&admin, ctx.state.settings());

    let response = ctx
        .app
        .oneshot(multipart_request(
            "/api/v1/bulk-import/student",
            &token,
            &[("file", Some("students.csv"), "Name,Class ID\nAsha,abc")],
        ))
        .await
        .expect("import");

    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "response: {body}");
    assert_eq!(body["message"], "Only Excel files (.xlsx, .xls) are allowed");
}

#[tokio::test]
async fn teachers_may_not_bulk_import() {
    let ctx = test_support::setup_test_context().await;

    let school = test_support::insert_school(ctx.state.db(), "Green Park School").await;
    let teacher = test_support::insert_user(
        ctx.state.db(),
        "Teacher",
        "bulkteacher@example.org",
        "bulkteacher",
        UserRole::Teacher,
        Some(&school.id),
        "teacher-pass",
    )
    .await;
    let token = test_support::bearer_token(&teacher, ctx.state.settings());

    let response = ctx
        .app
        .oneshot(multipart_request("/api/v1/bulk-import/student", &token, &[]))
        .await
        .expect("import");

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
