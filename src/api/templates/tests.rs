use axum::body::to_bytes;
use axum::http::{header, Method, StatusCode};
use tower::ServiceExt;

use crate::db::types::{TemplateKind, UserRole};
use crate::repositories;
use crate::test_support;

#[tokio::test]
async fn templates_are_scoped_to_the_callers_school() {
    let ctx = test_support::setup_test_context().await;

    let school_a = test_support::insert_school(ctx.state.db(), "School A").await;
    let _school_b = test_support::insert_school(ctx.state.db(), "School B").await;
    let admin = test_support::insert_user(
        ctx.state.db(),
        "Admin A",
        "tpladmin1@example.org",
        "tpladmin1",
        UserRole::Schooladmin,
        Some(&school_a.id),
        "admin-pass",
    )
    .await;
    let token = test_support::bearer_token(&admin, ctx.state.settings());

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(Method::GET, "/api/v1/templates", Some(&token), None))
        .await
        .expect("list templates");

    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::OK, "response: {body}");

    let templates = body["data"].as_array().expect("data array");
    assert_eq!(templates.len(), 3);
    assert!(templates.iter().all(|template| template["school_id"] == school_a.id.as_str()));

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::GET,
            "/api/v1/templates/active/student",
            Some(&token),
            None,
        ))
        .await
        .expect("active template");
    let body = test_support::read_json(response).await;
    assert_eq!(body["data"]["kind"], "student");
}

#[tokio::test]
async fn schema_download_is_a_csv_attachment() {
    let ctx = test_support::setup_test_context().await;

    let school = test_support::insert_school(ctx.state.db(), "Green Park School").await;
    let admin = test_support::insert_user(
        ctx.state.db(),
        "Admin",
        "tpladmin2@example.org",
        "tpladmin2",
        UserRole::Schooladmin,
        Some(&school.id),
        "admin-pass",
    )
    .await;
    let token = test_support::bearer_token(&admin, ctx.state.settings());

    let template =
        repositories::templates::find_latest(ctx.state.db(), &school.id, TemplateKind::Student)
            .await
            .expect("template query")
            .expect("student template");

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            &format!("/api/v1/templates/{}/download-excel", template.id),
            Some(&token),
            None,
        ))
        .await
        .expect("download schema");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "text/csv; charset=utf-8"
    );
    let disposition =
        response.headers().get(header::CONTENT_DISPOSITION).unwrap().to_str().unwrap().to_string();
    assert!(disposition.contains("student-template.csv"), "disposition: {disposition}");

    let body = to_bytes(response.into_body(), usize::MAX).await.expect("body");
    let text = String::from_utf8(body.to_vec()).expect("utf8");
    assert!(text.starts_with("Name,Admission Number"), "csv: {text}");

    // Another school's admin cannot pull this template.
    let school_b = test_support::insert_school(ctx.state.db(), "School B").await;
    let admin_b = test_support::insert_user(
        ctx.state.db(),
        "Admin B",
        "tpladmin3@example.org",
        "tpladmin3",
        UserRole::Schooladmin,
        Some(&school_b.id),
        "admin-pass",
    )
    .await;
    let token_b = test_support::bearer_token(&admin_b, ctx.state.settings());

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::GET,
            &format!("/api/v1/templates/{}/download-excel", template.id),
            Some(&token_b),
            None,
        ))
        .await
        .expect("cross-tenant download");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
