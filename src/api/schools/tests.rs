use axum::http::{Method, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use crate::db::types::UserRole;
use crate::repositories;
use crate::test_support;

#[tokio::test]
async fn creating_a_school_provisions_gates_and_templates() {
    let ctx = test_support::setup_test_context().await;

    let superadmin = test_support::insert_user(
        ctx.state.db(),
        "Root",
        "schroot1@example.org",
        "schroot1",
        UserRole::Superadmin,
        None,
        "root-pass",
    )
    .await;
    let token = test_support::bearer_token(&superadmin, ctx.state.settings());

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/schools",
            Some(&token),
            Some(json!({
                "name": "Green Park School",
                "address": "12 Park Street",
                "contactEmail": "office@gps.example.org"
            })),
        ))
        .await
        .expect("create school");

    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::CREATED, "response: {body}");
    let school_id = body["data"]["id"].as_str().expect("school id").to_string();

    let gates = repositories::allowed_logins::find_by_school(ctx.state.db(), &school_id)
        .await
        .expect("gates query")
        .expect("gates row");
    assert!(gates.allow_school_admin);
    assert!(gates.allow_teacher);

    let templates = repositories::templates::list(ctx.state.db(), &school_id, None)
        .await
        .expect("templates");
    assert_eq!(templates.len(), 3);
}

#[tokio::test]
async fn school_management_is_superadmin_only() {
    let ctx = test_support::setup_test_context().await;

    let school = test_support::insert_school(ctx.state.db(), "Green Park School").await;
    let admin = test_support::insert_user(
        ctx.state.db(),
        "Admin",
        "schadmin1@example.org",
        "schadmin1",
        UserRole::Schooladmin,
        Some(&school.id),
        "admin-pass",
    )
    .await;
    let token = test_support::bearer_token(&admin, ctx.state.settings());

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(Method::GET, "/api/v1/schools", Some(&token), None))
        .await
        .expect("list schools as schooladmin");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::DELETE,
            &format!("/api/v1/schools/{}", school.id),
            Some(&token),
            None,
        ))
        .await
        .expect("delete school as schooladmin");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn login_gates_can_be_toggled() {
    let ctx = test_support::setup_test_context().await;

    let school = test_support::insert_school(ctx.state.db(), "Green Park School").await;
    let superadmin = test_support::insert_user(
        ctx.state.db(),
        "Root",
        "schroot2@example.org",
        "schroot2",
        UserRole::Superadmin,
        None,
        "root-pass",
    )
    .await;
    let token = test_support::bearer_token(&superadmin, ctx.state.settings());

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::PATCH,
            &format!("/api/v1/schools/{}/allowed-logins", school.id),
            Some(&token),
            Some(json!({"allowTeacher": false})),
        ))
        .await
        .expect("toggle gates");

    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::OK, "response: {body}");
    assert_eq!(body["data"]["allow_teacher"], false);
    assert_eq!(body["data"]["allow_school_admin"], true);

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::GET,
            &format!("/api/v1/schools/{}/allowed-logins", school.id),
            Some(&token),
            None,
        ))
        .await
        .expect("read gates");
    let body = test_support::read_json(response).await;
    assert_eq!(body["data"]["allow_teacher"], false);
}

#[tokio::test]
async fn hard_delete_removes_the_school() {
    let ctx = test_support::setup_test_context().await;

    let school = test_support::insert_school(ctx.state.db(), "Green Park School").await;
    let superadmin = test_support::insert_user(
        ctx.state.db(),
        "Root",
        "schroot3@example.org",
        "schroot3",
        UserRole::Superadmin,
        None,
        "root-pass",
    )
    .await;
    let token = test_support::bearer_token(&superadmin, ctx.state.settings());

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::DELETE,
            &format!("/api/v1/schools/{}", school.id),
            Some(&token),
            None,
        ))
        .await
        .expect("delete school");
    assert_eq!(response.status(), StatusCode::OK);

    let gone = repositories::schools::find_by_id(ctx.state.db(), &school.id)
        .await
        .expect("find school");
    assert!(gone.is_none());

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::DELETE,
            &format!("/api/v1/schools/{}", school.id),
            Some(&token),
            None,
        ))
        .await
        .expect("delete again");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
