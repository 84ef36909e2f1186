use axum::http::{Method, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use crate::db::types::UserRole;
use crate::test_support;

#[tokio::test]
async fn class_creation_requires_an_active_session() {
    let ctx = test_support::setup_test_context().await;

    let school = test_support::insert_school(ctx.state.db(), "Green Park School").await;
    let admin = test_support::insert_user(
        ctx.state.db(),
        "Admin",
        "clsadmin1@example.org",
        "clsadmin1",
        UserRole::Schooladmin,
        Some(&school.id),
        "admin-pass",
    )
    .await;
    let token = test_support::bearer_token(&admin, ctx.state.settings());

    let inactive = test_support::insert_session(
        ctx.state.db(),
        &school.id,
        "2024-25",
        "2024-04-01",
        "2025-03-31",
        false,
    )
    .await;

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/classes",
            Some(&token),
            Some(json!({"className": "10-A", "sessionId": inactive.id})),
        ))
        .await
        .expect("create in inactive session");
    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "response: {body}");
    assert_eq!(body["message"], "Cannot create class in an inactive session");

    let active = test_support::insert_session(
        ctx.state.db(),
        &school.id,
        "2025-26",
        "2025-04-01",
        "2026-03-31",
        true,
    )
    .await;

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/classes",
            Some(&token),
            Some(json!({"className": "10-A", "sessionId": active.id})),
        ))
        .await
        .expect("create in active session");
    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::CREATED, "response: {body}");
    assert_eq!(body["data"]["frozen"], false);
}

#[tokio::test]
async fn duplicate_class_name_in_session_conflicts() {
    let ctx = test_support::setup_test_context().await;

    let school = test_support::insert_school(ctx.state.db(), "Green Park School").await;
    let admin = test_support::insert_user(
        ctx.state.db(),
        "Admin",
        "clsadmin2@example.org",
        "clsadmin2",
        UserRole::Schooladmin,
        Some(&school.id),
        "admin-pass",
    )
    .await;
    let token = test_support::bearer_token(&admin, ctx.state.settings());

    let session = test_support::insert_session(
        ctx.state.db(),
        &school.id,
        "2025-26",
        "2025-04-01",
        "2026-03-31",
        true,
    )
    .await;
    test_support::insert_class(ctx.state.db(), &school.id, &session.id, "10-A", false).await;

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/classes",
            Some(&token),
            Some(json!({"className": "10-A", "sessionId": session.id})),
        ))
        .await
        .expect("duplicate class");

    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::CONFLICT, "response: {body}");
}

#[tokio::test]
async fn freeze_and_unfreeze_reject_repeats() {
    let ctx = test_support::setup_test_context().await;

    let school = test_support::insert_school(ctx.state.db(), "Green Park School").await;
    let admin = test_support::insert_user(
        ctx.state.db(),
        "Admin",
        "clsadmin3@example.org",
        "clsadmin3",
        UserRole::Schooladmin,
        Some(&school.id),
        "admin-pass",
    )
    .await;
    let token = test_support::bearer_token(&admin, ctx.state.settings());

    let session = test_support::insert_session(
        ctx.state.db(),
        &school.id,
        "2025-26",
        "2025-04-01",
        "2026-03-31",
        true,
    )
    .await;
    let class =
        test_support::insert_class(ctx.state.db(), &school.id, &session.id, "10-A", false).await;

    let freeze_uri = format!("/api/v1/classes/{}/freeze", class.id);
    let unfreeze_uri = format!("/api/v1/classes/{}/unfreeze", class.id);

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(Method::PATCH, &freeze_uri, Some(&token), None))
        .await
        .expect("freeze");
    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::OK, "response: {body}");
    assert_eq!(body["data"]["frozen"], true);

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(Method::PATCH, &freeze_uri, Some(&token), None))
        .await
        .expect("freeze again");
    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "response: {body}");
    assert_eq!(body["error"], "invalid_state_transition");

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(Method::PATCH, &unfreeze_uri, Some(&token), None))
        .await
        .expect("unfreeze");
    assert_eq!(response.status(), StatusCode::OK);

    let response = ctx
        .app
        .oneshot(test_support::json_request(Method::PATCH, &unfreeze_uri, Some(&token), None))
        .await
        .expect("unfreeze again");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn classes_are_listed_alphabetically() {
    let ctx = test_support::setup_test_context().await;

    let school = test_support::insert_school(ctx.state.db(), "Green Park School").await;
    let admin = test_support::insert_user(
        ctx.state.db(),
        "Admin",
        "clsadmin4@example.org",
        "clsadmin4",
        UserRole::Schooladmin,
        Some(&school.id),
        "admin-pass",
    )
    .await;
    let token = test_support::bearer_token(&admin, ctx.state.settings());

    let session = test_support::insert_session(
        ctx.state.db(),
        &school.id,
        "2025-26",
        "2025-04-01",
        "2026-03-31",
        true,
    )
    .await;
    test_support::insert_class(ctx.state.db(), &school.id, &session.id, "10-B", false).await;
    test_support::insert_class(ctx.state.db(), &school.id, &session.id, "10-A", false).await;
    test_support::insert_class(ctx.state.db(), &school.id, &session.id, "9-C", false).await;

    let response = ctx
        .app
        .oneshot(test_support::json_request(Method::GET, "/api/v1/classes", Some(&token), None))
        .await
        .expect("list classes");

    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::OK, "response: {body}");

    let names: Vec<&str> = body["data"]
        .as_array()
        .expect("data array")
        .iter()
        .map(|class| class["class_name"].as_str().expect("name"))
        .collect();
    assert_eq!(names, vec!["10-A", "10-B", "9-C"]);
}
