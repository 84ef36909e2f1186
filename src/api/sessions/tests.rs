use axum::http::{Method, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use crate::db::types::UserRole;
use crate::repositories;
use crate::test_support;

#[tokio::test]
async fn create_then_duplicate_name_conflicts() {
    let ctx = test_support::setup_test_context().await;

    let school = test_support::insert_school(ctx.state.db(), "Green Park School").await;
    let admin = test_support::insert_user(
        ctx.state.db(),
        "Admin",
        "sessadmin1@example.org",
        "sessadmin1",
        UserRole::Schooladmin,
        Some(&school.id),
        "admin-pass",
    )
    .await;
    let token = test_support::bearer_token(&admin, ctx.state.settings());

    let payload = json!({
        "sessionName": "2025-26",
        "startDate": "2025-04-01",
        "endDate": "2026-03-31"
    });

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/sessions",
            Some(&token),
            Some(payload.clone()),
        ))
        .await
        .expect("create session");
    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::CREATED, "response: {body}");
    assert_eq!(body["data"]["active_status"], false);

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/sessions",
            Some(&token),
            Some(payload),
        ))
        .await
        .expect("duplicate session");
    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::CONFLICT, "response: {body}");
    assert_eq!(body["error"], "conflict");
}

#[tokio::test]
async fn inverted_date_range_is_rejected() {
    let ctx = test_support::setup_test_context().await;

    let school = test_support::insert_school(ctx.state.db(), "Green Park School").await;
    let admin = test_support::insert_user(
        ctx.state.db(),
        "Admin",
        "sessadmin2@example.org",
        "sessadmin2",
        UserRole::Schooladmin,
        Some(&school.id),
        "admin-pass",
    )
    .await;
    let token = test_support::bearer_token(&admin, ctx.state.settings());

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/sessions",
            Some(&token),
            Some(json!({
                "sessionName": "Backwards",
                "startDate": "2026-03-31",
                "endDate": "2025-04-01"
            })),
        ))
        .await
        .expect("create session");

    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "response: {body}");
    assert_eq!(body["message"], "Start date must be before end date");
}

#[tokio::test]
async fn activation_moves_the_active_flag_exclusively() {
    let ctx = test_support::setup_test_context().await;

    let school = test_support::insert_school(ctx.state.db(), "Green Park School").await;
    let admin = test_support::insert_user(
        ctx.state.db(),
        "Admin",
        "sessadmin3@example.org",
        "sessadmin3",
        UserRole::Schooladmin,
        Some(&school.id),
        "admin-pass",
    )
    .await;
    let token = test_support::bearer_token(&admin, ctx.state.settings());

    let first = test_support::insert_session(
        ctx.state.db(),
        &school.id,
        "2025-26",
        "2025-04-01",
        "2026-03-31",
        false,
    )
    .await;
    let second = test_support::insert_session(
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
            Method::PATCH,
            &format!("/api/v1/sessions/{}/activate", first.id),
            Some(&token),
            None,
        ))
        .await
        .expect("activate first");
    assert_eq!(response.status(), StatusCode::OK);

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::PATCH,
            &format!("/api/v1/sessions/{}/activate", second.id),
            Some(&token),
            None,
        ))
        .await
        .expect("activate second");
    assert_eq!(response.status(), StatusCode::OK);

    let first_after = repositories::sessions::find_by_id(ctx.state.db(), &first.id)
        .await
        .expect("find first")
        .expect("first exists");
    let second_after = repositories::sessions::find_by_id(ctx.state.db(), &second.id)
        .await
        .expect("find second")
        .expect("second exists");

    assert!(!first_after.active_status);
    assert!(second_after.active_status);

    let active_count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM sessions WHERE school_id = $1 AND active_status",
    )
    .bind(&school.id)
    .fetch_one(ctx.state.db())
    .await
    .expect("active count");
    assert_eq!(active_count, 1);
}

#[tokio::test]
async fn deactivating_twice_is_an_invalid_transition() {
    let ctx = test_support::setup_test_context().await;

    let school = test_support::insert_school(ctx.state.db(), "Green Park School").await;
    let admin = test_support::insert_user(
        ctx.state.db(),
        "Admin",
        "sessadmin4@example.org",
        "sessadmin4",
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

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::PATCH,
            &format!("/api/v1/sessions/{}/deactivate", session.id),
            Some(&token),
            None,
        ))
        .await
        .expect("deactivate");
    assert_eq!(response.status(), StatusCode::OK);

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::PATCH,
            &format!("/api/v1/sessions/{}/deactivate", session.id),
            Some(&token),
            None,
        ))
        .await
        .expect("deactivate again");

    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "response: {body}");
    assert_eq!(body["error"], "invalid_state_transition");
}

#[tokio::test]
async fn cross_tenant_activation_is_forbidden() {
    let ctx = test_support::setup_test_context().await;

    let school_a = test_support::insert_school(ctx.state.db(), "School A").await;
    let school_b = test_support::insert_school(ctx.state.db(), "School B").await;
    let session_a = test_support::insert_session(
        ctx.state.db(),
        &school_a.id,
        "2025-26",
        "2025-04-01",
        "2026-03-31",
        false,
    )
    .await;

    let admin_b = test_support::insert_user(
        ctx.state.db(),
        "Admin B",
        "sessadmin5@example.org",
        "sessadmin5",
        UserRole::Schooladmin,
        Some(&school_b.id),
        "admin-pass",
    )
    .await;
    let token = test_support::bearer_token(&admin_b, ctx.state.settings());

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::PATCH,
            &format!("/api/v1/sessions/{}/activate", session_a.id),
            Some(&token),
            None,
        ))
        .await
        .expect("cross-tenant activate");

    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::FORBIDDEN, "response: {body}");
}

#[tokio::test]
async fn teacher_can_list_but_not_create() {
    let ctx = test_support::setup_test_context().await;

    let school = test_support::insert_school(ctx.state.db(), "Green Park School").await;
    test_support::insert_session(
        ctx.state.db(),
        &school.id,
        "2025-26",
        "2025-04-01",
        "2026-03-31",
        true,
    )
    .await;
    let teacher = test_support::insert_user(
        ctx.state.db(),
        "Teacher",
        "sessteacher@example.org",
        "sessteacher",
        UserRole::Teacher,
        Some(&school.id),
        "teacher-pass",
    )
    .await;
    let token = test_support::bearer_token(&teacher, ctx.state.settings());

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            "/api/v1/sessions",
            Some(&token),
            None,
        ))
        .await
        .expect("list sessions");
    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::OK, "response: {body}");
    assert_eq!(body["pagination"]["total"], 1);

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/sessions",
            Some(&token),
            Some(json!({
                "sessionName": "2026-27",
                "startDate": "2026-04-01",
                "endDate": "2027-03-31"
            })),
        ))
        .await
        .expect("create as teacher");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
