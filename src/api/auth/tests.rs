use axum::http::{Method, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use crate::db::types::UserRole;
use crate::test_support;

#[tokio::test]
async fn login_issues_token_usable_on_me() {
    let ctx = test_support::setup_test_context().await;

    let school = test_support::insert_school(ctx.state.db(), "Green Park School").await;
    test_support::insert_user(
        ctx.state.db(),
        "Admin One",
        "admin1@example.org",
        "admin1",
        UserRole::Schooladmin,
        Some(&school.id),
        "admin1-password",
    )
    .await;

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/auth/login",
            None,
            Some(json!({"email": "Admin1@Example.org", "password": "admin1-password"})),
        ))
        .await
        .expect("login");

    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::OK, "response: {body}");
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["user"]["role"], "Schooladmin");
    assert_eq!(body["data"]["user"]["school_name"], "Green Park School");
    assert!(body["data"]["user"].get("password_hash").is_none());

    let token = body["data"]["token"].as_str().expect("token").to_string();
    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            "/api/v1/auth/me",
            Some(&token),
            None,
        ))
        .await
        .expect("me");

    let status = response.status();
    let me = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::OK, "response: {me}");
    assert_eq!(me["data"]["email"], "admin1@example.org");

    let logs: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM login_logs WHERE username = $1")
        .bind("admin1")
        .fetch_one(ctx.state.db())
        .await
        .expect("login log count");
    assert_eq!(logs, 1);
}

#[tokio::test]
async fn bad_password_and_unknown_email_are_indistinguishable() {
    let ctx = test_support::setup_test_context().await;

    let school = test_support::insert_school(ctx.state.db(), "Green Park School").await;
    test_support::insert_user(
        ctx.state.db(),
        "Admin Two",
        "admin2@example.org",
        "admin2",
        UserRole::Schooladmin,
        Some(&school.id),
        "admin2-password",
    )
    .await;

    let wrong_password = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/auth/login",
            None,
            Some(json!({"email": "admin2@example.org", "password": "nope"})),
        ))
        .await
        .expect("wrong password");
    let wrong_password_status = wrong_password.status();
    let wrong_password_body = test_support::read_json(wrong_password).await;

    let unknown_email = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/auth/login",
            None,
            Some(json!({"email": "ghost@example.org", "password": "nope"})),
        ))
        .await
        .expect("unknown email");
    let unknown_email_status = unknown_email.status();
    let unknown_email_body = test_support::read_json(unknown_email).await;

    assert_eq!(wrong_password_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_email_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password_body, unknown_email_body);
}

#[tokio::test]
async fn gated_role_gets_generic_invalid_credentials() {
    let ctx = test_support::setup_test_context().await;

    let school = test_support::insert_school(ctx.state.db(), "Green Park School").await;
    test_support::set_login_gates(ctx.state.db(), &school.id, false, true).await;
    test_support::insert_user(
        ctx.state.db(),
        "Admin Three",
        "admin3@example.org",
        "admin3",
        UserRole::Schooladmin,
        Some(&school.id),
        "admin3-password",
    )
    .await;

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/auth/login",
            None,
            Some(json!({"email": "admin3@example.org", "password": "admin3-password"})),
        ))
        .await
        .expect("gated login");

    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED, "response: {body}");
    assert_eq!(body["message"], "Invalid credentials");

    // Teachers of the same school stay unaffected by the schooladmin gate.
    test_support::insert_user(
        ctx.state.db(),
        "Teacher One",
        "teacher1@example.org",
        "teacher1",
        UserRole::Teacher,
        Some(&school.id),
        "teacher1-password",
    )
    .await;

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/auth/login",
            None,
            Some(json!({"email": "teacher1@example.org", "password": "teacher1-password"})),
        ))
        .await
        .expect("teacher login");
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn inactive_account_is_reported_distinctly() {
    let ctx = test_support::setup_test_context().await;

    let school = test_support::insert_school(ctx.state.db(), "Green Park School").await;
    let user = test_support::insert_user(
        ctx.state.db(),
        "Admin Four",
        "admin4@example.org",
        "admin4",
        UserRole::Schooladmin,
        Some(&school.id),
        "admin4-password",
    )
    .await;

    sqlx::query("UPDATE users SET status = 'inactive' WHERE id = $1")
        .bind(&user.id)
        .execute(ctx.state.db())
        .await
        .expect("deactivate user");

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/auth/login",
            None,
            Some(json!({"email": "admin4@example.org", "password": "admin4-password"})),
        ))
        .await
        .expect("inactive login");

    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED, "response: {body}");
    assert_eq!(body["message"], "Account is inactive");
}

#[tokio::test]
async fn superadmin_bypasses_login_gates() {
    let ctx = test_support::setup_test_context().await;

    test_support::insert_user(
        ctx.state.db(),
        "Root Admin",
        "root@example.org",
        "rootadmin",
        UserRole::Superadmin,
        None,
        "root-password",
    )
    .await;

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/auth/login",
            None,
            Some(json!({"email": "root@example.org", "password": "root-password"})),
        ))
        .await
        .expect("superadmin login");

    assert_eq!(response.status(), StatusCode::OK);
}
