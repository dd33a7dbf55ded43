mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::{TestApp, fixtures, get, post, request, send};
use vaultdesk_core::AdminRole;

#[tokio::test]
async fn test_bootstrap_login_and_profile() {
    let app = TestApp::new();
    let router = app.router();

    let bootstrap = post(
        &router,
        "/api/admin/bootstrap_admin",
        None,
        json!({ "username": "root", "email": "root@bank.example", "password": "s3cure-passw0rd" }),
    )
    .await;
    assert_eq!(bootstrap.status, StatusCode::CREATED);
    assert_eq!(bootstrap.json()["data"]["role"], "super_admin");

    let again = post(
        &router,
        "/api/admin/bootstrap_admin",
        None,
        json!({ "username": "root2", "email": "root2@bank.example", "password": "s3cure-passw0rd" }),
    )
    .await;
    assert_eq!(again.status, StatusCode::FORBIDDEN);

    let login = post(
        &router,
        "/api/admin/login",
        None,
        json!({ "username": "root", "password": "s3cure-passw0rd" }),
    )
    .await;
    assert_eq!(login.status, StatusCode::OK);
    let body = login.json();
    assert_eq!(body["data"]["token_type"], "bearer");
    assert_eq!(body["data"]["admin"]["username"], "root");

    let token = body["data"]["access_token"].as_str().unwrap();
    let me = get(&router, "/api/admin/me", token).await;
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.json()["data"]["email"], "root@bank.example");
}

#[tokio::test]
async fn test_login_with_wrong_password_is_unauthorized() {
    let app = TestApp::new();
    app.seed_admin("ops", AdminRole::Manager).await;
    let router = app.router();

    let response = post(
        &router,
        "/api/admin/login",
        None,
        json!({ "username": "ops", "password": "not-the-password" }),
    )
    .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.json()["success"], false);
}

#[tokio::test]
async fn test_refresh_issues_new_access_token() {
    let app = TestApp::new();
    app.seed_admin("ops", AdminRole::Manager).await;
    let router = app.router();

    let login = post(
        &router,
        "/api/admin/login",
        None,
        json!({ "username": "ops", "password": fixtures::PASSWORD }),
    )
    .await
    .json();
    let refresh_token = login["data"]["refresh_token"].as_str().unwrap();

    let refreshed = post(
        &router,
        "/api/admin/refresh",
        None,
        json!({ "refresh_token": refresh_token }),
    )
    .await;
    assert_eq!(refreshed.status, StatusCode::OK);

    let token = refreshed.json()["data"]["access_token"]
        .as_str()
        .unwrap()
        .to_string();
    assert_eq!(get(&router, "/api/admin/me", &token).await.status, StatusCode::OK);
}

#[tokio::test]
async fn test_requests_without_token_are_rejected() {
    let app = TestApp::new();
    let router = app.router();

    let response = send(&router, request(Method::GET, "/api/admin/users", None, None)).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_auditor_cannot_mutate() {
    let app = TestApp::new();
    let auditor = app.seed_admin("audit", AdminRole::Auditor).await;
    let token = app.token_for(&auditor);
    let loan = {
        let mut tables = app.state.ledger.write().await;
        let ada = tables.insert_user(fixtures::user("ada"));
        tables.insert_loan(fixtures::loan(ada.id, 300.0))
    };
    let router = app.router();

    let read = get(&router, &format!("/api/admin/loans/{}", loan.id), &token).await;
    assert_eq!(read.status, StatusCode::OK);

    let approve = send(
        &router,
        request(
            Method::PUT,
            &format!("/api/admin/loans/{}/approve", loan.id),
            Some(&token),
            None,
        ),
    )
    .await;
    assert_eq!(approve.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_only_super_admin_registers_admins() {
    let app = TestApp::new();
    let manager = app.seed_admin("ops", AdminRole::Manager).await;
    let root = app.seed_admin("root", AdminRole::SuperAdmin).await;
    let router = app.router();
    let dto = json!({
        "username": "newbie",
        "email": "newbie@bank.example",
        "password": "s3cure-passw0rd",
        "role": "auditor"
    });

    let denied = post(
        &router,
        "/api/admin/register",
        Some(&app.token_for(&manager)),
        dto.clone(),
    )
    .await;
    assert_eq!(denied.status, StatusCode::FORBIDDEN);

    let created = post(&router, "/api/admin/register", Some(&app.token_for(&root)), dto).await;
    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(created.json()["data"]["role"], "auditor");
}

#[tokio::test]
async fn test_invalid_body_is_unprocessable() {
    let app = TestApp::new();
    let router = app.router();

    let response = post(
        &router,
        "/api/admin/bootstrap_admin",
        None,
        json!({ "username": "root", "email": "not-an-email", "password": "s3cure-passw0rd" }),
    )
    .await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_health_reports_cache_backend() {
    let app = TestApp::new();
    let router = app.router();

    let response = send(&router, request(Method::GET, "/health", None, None)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["cache"], "memory");
}
