//! Authentication API integration tests
//!
//! Tests for registration, login, logout, the current-user endpoint and
//! the admin account-management endpoints.

mod common;

use axum::http::{header, StatusCode};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use axum_test::TestServer;
use blogsite::backend::routes::router::create_router;
use blogsite::backend::server::config::Environment;
use blogsite::backend::server::{AppState, Settings};
use blogsite::backend::storage::Storage;

use common::{bearer, session_cookie, TestApp, ADMIN_USERNAME};

fn set_cookie_header(response: &axum_test::TestResponse) -> String {
    response
        .headers()
        .get(header::SET_COOKIE)
        .expect("Set-Cookie header missing")
        .to_str()
        .unwrap()
        .to_string()
}

#[tokio::test]
async fn test_register_success_sets_session_cookie() {
    let app = TestApp::spawn().await;

    let response = app
        .server
        .post("/api/auth/register")
        .json(&json!({ "username": "alice", "password": "secret1" }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let cookie = set_cookie_header(&response);
    assert_contains!(cookie, "token=");
    assert_contains!(cookie, "HttpOnly");
    assert_contains!(cookie, "SameSite=Lax");
    assert_contains!(cookie, "Max-Age=604800");
    assert!(!cookie.contains("Secure"));

    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "User registered successfully");
    assert_eq!(body["user"]["username"], "alice");
    assert_eq!(body["user"]["isAdmin"], false);
    assert!(body["user"].get("passwordHash").is_none());
    assert!(body.get("token").is_none());
}

#[tokio::test]
async fn test_register_duplicate_username() {
    let app = TestApp::spawn().await;
    app.register("alice", "secret1").await;

    let response = app
        .server
        .post("/api/auth/register")
        .json(&json!({ "username": "alice", "password": "another1" }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Username already exists");
    assert_eq!(body["status"], 409);
}

#[tokio::test]
async fn test_register_validation_errors() {
    let app = TestApp::spawn().await;

    let cases = [
        json!({ "username": "alice" }),
        json!({ "password": "secret1" }),
        json!({ "username": "alice", "password": "12345" }),
        json!({ "username": "a".repeat(51), "password": "secret1" }),
    ];

    for case in cases {
        let response = app.server.post("/api/auth/register").json(&case).await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["success"], false);
    }

    assert!(app.state.storage.users().find_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_register_malformed_body() {
    let app = TestApp::spawn().await;

    let response = app
        .server
        .post("/api/auth/register")
        .text("{not json")
        .content_type("application/json")
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_success() {
    let app = TestApp::spawn().await;
    app.register("alice", "secret1").await;

    let response = app
        .server
        .post("/api/auth/login")
        .json(&json!({ "username": "alice", "password": "secret1" }))
        .await;

    response.assert_status_ok();
    assert_contains!(set_cookie_header(&response), "token=");
    let body: Value = response.json();
    assert_eq!(body["message"], "Login successful");
    assert_eq!(body["user"]["isAdmin"], false);
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let app = TestApp::spawn().await;
    app.register("alice", "secret1").await;

    let wrong_password = app
        .server
        .post("/api/auth/login")
        .json(&json!({ "username": "alice", "password": "wrong-password" }))
        .await;
    let unknown_user = app
        .server
        .post("/api/auth/login")
        .json(&json!({ "username": "nobody", "password": "secret1" }))
        .await;

    wrong_password.assert_status(StatusCode::UNAUTHORIZED);
    unknown_user.assert_status(StatusCode::UNAUTHORIZED);
    assert!(wrong_password.headers().get(header::SET_COOKIE).is_none());

    let a: Value = wrong_password.json();
    let b: Value = unknown_user.json();
    assert_eq!(a, b);
}

#[tokio::test]
async fn test_logout_clears_cookie() {
    let app = TestApp::spawn().await;

    // Logout works with or without a session
    let response = app.server.post("/api/auth/logout").await;

    response.assert_status_ok();
    let cookie = set_cookie_header(&response);
    assert!(cookie.starts_with("token=;"));
    assert_contains!(cookie, "Max-Age=0");
    assert_contains!(cookie, "Expires=Thu, 01 Jan 1970 00:00:00 GMT");
    let body: Value = response.json();
    assert_eq!(body["message"], "Logged out successfully");
}

#[tokio::test]
async fn test_me_requires_session() {
    let app = TestApp::spawn().await;

    let response = app.server.get("/api/auth/me").await;
    response.assert_status(StatusCode::UNAUTHORIZED);

    let response = app
        .server
        .get("/api/auth/me")
        .add_header(header::COOKIE, session_cookie("not-a-jwt"))
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_me_with_cookie_and_bearer() {
    let app = TestApp::spawn().await;
    let token = app.register("alice", "secret1").await;

    let via_cookie = app
        .server
        .get("/api/auth/me")
        .add_header(header::COOKIE, session_cookie(&token))
        .await;
    via_cookie.assert_status_ok();
    let body: Value = via_cookie.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["user"]["username"], "alice");
    assert_eq!(body["user"]["isAdmin"], false);

    let via_bearer = app
        .server
        .get("/api/auth/me")
        .add_header(header::AUTHORIZATION, bearer(&token))
        .await;
    via_bearer.assert_status_ok();
    assert_eq!(via_bearer.json::<Value>(), body);
}

#[tokio::test]
async fn test_session_of_deleted_user_is_anonymous() {
    let app = TestApp::spawn().await;
    let token = app.register("alice", "secret1").await;
    let alice = app.state.storage.users().find_by_username("alice").await.unwrap().unwrap();

    assert!(app.state.storage.users().delete(alice.id).await.unwrap());

    let response = app
        .server
        .get("/api/auth/me")
        .add_header(header::COOKIE, session_cookie(&token))
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_reset_password_requires_admin() {
    let app = TestApp::spawn().await;
    let token = app.register("alice", "secret1").await;
    let request = json!({ "username": "alice", "newPassword": "changed1" });

    let anonymous = app.server.post("/api/auth/reset-password").json(&request).await;
    anonymous.assert_status(StatusCode::UNAUTHORIZED);

    let regular = app
        .server
        .post("/api/auth/reset-password")
        .add_header(header::COOKIE, session_cookie(&token))
        .json(&request)
        .await;
    regular.assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_admin_resets_password() {
    let app = TestApp::spawn().await;
    let admin = app.admin_token().await;
    app.register("alice", "secret1").await;

    let response = app
        .server
        .post("/api/auth/reset-password")
        .add_header(header::COOKIE, session_cookie(&admin))
        .json(&json!({ "username": "alice", "newPassword": "changed1" }))
        .await;
    response.assert_status_ok();

    let old = app
        .server
        .post("/api/auth/login")
        .json(&json!({ "username": "alice", "password": "secret1" }))
        .await;
    old.assert_status(StatusCode::UNAUTHORIZED);
    app.login("alice", "changed1").await;

    let missing = app
        .server
        .post("/api/auth/reset-password")
        .add_header(header::COOKIE, session_cookie(&admin))
        .json(&json!({ "username": "nobody", "newPassword": "changed1" }))
        .await;
    missing.assert_status(StatusCode::NOT_FOUND);

    let short = app
        .server
        .post("/api/auth/reset-password")
        .add_header(header::COOKIE, session_cookie(&admin))
        .json(&json!({ "username": "alice", "newPassword": "123" }))
        .await;
    short.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_admin_lists_and_promotes_users() {
    let app = TestApp::spawn().await;
    let admin = app.admin_token().await;
    let alice_token = app.register("alice", "secret1").await;

    let response = app
        .server
        .get("/api/admin/users")
        .add_header(header::COOKIE, session_cookie(&admin))
        .await;
    response.assert_status_ok();
    let users: Vec<Value> = response.json();
    assert_eq!(users.len(), 2);
    assert!(users.iter().all(|u| u.get("passwordHash").is_none()));

    let alice = users.iter().find(|u| u["username"] == "alice").unwrap();
    let alice_id = alice["id"].as_str().unwrap();

    let response = app
        .server
        .patch(&format!("/api/admin/users/{}", alice_id))
        .add_header(header::COOKIE, session_cookie(&admin))
        .json(&json!({ "isAdmin": true }))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["isAdmin"], true);

    // The existing session sees the new role without logging in again
    let me = app
        .server
        .get("/api/auth/me")
        .add_header(header::COOKIE, session_cookie(&alice_token))
        .await;
    assert_eq!(me.json::<Value>()["user"]["isAdmin"], true);
}

#[tokio::test]
async fn test_admin_cannot_revoke_self() {
    let app = TestApp::spawn().await;
    let admin = app.admin_token().await;
    let me = app.state.storage.users().find_by_username(ADMIN_USERNAME).await.unwrap().unwrap();

    let response = app
        .server
        .patch(&format!("/api/admin/users/{}", me.id))
        .add_header(header::COOKIE, session_cookie(&admin))
        .json(&json!({ "isAdmin": false }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let unknown = app
        .server
        .patch("/api/admin/users/not-a-uuid")
        .add_header(header::COOKIE, session_cookie(&admin))
        .json(&json!({ "isAdmin": true }))
        .await;
    unknown.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_production_cookie_attributes() {
    let dir = tempfile::tempdir().unwrap();
    let mut settings = Settings::development(dir.path());
    settings.environment = Environment::Production;
    settings.cookies.cross_site = true;

    // Production refuses the file fallback at startup; open it directly
    let storage = Storage::open_file(dir.path()).await.unwrap();
    let server = TestServer::new(create_router(AppState::new(storage, settings))).unwrap();

    let response = server
        .post("/api/auth/register")
        .json(&json!({ "username": "alice", "password": "secret1" }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let cookie = set_cookie_header(&response);
    assert_contains!(cookie, "Secure");
    assert_contains!(cookie, "SameSite=None");
}
