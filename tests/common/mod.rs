//! Common test utilities and helpers
//!
//! Every test gets its own server backed by the JSON file store in a fresh
//! temporary directory, so tests never share users or posts.

#![allow(dead_code)]

use axum::http::{header, HeaderValue, StatusCode};
use axum_test::TestServer;
use serde_json::{json, Value};
use tempfile::TempDir;

use blogsite::backend::auth::accounts::set_admin_by_username;
use blogsite::backend::routes::router::create_router;
use blogsite::backend::server::{build_state, AppState, Settings};

/// Assert that a result is ok and return the value
#[macro_export]
macro_rules! assert_ok {
    ($result:expr) => {
        match $result {
            Ok(value) => value,
            Err(e) => panic!("Expected Ok, got Err: {:?}", e),
        }
    };
}

/// Assert that a string contains a substring
#[macro_export]
macro_rules! assert_contains {
    ($haystack:expr, $needle:expr) => {
        assert!(
            $haystack.contains($needle),
            "Expected '{}' to contain '{}'",
            $haystack,
            $needle
        );
    };
}

pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "adminpass";

/// A running test server plus direct access to its state
pub struct TestApp {
    pub server: TestServer,
    pub state: AppState,
    _data_dir: TempDir,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with(|_| {}).await
    }

    /// Spawn with adjusted settings
    pub async fn spawn_with(configure: impl FnOnce(&mut Settings)) -> Self {
        let data_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let mut settings = Settings::development(data_dir.path());
        configure(&mut settings);

        let state = build_state(settings).await.expect("Failed to build app state");
        let server = TestServer::new(create_router(state.clone())).expect("Failed to start test server");

        Self {
            server,
            state,
            _data_dir: data_dir,
        }
    }

    /// Register an account and return its session token
    pub async fn register(&self, username: &str, password: &str) -> String {
        let response = self
            .server
            .post("/api/auth/register")
            .json(&json!({ "username": username, "password": password }))
            .await;
        response.assert_status(StatusCode::CREATED);
        response.cookie("token").value().to_string()
    }

    /// Log in and return the session token
    pub async fn login(&self, username: &str, password: &str) -> String {
        let response = self
            .server
            .post("/api/auth/login")
            .json(&json!({ "username": username, "password": password }))
            .await;
        response.assert_status_ok();
        response.cookie("token").value().to_string()
    }

    /// Register the admin account, promote it through the store and log in
    pub async fn admin_token(&self) -> String {
        self.register(ADMIN_USERNAME, ADMIN_PASSWORD).await;
        set_admin_by_username(self.state.storage.users(), ADMIN_USERNAME, true)
            .await
            .expect("Failed to promote admin");
        self.login(ADMIN_USERNAME, ADMIN_PASSWORD).await
    }

    /// Create a post as `token` and return its JSON
    pub async fn create_post(&self, token: &str, title: &str, content: &str) -> Value {
        let response = self
            .server
            .post("/api/posts")
            .add_header(header::COOKIE, session_cookie(token))
            .json(&json!({ "title": title, "content": content }))
            .await;
        response.assert_status(StatusCode::CREATED);
        response.json::<Value>()
    }
}

/// `Cookie` request header carrying a session token
pub fn session_cookie(token: &str) -> HeaderValue {
    HeaderValue::from_str(&format!("token={}", token)).expect("Token is a valid header value")
}

/// `Authorization` request header carrying a session token
pub fn bearer(token: &str) -> HeaderValue {
    HeaderValue::from_str(&format!("Bearer {}", token)).expect("Token is a valid header value")
}
